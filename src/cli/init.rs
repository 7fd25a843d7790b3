use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, resolve_data_dir};

use super::open;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = resolve_data_dir(&dir);
    }
    std::fs::create_dir_all(&settings.data_dir)?;
    save_settings(&settings)?;

    let keeper = open()?;
    println!("Settings:   {}", settings_path().display());
    println!("Database:   {}", settings.db_path().display());
    println!(
        "Ready with {} budgets and {} categories.",
        keeper.view().budgets().len(),
        keeper.repositories().categories.get_all(None)?.len()
    );
    Ok(())
}
