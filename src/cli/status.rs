use crate::error::Result;
use crate::settings::load_settings;

use super::open;

pub fn run() -> Result<()> {
    let db_path = load_settings().db_path();
    println!("Database:   {}", db_path.display());
    println!();

    let keeper = open()?;
    let view = keeper.view();
    view.print_totals();
    println!();
    view.print_budgets();
    view.print_categories();
    view.print_all_expenses();
    Ok(())
}
