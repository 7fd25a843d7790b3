use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::DB_FILE;
use crate::error::{BookkeeperError, Result};

/// Overrides the database path for a single run.
pub const DB_ENV: &str = "BOOKKEEPER_DB";
/// Overrides where settings.json lives.
pub const CONFIG_DIR_ENV: &str = "BOOKKEEPER_CONFIG_DIR";

const SETTINGS_FILE: &str = "settings.json";

/// Contents of settings.json. Any field missing from the file takes its
/// default, so older or hand-written files keep the fields they do set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: String,
    pub db_file: String,
    pub log_level: String,
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: home().join("Documents").join("bookkeeper").to_string_lossy().into_owned(),
            db_file: DB_FILE.to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// `BOOKKEEPER_DB` if set, otherwise `data_dir/db_file`.
    pub fn db_path(&self) -> PathBuf {
        match std::env::var_os(DB_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => Path::new(&self.data_dir).join(&self.db_file),
        }
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BookkeeperError::Settings(format!("{}: {e}", path.display())))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| BookkeeperError::Settings(e.to_string()))?;
        std::fs::write(path, json + "\n")?;
        Ok(())
    }
}

pub fn settings_path() -> PathBuf {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home().join(".config").join("bookkeeper"),
    };
    dir.join(SETTINGS_FILE)
}

/// Never fails: a missing or unreadable file yields the defaults.
pub fn load_settings() -> Settings {
    Settings::read_from(&settings_path()).unwrap_or_default()
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    settings.write_to(&settings_path())
}

/// Expands a leading `~` and makes the directory absolute.
pub fn resolve_data_dir(dir: &str) -> String {
    let expanded = match dir.strip_prefix('~') {
        Some(rest) => home().join(rest.trim_start_matches('/')),
        None => PathBuf::from(dir),
    };
    std::path::absolute(&expanded)
        .unwrap_or(expanded)
        .to_string_lossy()
        .into_owned()
}
