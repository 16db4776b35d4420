//! User settings, stored as JSON in the platform config directory
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::session::DEFAULT_PAGE_SIZE;

const APP_DIR: &str = "rpcs3-icon-browser";
const SETTINGS_FILE: &str = "settings.json";
const DB_FILE: &str = "games.db";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog database to open; see [`Settings::database_path`]
    pub database: Option<PathBuf>,
    /// Games per page in the grid
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// `<config_dir>/rpcs3-icon-browser/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let mut settings: Settings = serde_json::from_str(&text)?;
        settings.page_size = settings.page_size.max(1);
        Ok(settings)
    }

    /// Load from the default location, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Database to open.
    ///
    /// In order: `cli_override`, the configured path, `games.db` next to the
    /// executable if it exists, then `<data_dir>/rpcs3-icon-browser/games.db`.
    pub fn database_path(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override.or(self.database.as_deref()) {
            return path.to_path_buf();
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DB_FILE)));
        if let Some(path) = beside_exe.filter(|p| p.exists()) {
            return path;
        }

        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(DB_FILE)
    }
}
