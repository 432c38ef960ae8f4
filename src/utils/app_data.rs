use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "prayerq";
const CONFIG_FILE: &str = "config.json";
const RECORDS_FILE: &str = "prayers.json";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Prayer log to search when no `--file` is given
    #[serde(default)]
    pub records_path: Option<PathBuf>,

    /// How far back a request still counts as recent
    #[serde(default = "default_recent_window_hours")]
    pub recent_window_hours: u64,

    /// Compiled queries kept by the interactive search loop
    #[serde(default = "default_query_cache_size")]
    pub query_cache_size: usize,
}

fn default_recent_window_hours() -> u64 {
    24
}

fn default_query_cache_size() -> usize {
    64
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            records_path: None,
            recent_window_hours: default_recent_window_hours(),
            query_cache_size: default_query_cache_size(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path, or return default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Records file to use: the configured one, else `prayers.json` in the
    /// app data directory
    pub fn effective_records_path(&self) -> Result<PathBuf> {
        match &self.records_path {
            Some(path) => Ok(path.clone()),
            None => Ok(get_app_data_dir()?.join(RECORDS_FILE)),
        }
    }

    pub fn recent_window(&self) -> chrono::Duration {
        hours_window(self.recent_window_hours)
    }
}

/// Hour count as a duration, saturating at the largest representable span
pub fn hours_window(hours: u64) -> chrono::Duration {
    i64::try_from(hours)
        .ok()
        .and_then(chrono::Duration::try_hours)
        .unwrap_or(chrono::Duration::MAX)
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}
