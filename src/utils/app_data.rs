use crate::render::Pacing;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "krasnyy";
const CONFIG_FILE: &str = "config.json";

/// User configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language resolved at startup
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory holding `dorks.json` and `locales/`.
    /// None means the current directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Where exports are written. None means the current directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Delay between typed characters
    #[serde(default = "default_char_delay_ms")]
    pub char_delay_ms: u64,

    /// Pause after each category block
    #[serde(default = "default_category_delay_ms")]
    pub category_delay_ms: u64,

    /// Export format used when none is given
    #[serde(default = "default_export_format")]
    pub export_format: String,
}

fn default_language() -> String {
    "tr".to_string()
}

fn default_char_delay_ms() -> u64 {
    6
}

fn default_category_delay_ms() -> u64 {
    8
}

fn default_export_format() -> String {
    "text".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            data_dir: None,
            export_dir: None,
            char_delay_ms: default_char_delay_ms(),
            category_delay_ms: default_category_delay_ms(),
            export_format: default_export_format(),
        }
    }
}

impl AppConfig {
    /// Load config from an explicit path, or return default if not found
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            let config: AppConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the given path, creating parent directories
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            char_delay: Duration::from_millis(self.char_delay_ms),
            category_delay: Duration::from_millis(self.category_delay_ms),
        }
    }

    /// Effective data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Effective export directory
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
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
    Ok(base.join(APP_NAME))
}
