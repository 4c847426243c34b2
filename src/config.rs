//! User configuration, loaded from `config.toml` in the platform config
//! directory (e.g. `~/.config/emotion-diary/config.toml`).

use crate::error::DiaryError;
use crate::logging::LogFormat;
use crate::stats::StatsWindow;
use crate::theme::Theme;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "emotion-diary";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "EMOTION_DIARY_DATA_DIR";

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiaryConfig {
    /// Where entries, the theme and logs are kept
    pub data_dir: Option<PathBuf>,
    /// Statistics window shown first, e.g. "7" or "all"
    pub default_window: Option<String>,
    /// Theme used until one is chosen in the app
    pub theme: Option<String>,
    /// tracing filter directive, e.g. "info" or "emotion_diary=debug"
    pub log_level: Option<String>,
    /// "pretty", "json" or "compact"
    pub log_format: Option<String>,
}

impl DiaryConfig {
    /// Path of the config file in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults; a file that exists but fails to
    /// parse is an error.
    pub fn load() -> Result<Self, DiaryError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, DiaryError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, DiaryError> {
        toml::from_str(content).map_err(|source| DiaryError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Priority: `EMOTION_DIARY_DATA_DIR` > `data_dir` > platform data dir
    /// > current directory.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_window(&self) -> StatsWindow {
        self.default_window
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}
