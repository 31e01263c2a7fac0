//! Runtime configuration
//!
//! Layered as: built-in defaults, then `~/.worklens/config.toml` (optional),
//! then environment variables, then CLI flags.

use crate::types::{Result, WorklensError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Gemini REST endpoint (v1beta carries responseSchema support)
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Generation of a multi-day report can take a while
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_LANGUAGE: &str = "Traditional Chinese";

/// Example category labels offered to the model
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "文件作業",
    "實驗室",
    "樣品抽檢",
    "溝通協調",
    "會議",
    "行政",
];

const DATA_DIR_NAME: &str = ".worklens";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Language the model must answer in
    pub language: String,
    pub categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            language: DEFAULT_LANGUAGE.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// Keep the API key out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("language", &self.language)
            .field("categories", &self.categories)
            .finish()
    }
}

impl Config {
    /// Load from the default file location and the process environment
    pub fn load() -> Result<Self> {
        let path = default_config_path();
        let mut config = Self::from_file(path.as_deref())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML config file; a missing file yields the defaults
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            WorklensError::Config(format!("invalid config file {}: {}", path.display(), e))
        })?;
        if config.timeout_secs == 0 {
            return Err(WorklensError::Config(format!(
                "invalid config file {}: timeout_secs must be greater than 0",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty("WORKLENS_MODEL") {
            self.model = model;
        }
        if let Some(endpoint) = non_empty("WORKLENS_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(secs) = non_empty("WORKLENS_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => tracing::warn!(value = %secs, "ignoring invalid WORKLENS_TIMEOUT_SECS"),
            }
        }
        if let Some(language) = non_empty("WORKLENS_LANGUAGE") {
            self.language = language;
        }
    }

    /// The API key, if one is configured and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// `~/.worklens`, or None if the home directory cannot be determined
pub fn data_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().join(DATA_DIR_NAME))
}

/// `~/.worklens/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
