//! Application configuration: explicitly scoped, loaded once at startup, and
//! persisted behind a storage port instead of global mutable state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
/// Generation can take minutes while a model warms up.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Storage port for configuration persistence.
pub trait ConfigStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<AppConfig>, ConfigError>;
    fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;
}

/// JSON file store rooted in the app data directory.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(CONFIG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Option<AppConfig>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(config))
    }

    fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let payload = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
        std::fs::write(&self.path, payload).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Loads the persisted configuration, falling back to defaults on a missing
/// or unreadable file.
pub fn load_or_default(store: &dyn ConfigStore) -> AppConfig {
    match store.load() {
        Ok(Some(config)) => config,
        Ok(None) => AppConfig::default(),
        Err(error) => {
            log::warn!("Falling back to default configuration: {}", error);
            AppConfig::default()
        }
    }
}
