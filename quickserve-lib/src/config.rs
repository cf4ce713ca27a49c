use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{cache::QueryOptions, fs::config_dir};

const FILE_NAME: &str = "core.toml";

/// Environment variable overriding [`CoreConfig::api_url`].
pub const API_URL_ENV: &str = "QUICKSERVE_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not access the configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not serialize the configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The client's core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Root of the quickServe REST API.
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Defaults for every cached query.
    pub query: QueryOptions,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".into(),
            request_timeout_secs: 30,
            query: QueryOptions::default(),
        }
    }
}

impl CoreConfig {
    /// Load from the user's configuration directory, writing the defaults out if no file exists
    /// yet. [`API_URL_ENV`] takes precedence over the file.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = Self::load_from(&Self::path()?)?;
        cfg.override_api_url(std::env::var(API_URL_ENV).ok());

        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            debug!(path = %path.display(), "Loaded configuration");
            Ok(toml::from_str(&contents)?)
        } else {
            let cfg = Self::default();
            if let Err(err) = cfg.save_to(path) {
                // Running without a writable config dir is fine, the defaults still apply
                warn!(path = %path.display(), %err, "Could not write default configuration");
            }
            Ok(cfg)
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;

        Ok(())
    }

    /// Replace the API URL when `api_url` is set and not blank.
    pub fn override_api_url(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_url = url;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join(FILE_NAME))
    }
}
