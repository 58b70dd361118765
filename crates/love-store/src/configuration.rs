use std::path::{Path, PathBuf};

use serde::Deserialize;
use share_code::{DEFAULT_LENGTH, ShareCodeConfig};

use crate::error::ConfigError;
use crate::media::MediaLimits;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// SQLite database file. Relative paths resolve against the config file.
    pub database: PathBuf,
    #[serde(default)]
    pub share: ShareSettings,
    #[serde(default)]
    pub media: MediaLimits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareSettings {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

fn default_code_length() -> usize {
    DEFAULT_LENGTH
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_LENGTH,
        }
    }
}

impl ShareSettings {
    pub fn code_config(&self) -> Result<ShareCodeConfig, ConfigError> {
        ShareCodeConfig::new(self.code_length).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file, resolving the database path
    /// relative to the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&yaml)?;

        if config.database.is_relative() {
            if let Some(base) = path.parent() {
                config.database = base.join(&config.database);
            }
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database path is empty".to_string()));
        }
        self.share.code_config()?;
        self.media.validate()?;
        Ok(())
    }
}
