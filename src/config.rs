//! Runtime settings
//!
//! Read from an optional JSON file; every field has a default so a partial
//! (or absent) file is fine. Command-line flags override individual values.

use crate::engine::{DEFAULT_BATCH_SIZE, DEFAULT_ENDLESS_LIMIT, default_epoch};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Levels per window page
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Puzzles per endless batch
    #[serde(default = "default_endless_limit")]
    pub endless_limit: usize,

    /// Day zero of the daily rotation
    #[serde(default = "default_epoch")]
    pub daily_epoch: NaiveDate,

    /// How long a loaded token table stays valid
    #[serde(default = "default_key_ttl_secs")]
    pub key_ttl_secs: u64,

    /// Log filter directive
    #[serde(default = "default_log")]
    pub log: String,
}

const fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

const fn default_endless_limit() -> usize {
    DEFAULT_ENDLESS_LIMIT
}

const fn default_key_ttl_secs() -> u64 {
    3600
}

fn default_log() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            endless_limit: default_endless_limit(),
            daily_epoch: default_epoch(),
            key_ttl_secs: default_key_ttl_secs(),
            log: default_log(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or the defaults when no path is given
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds an out-of-range value.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the engine cannot work with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending setting.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be positive"));
        }
        if self.endless_limit == 0 {
            return Err(ConfigError::Invalid("endless_limit must be positive"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn key_ttl(&self) -> Duration {
        Duration::from_secs(self.key_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, json: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("acronym-config-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.batch_size, 20);
        assert_eq!(settings.endless_limit, 5);
        assert_eq!(settings.daily_epoch, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        assert_eq!(settings.key_ttl(), Duration::from_secs(3600));
        assert_eq!(settings.log, "info");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = write_config("partial", r#"{"batch_size": 10, "daily_epoch": "2024-01-01"}"#);
        let settings = Settings::load(Some(&path)).unwrap();

        assert_eq!(settings.batch_size, 10);
        assert_eq!(settings.daily_epoch, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(settings.endless_limit, 5);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn zero_batch_rejected() {
        let path = write_config("zero", r#"{"batch_size": 0}"#);
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/settings.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/settings.json"));
    }
}
