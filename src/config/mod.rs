//! Harness configuration
//!
//! Reads the flat `key=value` properties file the test harness is driven by
//! (`harness.properties` by default). Lookups are explicit about absence:
//! a missing file and a missing key are distinct typed errors, so callers
//! can never mistake an unset key for an empty value.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Default properties file, resolved relative to the working directory.
pub const DEFAULT_PATH: &str = "harness.properties";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration key not present: {0}")]
    KeyMissing(String),
}

/// Parsed key-value settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Load settings from a properties file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_path_buf())
            } else {
                ConfigError::Io { path: path.to_path_buf(), source: e }
            }
        })?;

        let settings = Self::parse(&content);
        info!("Loaded {} settings from {}", settings.values.len(), path.display());
        Ok(settings)
    }

    /// Load settings from the default properties file.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(DEFAULT_PATH)
    }

    /// Parse properties-file content. Blank lines and `#`/`!` comment lines
    /// are skipped; everything after the first `=` is the value.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        Self { values }
    }

    /// Value for the key, or `None` if the key is not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for the key, split on commas and trimmed, in file order.
    pub fn get_values(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|value| {
            value
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()
        })
    }

    /// Value for the key, or a typed error when it is absent.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::KeyMissing(key.to_string()))
    }
}
