//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe where durable data and logs live.
//! - Load that description from a JSON file with defaults for missing keys.
//!
//! # Invariants
//! - `todos_key` is never empty.
//! - `log_level` is one of trace|debug|info|warn|error after validation.

use crate::logging::{default_log_level, normalize_level};
use crate::todo_store::{LoadPolicy, TodoStoreOptions, DEFAULT_TODOS_KEY};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Configuration shared by every front end of the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite file for durable storage; `None` keeps data in memory.
    pub db_path: Option<PathBuf>,
    /// Directory for rolling log files; `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub todos_key: String,
    pub load_policy: LoadPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_dir: None,
            log_level: default_log_level().to_string(),
            todos_key: DEFAULT_TODOS_KEY.to_string(),
            load_policy: LoadPolicy::default(),
        }
    }
}

/// Configuration load/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl CoreConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses and validates JSON config text.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants and canonicalizes `log_level`.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.todos_key.trim().is_empty() {
            return Err(ConfigError::Invalid("todos_key cannot be empty".to_string()));
        }
        self.log_level = normalize_level(&self.log_level)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?
            .to_string();
        Ok(())
    }

    pub fn todo_store_options(&self) -> TodoStoreOptions {
        TodoStoreOptions {
            key: self.todos_key.clone(),
            load_policy: self.load_policy,
        }
    }
}
