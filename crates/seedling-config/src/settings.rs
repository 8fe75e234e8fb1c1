//! Validated settings

use crate::schema::{RawConfig, RawLoggingConfig, RawStorageConfig};
use seedling_api::DEFAULT_STORAGE_KEY;
use seedling_util::default_data_dir;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default log level when neither RUST_LOG nor the config sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// SQLite database filename within the data directory
const DATABASE_FILENAME: &str = "seedling.db";

/// Validated settings ready for use by the binary
#[derive(Debug, Clone)]
pub struct Settings {
    pub storage: StorageSettings,
    pub log_level: String,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            storage: StorageSettings::from_raw(raw.storage),
            log_level: log_level_from_raw(raw.logging),
        }
    }

    /// Override the data directory (e.g. from `--data-dir`)
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage.data_dir = dir.into();
        self
    }

    /// Override the log level (e.g. from `--log-level`)
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into().to_ascii_lowercase();
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            log_level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

fn log_level_from_raw(raw: RawLoggingConfig) -> String {
    raw.level
        .map(|l| l.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.into())
}

/// Where and how the state document is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub backend: BackendKind,
    pub data_dir: PathBuf,
    pub key: String,
}

impl StorageSettings {
    fn from_raw(raw: RawStorageConfig) -> Self {
        Self {
            backend: raw
                .backend
                .and_then(|b| b.parse().ok())
                .unwrap_or_default(),
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
            key: raw.key.unwrap_or_else(|| DEFAULT_STORAGE_KEY.into()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Database file used by the SQLite backend
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILENAME)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::from_raw(RawStorageConfig::default())
    }
}

/// Persistence backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::File => "file",
            BackendKind::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend: {0}")]
pub struct ParseBackendError(pub String);

impl FromStr for BackendKind {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "file" => Ok(BackendKind::File),
            "memory" => Ok(BackendKind::Memory),
            other => Err(ParseBackendError(other.to_string())),
        }
    }
}
