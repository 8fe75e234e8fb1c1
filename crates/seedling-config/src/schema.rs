//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Where the state document lives
    #[serde(default)]
    pub storage: RawStorageConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: RawLoggingConfig,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Backend name: "sqlite", "file" or "memory" (default: sqlite)
    pub backend: Option<String>,

    /// Data directory (default: $SEEDLING_DATA_DIR or the XDG data dir)
    pub data_dir: Option<PathBuf>,

    /// Key the state document is stored under
    pub key: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLoggingConfig {
    /// Default level when RUST_LOG is not set
    pub level: Option<String>,
}
