//! Default paths for seedling components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/seedling/config.toml` or `~/.config/seedling/config.toml`
//! - Data: `$XDG_DATA_HOME/seedling` or `~/.local/share/seedling`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const SEEDLING_DATA_DIR_ENV: &str = "SEEDLING_DATA_DIR";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "seedling";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$SEEDLING_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/seedling` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/seedling` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(SEEDLING_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking SEEDLING_DATA_DIR env var.
/// Used for default values in configs where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/seedling/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/seedling/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_contains_seedling() {
        let path = data_dir_without_env();
        assert!(path.to_string_lossy().contains("seedling"));
    }

    #[test]
    fn config_path_is_toml_file() {
        let path = default_config_path();
        assert!(path.to_string_lossy().contains("seedling"));
        assert_eq!(path.file_name().unwrap(), CONFIG_FILENAME);
    }
}
