//! Configuration validation

use crate::schema::RawConfig;
use crate::settings::BackendKind;
use thiserror::Error;

/// Accepted `[logging] level` values
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown storage backend '{0}' (expected sqlite, file or memory)")]
    UnknownBackend(String),

    #[error("Invalid storage key '{key}': {message}")]
    InvalidStorageKey { key: String, message: String },

    #[error("Unknown log level '{0}' (expected trace, debug, info, warn or error)")]
    UnknownLogLevel(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(backend) = &config.storage.backend
        && backend.parse::<BackendKind>().is_err()
    {
        errors.push(ValidationError::UnknownBackend(backend.clone()));
    }

    if let Some(key) = &config.storage.key
        && let Err(message) = validate_storage_key(key)
    {
        errors.push(ValidationError::InvalidStorageKey {
            key: key.clone(),
            message,
        });
    }

    if let Some(level) = &config.logging.level
        && !is_log_level(level)
    {
        errors.push(ValidationError::UnknownLogLevel(level.clone()));
    }

    errors
}

/// Check a storage key; it doubles as a file name for the file backend
pub fn validate_storage_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("key cannot be empty".into());
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(format!("character '{}' is not allowed", c));
    }
    if key.starts_with('.') {
        return Err("key cannot start with '.'".into());
    }
    Ok(())
}

pub fn is_log_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
}
