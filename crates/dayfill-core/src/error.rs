//! Core error types for dayfill-core.
//!
//! Scheduling itself never fails: it degrades to empty or partial results.
//! These errors cover the surfaces around it (configuration, snapshot files
//! and validation of user-supplied settings).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayfill-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot file could not be read or parsed
    #[error("Invalid snapshot {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration schema
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Work window hours out of range or inverted
    #[error("Invalid work hours: start ({start}) must be before end ({end}) and both within 0-23")]
    InvalidWorkHours { start: u32, end: u32 },

    /// A minute step that must be a positive divisor of an hour
    #[error("Invalid value for '{field}': {minutes} minutes (must be 1-60 and divide 60)")]
    InvalidStep { field: String, minutes: u32 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
