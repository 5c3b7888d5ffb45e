//! Error types for Handkit
//!
//! Errors exist only at load/configuration time. Per-tick computation is a
//! total function over its documented input domain and never fails.

use thiserror::Error;

/// Main error type for Handkit
#[derive(Error, Debug)]
pub enum HandkitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pose library error: {0}")]
    Library(#[from] LibraryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Reference pose library errors
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to read pose library: {0}")]
    ReadFile(String),

    #[error("Failed to parse pose library: {0}")]
    Parse(String),
}

/// Result type alias for Handkit operations
pub type Result<T> = std::result::Result<T, HandkitError>;
