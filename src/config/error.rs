//! Configuration error types

use thiserror::Error;

/// Failure to read or parse the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unreadable .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value that the service cannot run with
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Invalid URL for {0}; expected http(s)")]
    InvalidUrl(&'static str),

    #[error("Generation attempts must be between 1 and 10")]
    TooManyAttempts,

    #[error("Amadeus key and secret must be configured together")]
    IncompleteAmadeusCredentials,
}
