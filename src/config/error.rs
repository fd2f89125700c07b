//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid backend URL format")]
    InvalidBackendUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid header name for {0}")]
    InvalidHeaderName(&'static str),

    #[error("Polling interval must be positive: {0}")]
    InvalidInterval(&'static str),

    #[error("Escalation period must be positive: {0}")]
    InvalidEscalationPeriod(&'static str),

    #[error("Embedding target origin must be an http(s) origin")]
    InvalidTargetOrigin,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),

    #[error("HTTP client could not be built: {0}")]
    HttpClient(String),
}
