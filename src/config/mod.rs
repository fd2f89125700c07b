//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RESERVATION_CHECKOUT` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use reservation_checkout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.backend.base_url);
//! ```

mod backend;
mod challenge;
mod embedding;
mod error;
mod logging;
mod polling;

pub use backend::BackendConfig;
pub use challenge::ChallengeConfig;
pub use embedding::EmbeddingConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use polling::{CardPollConfig, PollerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Reservation backend (base URL, timeouts)
    pub backend: BackendConfig,

    /// Challenge header names
    #[serde(default)]
    pub challenge: ChallengeConfig,

    /// Payment confirmation poller cadence and escalation
    #[serde(default)]
    pub poller: PollerConfig,

    /// Card confirmation polling cadence
    #[serde(default)]
    pub card_poll: CardPollConfig,

    /// Embedding host notifications
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RESERVATION_CHECKOUT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RESERVATION_CHECKOUT__BACKEND__BASE_URL=...` -> `backend.base_url = ...`
    /// - `RESERVATION_CHECKOUT__POLLER__INTERVAL_MS=2000` -> `poller.interval_ms = 2000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RESERVATION_CHECKOUT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.backend.validate()?;
        self.challenge.validate()?;
        self.poller.validate()?;
        self.card_poll.validate()?;
        self.embedding.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
