//! Embedding (iframe host) configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Embedding configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmbeddingConfig {
    /// Whether checkout runs embedded in a host page
    #[serde(default)]
    pub enabled: bool,

    /// Origin that receives status notifications
    pub target_origin: Option<String>,
}

impl EmbeddingConfig {
    /// The target origin, only when embedding is enabled
    pub fn active_origin(&self) -> Option<&str> {
        if self.enabled {
            self.target_origin.as_deref()
        } else {
            None
        }
    }

    /// Validate embedding configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        match self.target_origin.as_deref() {
            None | Some("") => Err(ValidationError::MissingRequired("EMBEDDING__TARGET_ORIGIN")),
            Some(origin) if origin.starts_with("http://") || origin.starts_with("https://") => {
                Ok(())
            }
            Some(_) => Err(ValidationError::InvalidTargetOrigin),
        }
    }
}
