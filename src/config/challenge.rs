//! Anti-bot challenge configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Header names used by the challenge-retry middleware
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChallengeConfig {
    /// Header carrying the solved challenge token on outbound requests
    #[serde(default = "default_token_header")]
    pub token_header: String,

    /// Response header whose presence signals "challenge missing"
    #[serde(default = "default_missing_header")]
    pub missing_header: String,

    /// Response header signalling that mitigation occurred
    #[serde(default = "default_mitigated_header")]
    pub mitigated_header: String,

    /// Value of `mitigated_header` that marks a challenge
    #[serde(default = "default_mitigated_value")]
    pub mitigated_value: String,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            token_header: default_token_header(),
            missing_header: default_missing_header(),
            mitigated_header: default_mitigated_header(),
            mitigated_value: default_mitigated_value(),
        }
    }
}

impl ChallengeConfig {
    /// Validate challenge configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("CHALLENGE__TOKEN_HEADER", &self.token_header),
            ("CHALLENGE__MISSING_HEADER", &self.missing_header),
            ("CHALLENGE__MITIGATED_HEADER", &self.mitigated_header),
        ] {
            if http::HeaderName::from_bytes(value.as_bytes()).is_err() {
                return Err(ValidationError::InvalidHeaderName(name));
            }
        }
        if self.mitigated_value.is_empty() {
            return Err(ValidationError::MissingRequired("CHALLENGE__MITIGATED_VALUE"));
        }
        Ok(())
    }
}

fn default_token_header() -> String {
    "x-challenge-token".to_string()
}

fn default_missing_header() -> String {
    "x-challenge-missing".to_string()
}

fn default_mitigated_header() -> String {
    "cf-mitigated".to_string()
}

fn default_mitigated_value() -> String {
    "challenge".to_string()
}
