//! Challenge solver port - obtains proof that an anti-bot challenge was solved.
//!
//! Solving is delegated to the buyer-facing UI. The port only carries the
//! outcome: a token, or a distinct "abandoned" signal when the buyer
//! dismisses the challenge.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Opaque proof that a challenge was solved.
///
/// Debug output is redacted.
#[derive(Clone, Debug)]
pub struct ChallengeToken(SecretString);

impl ChallengeToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value.into()))
    }

    /// Exposes the token (for attaching to a request).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Why a challenge could not produce a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChallengeError {
    /// The buyer dismissed the challenge UI.
    #[error("challenge abandoned")]
    Abandoned,

    #[error("challenge solver unavailable: {0}")]
    Unavailable(String),
}

/// Port for the challenge-solving flow.
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Suspend until the challenge is solved or abandoned.
    async fn solve(&self) -> Result<ChallengeToken, ChallengeError>;
}
