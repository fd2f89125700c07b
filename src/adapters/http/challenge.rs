//! Challenge-retry middleware for outbound backend requests.
//!
//! Wraps every request sent to the reservation backend:
//!
//! 1. Attach the held challenge token (if any) under the configured header
//! 2. Send the request
//! 3. If the response is a challenge failure (HTTP 403 plus a "challenge
//!    missing" header or a "challenge mitigated" header value), run the
//!    challenge solver, store the new token, and retry the original request
//!    exactly once
//! 4. If the retry is rejected by the challenge again, discard the token and
//!    hand back the failed response
//!
//! The token lives in an explicit [`ChallengeContext`] owned by the client
//! and passed to every call, so its lifecycle is visible at call sites.

use std::sync::{Arc, Mutex, PoisonError};

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::config::{ChallengeConfig, ValidationError};
use crate::ports::{ChallengeError, ChallengeSolver, ChallengeToken, ClientError};

/// Holder of the current challenge token.
///
/// Single writer (the middleware), many readers (every outbound request).
#[derive(Debug, Default)]
pub struct ChallengeContext {
    token: Mutex<Option<ChallengeToken>>,
}

impl ChallengeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token currently attached to outbound requests.
    pub fn current(&self) -> Option<ChallengeToken> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if a token is held.
    pub fn has_token(&self) -> bool {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn store(&self, token: ChallengeToken) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn discard(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Middleware that transparently solves anti-bot challenges.
pub struct ChallengeRetry {
    token_header: HeaderName,
    missing_header: HeaderName,
    mitigated_header: HeaderName,
    mitigated_value: String,
    solver: Arc<dyn ChallengeSolver>,
}

impl ChallengeRetry {
    /// Create the middleware from configured header names.
    pub fn new(
        config: &ChallengeConfig,
        solver: Arc<dyn ChallengeSolver>,
    ) -> Result<Self, ValidationError> {
        let parse = |value: &str, name: &'static str| {
            HeaderName::from_bytes(value.as_bytes())
                .map_err(|_| ValidationError::InvalidHeaderName(name))
        };

        Ok(Self {
            token_header: parse(&config.token_header, "CHALLENGE__TOKEN_HEADER")?,
            missing_header: parse(&config.missing_header, "CHALLENGE__MISSING_HEADER")?,
            mitigated_header: parse(&config.mitigated_header, "CHALLENGE__MITIGATED_HEADER")?,
            mitigated_value: config.mitigated_value.clone(),
            solver,
        })
    }

    /// Name of the header that carries the token.
    pub fn token_header(&self) -> &HeaderName {
        &self.token_header
    }

    /// Classify a response as a challenge failure.
    pub fn is_challenge_failure(&self, status: StatusCode, headers: &HeaderMap) -> bool {
        if status != StatusCode::FORBIDDEN {
            return false;
        }
        if headers.contains_key(&self.missing_header) {
            return true;
        }
        headers
            .get(&self.mitigated_header)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().eq_ignore_ascii_case(&self.mitigated_value))
            .unwrap_or(false)
    }

    /// Send `request`, solving a challenge and retrying once if required.
    ///
    /// Non-challenge responses are returned unchanged, whatever their status.
    pub async fn execute(
        &self,
        http: &reqwest::Client,
        context: &ChallengeContext,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, ClientError> {
        let retry_request = request.try_clone();
        let response = self.send(http, context, request).await?;

        if !self.is_challenge_failure(response.status(), response.headers()) {
            return Ok(response);
        }

        let Some(retry_request) = retry_request else {
            tracing::warn!(
                url = %response.url(),
                "Challenge required but request body cannot be replayed"
            );
            return Ok(response);
        };

        tracing::info!(url = %response.url(), "Challenge required, invoking solver");
        let token = self.solver.solve().await.map_err(|e| match e {
            ChallengeError::Abandoned => {
                tracing::info!("Challenge abandoned by the buyer");
                ClientError::ChallengeAbandoned
            }
            ChallengeError::Unavailable(reason) => {
                tracing::warn!(reason = %reason, "Challenge solver unavailable");
                ClientError::ChallengeUnavailable(reason)
            }
        })?;

        // Stored before the retry is dispatched so the retry reads it.
        context.store(token);

        let retried = self.send(http, context, retry_request).await?;
        if self.is_challenge_failure(retried.status(), retried.headers()) {
            tracing::warn!(
                url = %retried.url(),
                "Retried request failed the challenge again, discarding token"
            );
            context.discard();
        }

        Ok(retried)
    }

    async fn send(
        &self,
        http: &reqwest::Client,
        context: &ChallengeContext,
        mut request: reqwest::Request,
    ) -> Result<reqwest::Response, ClientError> {
        if let Some(token) = context.current() {
            let value = HeaderValue::from_str(token.expose()).map_err(|_| {
                ClientError::ChallengeUnavailable("challenge token is not a valid header value".into())
            })?;
            request.headers_mut().insert(self.token_header.clone(), value);
        }

        http.execute(request)
            .await
            .map_err(|e| ClientError::Network(e.to_string()))
    }
}
