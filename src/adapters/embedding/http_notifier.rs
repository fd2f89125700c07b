//! HTTP embedding notifier.
//!
//! Relays status changes to the embedding host as JSON posts to its target
//! origin. Delivery is fire-and-forget: each post runs on its own task and
//! failures are only logged.

use reqwest::Client;
use serde::Serialize;

use crate::config::{BackendConfig, EmbeddingConfig, ValidationError};
use crate::domain::foundation::ReservationId;
use crate::ports::{EmbeddedStatusMessage, EmbeddingNotifier};

/// Error report posted alongside status messages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedErrorMessage<'a> {
    error: &'a str,
    reservation_id: &'a ReservationId,
}

/// Embedding notifier that posts to the host origin.
pub struct HttpEmbeddingNotifier {
    http: Client,
    target_origin: String,
}

impl HttpEmbeddingNotifier {
    /// Returns `None` when embedding is disabled.
    pub fn from_config(
        embedding: &EmbeddingConfig,
        backend: &BackendConfig,
    ) -> Result<Option<Self>, ValidationError> {
        let Some(origin) = embedding.active_origin() else {
            return Ok(None);
        };

        let http = Client::builder()
            .timeout(backend.request_timeout())
            .build()
            .map_err(|e| ValidationError::HttpClient(e.to_string()))?;

        Ok(Some(Self {
            http,
            target_origin: origin.trim_end_matches('/').to_string(),
        }))
    }

    pub fn target_origin(&self) -> &str {
        &self.target_origin
    }

    fn post<T: Serialize>(&self, body: &T) {
        let payload = match serde_json::to_value(body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Could not encode embedding message");
                return;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, embedding message dropped");
            return;
        };

        let request = self.http.post(&self.target_origin).json(&payload);
        let origin = self.target_origin.clone();
        runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(origin = %origin, "Embedding host notified");
                }
                Ok(response) => {
                    tracing::warn!(
                        origin = %origin,
                        status = response.status().as_u16(),
                        "Embedding host rejected message"
                    );
                }
                Err(e) => {
                    tracing::warn!(origin = %origin, error = %e, "Embedding host unreachable");
                }
            }
        });
    }
}

impl EmbeddingNotifier for HttpEmbeddingNotifier {
    fn post_status(&self, message: EmbeddedStatusMessage) {
        tracing::info!(
            reservation_id = %message.reservation_id,
            status = %message.status,
            "Posting status to embedding host"
        );
        self.post(&message);
    }

    fn report_error(&self, reservation_id: &ReservationId, message: &str) {
        self.post(&EmbeddedErrorMessage {
            error: message,
            reservation_id,
        });
    }
}
