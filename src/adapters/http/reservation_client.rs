//! HTTP Reservation Client - Implementation of ReservationClient over the
//! backend's public JSON API.
//!
//! Every call is sent through [`ChallengeRetry`], so a challenge failure is
//! solved and retried once before a caller ever sees it.
//!
//! # Endpoints
//!
//! All paths are relative to `/api/v2/public/reservation/{id}`:
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | status | GET | `/status` |
//! | force check | GET | `/payment/force-check` |
//! | initiate payment | POST | `/payment/{method}/init` |
//! | payment status | GET | `/payment/{method}/status` |
//! | confirm payment | POST | `/payment/confirm` |
//! | offline details | GET | `/payment/custom-offline` |
//! | resend email | POST | `/re-send-email` |

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

use super::challenge::{ChallengeContext, ChallengeRetry};
use crate::config::{BackendConfig, ChallengeConfig, ValidationError};
use crate::domain::foundation::ReservationId;
use crate::domain::payment::{PaymentConfirmation, PaymentProxy};
use crate::domain::reservation::{
    CustomOfflinePayment, PaymentStatusCheck, Reservation, ReservationMetadata,
    ReservationStatus, TransactionInitialization,
};
use crate::ports::{ChallengeSolver, ClientError, ReservationClient};

/// Reservation client backed by reqwest.
pub struct HttpReservationClient {
    base_url: String,
    http: Client,
    challenge: ChallengeRetry,
    context: Arc<ChallengeContext>,
}

impl HttpReservationClient {
    /// Creates a client for the configured backend.
    pub fn new(
        backend: &BackendConfig,
        challenge: &ChallengeConfig,
        solver: Arc<dyn ChallengeSolver>,
    ) -> Result<Self, ValidationError> {
        let http = Client::builder()
            .timeout(backend.request_timeout())
            .build()
            .map_err(|e| ValidationError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: backend.normalized_base_url().to_string(),
            http,
            challenge: ChallengeRetry::new(challenge, solver)?,
            context: Arc::new(ChallengeContext::new()),
        })
    }

    /// The challenge token holder shared by every request of this client.
    pub fn challenge_context(&self) -> Arc<ChallengeContext> {
        Arc::clone(&self.context)
    }

    fn reservation_url(&self, reservation_id: &ReservationId, suffix: &str) -> String {
        format!(
            "{}/api/v2/public/reservation/{}/{}",
            self.base_url, reservation_id, suffix
        )
    }

    /// Sends a request through the challenge middleware and decodes the body.
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = request
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let url = request.url().clone();

        let response = self
            .challenge
            .execute(&self.http, &self.context, request)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), "Backend call failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Wire shape of the status endpoint. The id is implied by the URL.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationStatusResponse {
    status: ReservationStatus,
    #[serde(default)]
    validated_booking_information: bool,
    #[serde(default)]
    paid: bool,
    #[serde(default)]
    metadata: ReservationMetadata,
}

#[async_trait]
impl ReservationClient for HttpReservationClient {
    async fn get_reservation_status(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, ClientError> {
        let body: ReservationStatusResponse = self
            .call(self.http.get(self.reservation_url(reservation_id, "status")))
            .await?;

        tracing::debug!(
            reservation_id = %reservation_id,
            status = %body.status,
            "Fetched reservation status"
        );

        Ok(Reservation {
            id: reservation_id.clone(),
            status: body.status,
            validated_booking_information: body.validated_booking_information,
            paid: body.paid,
            metadata: body.metadata,
        })
    }

    async fn force_check_payment(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<PaymentStatusCheck, ClientError> {
        self.call(
            self.http
                .get(self.reservation_url(reservation_id, "payment/force-check")),
        )
        .await
    }

    async fn initiate_payment(
        &self,
        reservation_id: &ReservationId,
        method: PaymentProxy,
    ) -> Result<TransactionInitialization, ClientError> {
        let suffix = format!("payment/{}/init", method.as_str());
        self.call(self.http.post(self.reservation_url(reservation_id, &suffix)))
            .await
    }

    async fn get_payment_status(
        &self,
        reservation_id: &ReservationId,
        method: PaymentProxy,
    ) -> Result<PaymentStatusCheck, ClientError> {
        let suffix = format!("payment/{}/status", method.as_str());
        self.call(self.http.get(self.reservation_url(reservation_id, &suffix)))
            .await
    }

    async fn confirm_payment(
        &self,
        reservation_id: &ReservationId,
        confirmation: &PaymentConfirmation,
    ) -> Result<PaymentStatusCheck, ClientError> {
        self.call(
            self.http
                .post(self.reservation_url(reservation_id, "payment/confirm"))
                .json(confirmation),
        )
        .await
    }

    async fn get_selected_offline_payment_details(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<CustomOfflinePayment, ClientError> {
        self.call(
            self.http
                .get(self.reservation_url(reservation_id, "payment/custom-offline")),
        )
        .await
    }

    async fn resend_reservation_email(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<bool, ClientError> {
        self.call(
            self.http
                .post(self.reservation_url(reservation_id, "re-send-email")),
        )
        .await
    }
}
