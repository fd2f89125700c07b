//! Reservation client port - the backend calls the checkout core consumes.
//!
//! Implementations are expected to route every call through the
//! challenge-retry middleware; callers never see a challenge unless the
//! single retry also failed or the buyer abandoned the challenge.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::ReservationId;
use crate::domain::payment::{PaymentConfirmation, PaymentProxy};
use crate::domain::reservation::{
    CustomOfflinePayment, PaymentStatusCheck, Reservation, TransactionInitialization,
};

/// Port for the reservation backend.
#[async_trait]
pub trait ReservationClient: Send + Sync {
    /// Fetch the current reservation snapshot.
    async fn get_reservation_status(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, ClientError>;

    /// Ask the backend to actively re-query the payment gateway.
    async fn force_check_payment(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<PaymentStatusCheck, ClientError>;

    /// Start a payment with the given method.
    async fn initiate_payment(
        &self,
        reservation_id: &ReservationId,
        method: PaymentProxy,
    ) -> Result<TransactionInitialization, ClientError>;

    /// Check the status of an in-flight payment.
    async fn get_payment_status(
        &self,
        reservation_id: &ReservationId,
        method: PaymentProxy,
    ) -> Result<PaymentStatusCheck, ClientError>;

    /// Confirm a payment a provider reported as successful.
    async fn confirm_payment(
        &self,
        reservation_id: &ReservationId,
        confirmation: &PaymentConfirmation,
    ) -> Result<PaymentStatusCheck, ClientError>;

    /// Details of the custom offline method the buyer selected.
    async fn get_selected_offline_payment_details(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<CustomOfflinePayment, ClientError>;

    /// Re-send the reservation confirmation email. Returns the backend's ack.
    async fn resend_reservation_email(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<bool, ClientError>;
}

/// Typed failure of a reservation client call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid backend response: {0}")]
    Decode(String),

    /// The buyer dismissed the challenge. Never retried.
    #[error("Challenge abandoned by the buyer")]
    ChallengeAbandoned,

    #[error("Challenge could not be solved: {0}")]
    ChallengeUnavailable(String),
}

impl ClientError {
    /// Returns true if the same call may succeed later without buyer action.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns the HTTP status if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
