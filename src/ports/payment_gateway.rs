//! Payment gateway ports - the buyer-facing halves of external gateways.
//!
//! Defines the contracts payment providers drive to complete an interaction:
//! a hosted checkout widget (redirect-and-callback gateways) and an inline
//! card confirmer (confirm-then-poll gateways).
//!
//! # Design
//!
//! - **Gateway agnostic**: providers only see these traits
//! - **Never throws silently**: every gateway failure is a `PaymentError`
//!   that the provider turns into a failed `PaymentResult`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ReservationId;
use crate::domain::payment::PaymentProxy;
use crate::ports::ClientError;

/// Port for hosted checkout widgets (PayPal, Mollie, Saferpay, ...).
#[async_trait]
pub trait HostedCheckoutWidget: Send + Sync {
    /// Open the widget and suspend until its completion callback fires.
    async fn open(&self, request: WidgetRequest) -> Result<WidgetOutcome, PaymentError>;
}

/// Port for inline card confirmation (e.g. 3-D Secure).
#[async_trait]
pub trait CardConfirmer: Send + Sync {
    /// Confirm the card payment identified by `client_secret`.
    async fn confirm_card_payment(&self, client_secret: &str)
        -> Result<CardConfirmation, PaymentError>;
}

/// Request to open a hosted checkout widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetRequest {
    pub reservation_id: ReservationId,
    pub method: PaymentProxy,

    /// Session token issued by the backend when the payment was initiated.
    pub session_token: Option<String>,
}

/// How the hosted widget finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// The buyer completed the gateway flow.
    Completed { transaction_id: Option<String> },

    /// The buyer closed the widget without completing.
    Closed,
}

/// Result of an inline card confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardConfirmation {
    /// Gateway payment reference, if the gateway returned one.
    pub payment_intent_id: Option<String>,
}

/// Errors from payment gateway interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a card declined error.
    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    /// Create an authentication (3-D Secure) failure.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationFailed, message)
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<ClientError> for PaymentError {
    fn from(err: ClientError) -> Self {
        let code = if err.is_transient() {
            PaymentErrorCode::NetworkError
        } else {
            PaymentErrorCode::ProviderError
        };
        PaymentError::new(code, err.to_string())
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Card was declined.
    CardDeclined,

    /// Insufficient funds.
    InsufficientFunds,

    /// Strong customer authentication failed or was cancelled.
    AuthenticationFailed,

    /// Gateway or backend rejected the operation.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::NetworkError)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::AuthenticationFailed => "authentication_failed",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
