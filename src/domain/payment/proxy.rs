//! Payment methods offered by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateway integration behind a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentProxy {
    /// Card payment confirmed inline, then polled.
    Stripe,
    /// Hosted checkout widgets.
    Paypal,
    Mollie,
    Saferpay,
    /// Bank transfer.
    Offline,
    /// Pay at the venue.
    OnSite,
    /// Organizer-defined offline method.
    CustomOffline,
}

/// How a payment method signals completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStyle {
    /// Hosted widget with a completion callback.
    Redirect,
    /// Inline confirmation followed by status polling.
    EmbeddedConfirm,
    /// Completion confirmed out-of-band.
    Deferred,
}

impl PaymentProxy {
    pub fn completion_style(&self) -> CompletionStyle {
        match self {
            PaymentProxy::Stripe => CompletionStyle::EmbeddedConfirm,
            PaymentProxy::Paypal | PaymentProxy::Mollie | PaymentProxy::Saferpay => {
                CompletionStyle::Redirect
            }
            PaymentProxy::Offline | PaymentProxy::OnSite | PaymentProxy::CustomOffline => {
                CompletionStyle::Deferred
            }
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.completion_style() == CompletionStyle::Deferred
    }

    /// Path segment used by the backend's payment endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProxy::Stripe => "STRIPE",
            PaymentProxy::Paypal => "PAYPAL",
            PaymentProxy::Mollie => "MOLLIE",
            PaymentProxy::Saferpay => "SAFERPAY",
            PaymentProxy::Offline => "OFFLINE",
            PaymentProxy::OnSite => "ON_SITE",
            PaymentProxy::CustomOffline => "CUSTOM_OFFLINE",
        }
    }
}

impl fmt::Display for PaymentProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload sent to the backend once a provider reports success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub payment_method: PaymentProxy,
    pub gateway_token: Option<String>,
}
