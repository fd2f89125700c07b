//! Outcomes emitted by payment providers.

use serde::{Deserialize, Serialize};

/// Outcome of a single payment provider attempt.
///
/// Ephemeral: produced once per `pay()` invocation and consumed immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,

    /// Present on success when the gateway issued a transaction reference.
    pub gateway_transaction_id: Option<String>,

    pub error_message: Option<String>,

    /// Do not trust this result in isolation; re-fetch the reservation.
    pub reservation_status_changed: bool,
}

impl PaymentResult {
    pub fn succeeded(gateway_transaction_id: Option<String>) -> Self {
        Self {
            success: true,
            gateway_transaction_id,
            error_message: None,
            reservation_status_changed: false,
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            gateway_transaction_id: None,
            error_message: Some(error_message.into()),
            reservation_status_changed: false,
        }
    }

    /// The backend moved the reservation; the caller must re-resolve.
    pub fn status_changed() -> Self {
        Self {
            success: false,
            gateway_transaction_id: None,
            error_message: None,
            reservation_status_changed: true,
        }
    }
}

/// Progress report from a provider whose confirmation is asynchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNotification {
    /// Confirmation is still being checked.
    pub checking: bool,

    /// Confirmation is taking unusually long.
    pub prolonged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_expected_flags() {
        let ok = PaymentResult::succeeded(Some("pi_123".to_string()));
        assert!(ok.success);
        assert_eq!(ok.gateway_transaction_id.as_deref(), Some("pi_123"));

        let failed = PaymentResult::failed("card declined");
        assert!(!failed.success);
        assert!(!failed.reservation_status_changed);
        assert_eq!(failed.error_message.as_deref(), Some("card declined"));

        let changed = PaymentResult::status_changed();
        assert!(!changed.success);
        assert!(changed.reservation_status_changed);
    }
}
