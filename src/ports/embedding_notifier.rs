//! Embedding notifier port - reports to the host page when checkout runs embedded.
//!
//! Notifications are fire-and-forget: no acknowledgement is expected and a
//! failed delivery must never affect the checkout flow.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ReservationId;
use crate::domain::reservation::ReservationStatus;

/// Structured notification posted to the embedding host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedStatusMessage {
    pub status: ReservationStatus,
    pub reservation_id: ReservationId,
}

/// Port for talking to the embedding context.
pub trait EmbeddingNotifier: Send + Sync {
    /// Post a terminal status change.
    fn post_status(&self, message: EmbeddedStatusMessage);

    /// Surface a non-fatal error to the buyer (e.g. a failed force check).
    fn report_error(&self, reservation_id: &ReservationId, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_camel_case() {
        let message = EmbeddedStatusMessage {
            status: ReservationStatus::Complete,
            reservation_id: ReservationId::new("r-1").unwrap(),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["status"], "COMPLETE");
        assert_eq!(json["reservationId"], "r-1");
    }

    #[test]
    fn embedding_notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn EmbeddingNotifier) {}
    }
}
