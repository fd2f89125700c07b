//! Notifier used when checkout is not embedded.
//!
//! Status messages have no audience and are dropped; errors are logged so
//! they still reach an operator.

use crate::domain::foundation::ReservationId;
use crate::ports::{EmbeddedStatusMessage, EmbeddingNotifier};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEmbeddingNotifier;

impl EmbeddingNotifier for LoggingEmbeddingNotifier {
    fn post_status(&self, message: EmbeddedStatusMessage) {
        tracing::debug!(
            reservation_id = %message.reservation_id,
            status = %message.status,
            "Not embedded, status message dropped"
        );
    }

    fn report_error(&self, reservation_id: &ReservationId, message: &str) {
        tracing::error!(reservation_id = %reservation_id, error = message, "Checkout error");
    }
}
