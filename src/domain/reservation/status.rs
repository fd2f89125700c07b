//! Reservation status as reported by the backend.
//!
//! The client never assigns a status; it only observes one. Unknown wire
//! values are preserved as [`ReservationStatus::Unknown`] so that a newer
//! backend cannot break deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed enumeration of reservation statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Checkout in progress.
    Pending,

    /// Payment submitted, gateway has not answered yet.
    InPayment,

    /// Gateway accepted the payment and confirms it asynchronously.
    ExternalProcessingPayment,

    /// Waiting for an external (webhook) confirmation.
    WaitingExternalConfirmation,

    /// Buyer must pay offline (bank transfer).
    OfflinePayment,

    /// Offline payment confirmed after the tickets were issued.
    DeferredOfflinePayment,

    /// Offline payment received, finalization running.
    OfflineFinalizing,

    /// Payment captured, finalization running.
    Finalizing,

    /// Purchase completed.
    Complete,

    /// Backend could not reconcile the payment.
    Stuck,

    /// Reservation cancelled or expired.
    Cancelled,

    /// Purchase refunded with a credit note.
    CreditNoteIssued,

    /// Synthesized by the client when the reservation cannot be fetched.
    NotFound,

    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl ReservationStatus {
    /// Every status, in declaration order.
    pub const ALL: [ReservationStatus; 14] = [
        ReservationStatus::Pending,
        ReservationStatus::InPayment,
        ReservationStatus::ExternalProcessingPayment,
        ReservationStatus::WaitingExternalConfirmation,
        ReservationStatus::OfflinePayment,
        ReservationStatus::DeferredOfflinePayment,
        ReservationStatus::OfflineFinalizing,
        ReservationStatus::Finalizing,
        ReservationStatus::Complete,
        ReservationStatus::Stuck,
        ReservationStatus::Cancelled,
        ReservationStatus::CreditNoteIssued,
        ReservationStatus::NotFound,
        ReservationStatus::Unknown,
    ];

    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::InPayment => "IN_PAYMENT",
            ReservationStatus::ExternalProcessingPayment => "EXTERNAL_PROCESSING_PAYMENT",
            ReservationStatus::WaitingExternalConfirmation => "WAITING_EXTERNAL_CONFIRMATION",
            ReservationStatus::OfflinePayment => "OFFLINE_PAYMENT",
            ReservationStatus::DeferredOfflinePayment => "DEFERRED_OFFLINE_PAYMENT",
            ReservationStatus::OfflineFinalizing => "OFFLINE_FINALIZING",
            ReservationStatus::Finalizing => "FINALIZING",
            ReservationStatus::Complete => "COMPLETE",
            ReservationStatus::Stuck => "STUCK",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::CreditNoteIssued => "CREDIT_NOTE_ISSUED",
            ReservationStatus::NotFound => "NOT_FOUND",
            ReservationStatus::Unknown => "UNKNOWN",
        }
    }

    /// Returns true if the buyer can no longer act on this reservation.
    ///
    /// Used to decide when an embedding host must be told about a change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Complete
                | ReservationStatus::Finalizing
                | ReservationStatus::OfflinePayment
                | ReservationStatus::OfflineFinalizing
                | ReservationStatus::DeferredOfflinePayment
                | ReservationStatus::Stuck
                | ReservationStatus::InPayment
                | ReservationStatus::Cancelled
                | ReservationStatus::CreditNoteIssued
                | ReservationStatus::NotFound
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
