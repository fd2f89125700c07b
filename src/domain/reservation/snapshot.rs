//! Reservation snapshot and related backend payloads.

use serde::{Deserialize, Serialize};

use super::status::ReservationStatus;
use crate::domain::foundation::ReservationId;

/// View hints attached to a reservation. Opaque to the lifecycle logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationMetadata {
    pub ready_for_confirmation: bool,
    pub hide_confirmation_buttons: bool,
}

/// Snapshot of a single purchase attempt as last observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,

    pub status: ReservationStatus,

    /// True once contact and billing data passed server-side validation.
    #[serde(default)]
    pub validated_booking_information: bool,

    /// True once funds are captured.
    #[serde(default)]
    pub paid: bool,

    #[serde(default)]
    pub metadata: ReservationMetadata,
}

impl Reservation {
    /// Synthesized snapshot used when the reservation could not be fetched.
    pub fn not_found(id: ReservationId) -> Self {
        Self {
            id,
            status: ReservationStatus::NotFound,
            validated_booking_information: false,
            paid: false,
            metadata: ReservationMetadata::default(),
        }
    }
}

/// Outcome of force-check, payment-status and payment-confirmation calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentStatusCheck {
    pub success: bool,
    pub failure: bool,
    pub redirect: bool,
    pub redirect_url: Option<String>,
    pub gateway_id_or_null: Option<String>,
}

impl PaymentStatusCheck {
    /// Returns the redirect target when the backend asked for one.
    pub fn redirect_target(&self) -> Option<&str> {
        if self.redirect {
            self.redirect_url.as_deref().filter(|url| !url.is_empty())
        } else {
            None
        }
    }

    /// Returns true if the check reached a definite outcome.
    pub fn is_settled(&self) -> bool {
        self.success || self.failure || self.redirect_target().is_some()
    }
}

/// Response of the payment initialization call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionInitialization {
    pub client_secret: Option<String>,
    pub reservation_status_changed: bool,
}

/// Instructions for a custom offline payment method chosen by the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomOfflinePayment {
    pub payment_method_id: String,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_deserializes_with_missing_flags() {
        let json = r#"{"id":"r-1","status":"PENDING"}"#;
        let reservation: Reservation = serde_json::from_str(json).unwrap();

        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert!(!reservation.validated_booking_information);
        assert!(!reservation.paid);
        assert_eq!(reservation.metadata, ReservationMetadata::default());
    }

    #[test]
    fn reservation_reads_camel_case_fields() {
        let json = r#"{
            "id": "r-2",
            "status": "COMPLETE",
            "validatedBookingInformation": true,
            "paid": true,
            "metadata": {"readyForConfirmation": true, "hideConfirmationButtons": false}
        }"#;
        let reservation: Reservation = serde_json::from_str(json).unwrap();

        assert!(reservation.validated_booking_information);
        assert!(reservation.paid);
        assert!(reservation.metadata.ready_for_confirmation);
    }

    #[test]
    fn not_found_snapshot_has_synthetic_status() {
        let id = ReservationId::new("gone").unwrap();
        let reservation = Reservation::not_found(id.clone());
        assert_eq!(reservation.id, id);
        assert_eq!(reservation.status, ReservationStatus::NotFound);
    }

    #[test]
    fn redirect_target_requires_flag_and_url() {
        let mut check = PaymentStatusCheck {
            redirect_url: Some("https://pay.example/3ds".to_string()),
            ..Default::default()
        };
        assert_eq!(check.redirect_target(), None);

        check.redirect = true;
        assert_eq!(check.redirect_target(), Some("https://pay.example/3ds"));

        check.redirect_url = Some(String::new());
        assert_eq!(check.redirect_target(), None);
        assert!(!check.is_settled());
    }
}
