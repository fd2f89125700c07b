//! Canonical views and the routes that lead to them.
//!
//! For every `(status, validated_booking_information)` pair there is exactly
//! one canonical view. The mapping is a pure function and is recomputed on
//! every guard activation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::purchase_context::{PurchaseContext, PurchaseContextType};
use super::status::ReservationStatus;
use crate::domain::foundation::ReservationId;

/// The page a buyer must be on for a given reservation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanonicalView {
    Booking,
    Overview,
    Success,
    OfflinePayment,
    DeferredOfflinePayment,
    Processing,
    NotFound,
    Error,
}

impl CanonicalView {
    pub const ALL: [CanonicalView; 8] = [
        CanonicalView::Booking,
        CanonicalView::Overview,
        CanonicalView::Success,
        CanonicalView::OfflinePayment,
        CanonicalView::DeferredOfflinePayment,
        CanonicalView::Processing,
        CanonicalView::NotFound,
        CanonicalView::Error,
    ];

    /// Last path segment of the view's route.
    pub fn path_suffix(&self) -> &'static str {
        match self {
            CanonicalView::Booking => "book",
            CanonicalView::Overview => "overview",
            CanonicalView::Success => "success",
            CanonicalView::OfflinePayment => "waiting-payment",
            CanonicalView::DeferredOfflinePayment => "deferred-payment",
            CanonicalView::Processing => "processing-payment",
            CanonicalView::NotFound => "not-found",
            CanonicalView::Error => "error",
        }
    }

    /// Inverse of [`CanonicalView::path_suffix`].
    pub fn from_path_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.path_suffix() == suffix)
    }
}

impl fmt::Display for CanonicalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_suffix())
    }
}

/// Maps an observed reservation state to its canonical view.
pub fn canonical_view(status: ReservationStatus, validated_booking_information: bool) -> CanonicalView {
    use ReservationStatus::*;
    match status {
        Pending if validated_booking_information => CanonicalView::Overview,
        Pending => CanonicalView::Booking,
        Complete | Finalizing => CanonicalView::Success,
        OfflinePayment | OfflineFinalizing => CanonicalView::OfflinePayment,
        DeferredOfflinePayment => CanonicalView::DeferredOfflinePayment,
        ExternalProcessingPayment | WaitingExternalConfirmation => CanonicalView::Processing,
        InPayment | Stuck => CanonicalView::Error,
        Cancelled | CreditNoteIssued | NotFound | Unknown => CanonicalView::NotFound,
    }
}

/// Which success page is shown; it depends on what was purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessVariant {
    EventTickets,
    SubscriptionSummary,
}

/// A concrete navigation target inside the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub context: PurchaseContext,
    pub reservation_id: ReservationId,
    pub view: CanonicalView,
}

impl Route {
    pub fn new(context: PurchaseContext, reservation_id: ReservationId, view: CanonicalView) -> Self {
        Self {
            context,
            reservation_id,
            view,
        }
    }

    /// Renders the route as an application path.
    pub fn path(&self) -> String {
        format!(
            "/{}/{}/reservation/{}/{}",
            self.context.kind,
            self.context.id,
            self.reservation_id,
            self.view.path_suffix()
        )
    }

    /// The success page variant, if this route targets the success view.
    pub fn success_variant(&self) -> Option<SuccessVariant> {
        if self.view != CanonicalView::Success {
            return None;
        }
        Some(match self.context.kind {
            PurchaseContextType::Event => SuccessVariant::EventTickets,
            PurchaseContextType::Subscription => SuccessVariant::SubscriptionSummary,
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
