//! Reservation module - the server-owned purchase attempt and its views.
//!
//! The reservation status lifecycle is owned by the backend. This module
//! holds the types the client needs to mirror it:
//!
//! - `ReservationStatus` - closed status enumeration
//! - `Reservation` - last observed snapshot
//! - `CanonicalView` / `canonical_view` - the status-to-view mapping
//! - `Route` - navigation target parameterized by purchase context

mod purchase_context;
mod snapshot;
mod status;
mod view;

pub use purchase_context::{PurchaseContext, PurchaseContextType};
pub use snapshot::{
    CustomOfflinePayment, PaymentStatusCheck, Reservation, ReservationMetadata,
    TransactionInitialization,
};
pub use status::ReservationStatus;
pub use view::{canonical_view, CanonicalView, Route, SuccessVariant};
