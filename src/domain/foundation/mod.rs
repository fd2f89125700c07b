//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the state machine trait, and error types
//! that form the vocabulary of the checkout domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::{PurchaseContextId, ReservationId};
pub use state_machine::StateMachine;
