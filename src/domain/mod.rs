//! Domain layer containing checkout types and pure lifecycle rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, state machine trait, errors)
//! - `reservation` - Reservation snapshot, status enumeration, canonical views
//! - `payment` - Payment methods and provider outcomes

pub mod foundation;
pub mod payment;
pub mod reservation;
