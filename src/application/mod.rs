//! Application layer - orchestrates the checkout lifecycle over the ports.
//!
//! - `reservation_guard` - Maps reservation status to its canonical view
//! - `navigation_gate` - Drops routing decisions that were superseded
//! - `payment_poller` - Waits for out-of-band payment confirmation
//! - `payment_coordinator` - Runs a payment submission end to end
//! - `reservation_actions` - Email re-send and offline payment details

pub mod navigation_gate;
pub mod payment_coordinator;
pub mod payment_poller;
pub mod reservation_actions;
pub mod reservation_guard;

pub use navigation_gate::{NavigationGate, NavigationTicket};
pub use payment_coordinator::{
    CheckoutError, PaymentCoordinator, PaymentOutcome, SubmitPaymentCommand,
};
pub use payment_poller::{
    ForceCheckOutcome, PaymentConfirmationPoller, PollTarget, PollerPhase, PollerSnapshot,
};
pub use reservation_actions::ReservationActions;
pub use reservation_guard::{
    decide, ActivationOutcome, GuardDecision, ReservationGuard, ReservationRouter,
};
