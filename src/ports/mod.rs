//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the checkout core and the outside world. Adapters implement these ports.
//!
//! ## Backend Ports
//!
//! - `ReservationClient` - Reservation backend calls
//! - `ChallengeSolver` - Anti-bot challenge solving flow
//!
//! ## Payment Ports
//!
//! - `PaymentMethodProvider` - Uniform capability set of payment providers
//! - `HostedCheckoutWidget` / `CardConfirmer` - Gateway-side interactions
//!
//! ## Host Ports
//!
//! - `Navigator` - Applies routing decisions
//! - `EmbeddingNotifier` - Posts status changes to an embedding page

mod challenge_solver;
mod embedding_notifier;
mod navigator;
mod payment_gateway;
mod payment_provider;
mod reservation_client;

pub use challenge_solver::{ChallengeError, ChallengeSolver, ChallengeToken};
pub use embedding_notifier::{EmbeddedStatusMessage, EmbeddingNotifier};
pub use navigator::{NavigationEvent, Navigator};
pub use payment_gateway::{
    CardConfirmation, CardConfirmer, HostedCheckoutWidget, PaymentError, PaymentErrorCode,
    WidgetOutcome, WidgetRequest,
};
pub use payment_provider::{NotificationStream, PaymentMethodProvider, PaymentStream};
pub use reservation_client::{ClientError, ReservationClient};
