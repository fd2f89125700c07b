//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the checkout core to external systems:
//! - `http` - Reservation backend client with challenge retry
//! - `challenge` - Challenge solver bridged to a UI
//! - `payment` - Payment method providers
//! - `embedding` - Embedding host notifiers
//! - `navigation` - Navigators for host event loops
//! - `mock` - In-memory adapters for tests

pub mod challenge;
pub mod embedding;
pub mod http;
pub mod mock;
pub mod navigation;
pub mod payment;

pub use challenge::{ChallengeRequest, ChannelChallengeSolver};
pub use embedding::{HttpEmbeddingNotifier, LoggingEmbeddingNotifier};
pub use http::{ChallengeContext, ChallengeRetry, HttpReservationClient};
pub use navigation::ChannelNavigator;
pub use payment::{select_provider, PaymentProvider, ProviderDependencies};
