//! HTTP adapters - reservation backend access over reqwest.
//!
//! - `challenge` - Challenge-retry middleware and token context
//! - `reservation_client` - `ReservationClient` implementation

mod challenge;
mod reservation_client;

pub use challenge::{ChallengeContext, ChallengeRetry};
pub use reservation_client::HttpReservationClient;
