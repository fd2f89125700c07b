//! In-memory adapters for tests and local development.
//!
//! - `MockReservationClient` - Scriptable reservation backend
//! - `MockCheckoutWidget` / `MockCardConfirmer` - Gateway widgets
//! - `RecordingNavigator` / `RecordingNotifier` - Host port recorders

mod mock_gateway;
mod mock_reservation_client;
mod recorders;

pub use mock_gateway::{MockCardConfirmer, MockCheckoutWidget};
pub use mock_reservation_client::{MockCall, MockReservationClient};
pub use recorders::{RecordingNavigator, RecordingNotifier};
