//! Payment module - provider outcomes and payment method vocabulary.

mod proxy;
mod result;

pub use proxy::{CompletionStyle, PaymentConfirmation, PaymentProxy};
pub use result::{PaymentResult, StatusNotification};
