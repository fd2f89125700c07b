//! Payment provider port - uniform contract over every payment method.
//!
//! Each concrete provider hides its gateway's completion signaling
//! (widget callback, confirm-then-poll, out-of-band) behind the same
//! capability set.
//!
//! # Contract
//!
//! - `pay()` emits exactly one terminal `PaymentResult`, then ends
//! - gateway failures are emitted as `PaymentResult { success: false }`,
//!   never swallowed
//! - `status_notifications()` is empty for providers that complete
//!   synchronously from the caller's point of view

use futures::stream::BoxStream;

use crate::domain::payment::{PaymentProxy, PaymentResult, StatusNotification};

/// Stream carrying the terminal outcome of one `pay()` invocation.
pub type PaymentStream = BoxStream<'static, PaymentResult>;

/// Stream of progress notifications for asynchronous confirmations.
pub type NotificationStream = BoxStream<'static, StatusNotification>;

/// Capability set implemented by every payment provider.
pub trait PaymentMethodProvider: Send + Sync {
    /// The payment method this provider completes.
    fn payment_method(&self) -> PaymentProxy;

    /// True if completion is confirmed out-of-band rather than interactively.
    fn payment_method_deferred(&self) -> bool;

    /// Begin the provider's interaction.
    ///
    /// Dropping the returned stream cancels any background work.
    fn pay(&self) -> PaymentStream;

    /// Secondary channel reporting "still checking" progress.
    fn status_notifications(&self) -> NotificationStream;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentMethodProvider) {}
    }
}
