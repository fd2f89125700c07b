//! Deferred provider: offline and on-site methods confirmed out-of-band.

use futures::stream::{self, StreamExt};

use crate::domain::payment::{PaymentProxy, PaymentResult};
use crate::ports::{NotificationStream, PaymentMethodProvider, PaymentStream};

/// Provider that succeeds immediately; the backend confirms later.
pub struct DeferredPaymentProvider {
    method: PaymentProxy,
}

impl DeferredPaymentProvider {
    pub fn new(method: PaymentProxy) -> Self {
        Self { method }
    }
}

impl PaymentMethodProvider for DeferredPaymentProvider {
    fn payment_method(&self) -> PaymentProxy {
        self.method
    }

    fn payment_method_deferred(&self) -> bool {
        true
    }

    fn pay(&self) -> PaymentStream {
        stream::once(async { PaymentResult::succeeded(None) }).boxed()
    }

    fn status_notifications(&self) -> NotificationStream {
        stream::empty().boxed()
    }
}
