//! Payment provider adapters.
//!
//! Implements the `PaymentMethodProvider` port for the three completion
//! styles the backend's payment methods fall into:
//!
//! - Redirect - hosted checkout widget with a completion callback
//! - Embedded confirm - inline card confirmation, then status polling
//! - Deferred - offline methods confirmed out-of-band
//!
//! The provider for a method is chosen once, by [`select_provider`].

mod deferred;
mod embedded_confirm;
mod redirect;

pub use deferred::DeferredPaymentProvider;
pub use embedded_confirm::EmbeddedConfirmProvider;
pub use redirect::RedirectPaymentProvider;

use std::sync::Arc;

use crate::config::CardPollConfig;
use crate::domain::foundation::ReservationId;
use crate::domain::payment::PaymentProxy;
use crate::ports::{
    CardConfirmer, HostedCheckoutWidget, NotificationStream, PaymentMethodProvider, PaymentStream,
    ReservationClient,
};

/// Collaborators shared by all providers.
#[derive(Clone)]
pub struct ProviderDependencies {
    pub client: Arc<dyn ReservationClient>,
    pub widget: Arc<dyn HostedCheckoutWidget>,
    pub card_confirmer: Arc<dyn CardConfirmer>,
    pub card_poll: CardPollConfig,
}

/// Closed set of provider implementations.
pub enum PaymentProvider {
    Redirect(RedirectPaymentProvider),
    EmbeddedConfirm(EmbeddedConfirmProvider),
    Deferred(DeferredPaymentProvider),
}

/// Build the provider for `method`.
pub fn select_provider(
    method: PaymentProxy,
    reservation_id: ReservationId,
    deps: &ProviderDependencies,
) -> PaymentProvider {
    match method {
        PaymentProxy::Stripe => PaymentProvider::EmbeddedConfirm(EmbeddedConfirmProvider::new(
            reservation_id,
            method,
            Arc::clone(&deps.client),
            Arc::clone(&deps.card_confirmer),
            deps.card_poll.clone(),
        )),
        PaymentProxy::Paypal | PaymentProxy::Mollie | PaymentProxy::Saferpay => {
            PaymentProvider::Redirect(RedirectPaymentProvider::new(
                reservation_id,
                method,
                Arc::clone(&deps.client),
                Arc::clone(&deps.widget),
            ))
        }
        PaymentProxy::Offline | PaymentProxy::OnSite | PaymentProxy::CustomOffline => {
            PaymentProvider::Deferred(DeferredPaymentProvider::new(method))
        }
    }
}

impl PaymentMethodProvider for PaymentProvider {
    fn payment_method(&self) -> PaymentProxy {
        match self {
            PaymentProvider::Redirect(p) => p.payment_method(),
            PaymentProvider::EmbeddedConfirm(p) => p.payment_method(),
            PaymentProvider::Deferred(p) => p.payment_method(),
        }
    }

    fn payment_method_deferred(&self) -> bool {
        match self {
            PaymentProvider::Redirect(p) => p.payment_method_deferred(),
            PaymentProvider::EmbeddedConfirm(p) => p.payment_method_deferred(),
            PaymentProvider::Deferred(p) => p.payment_method_deferred(),
        }
    }

    fn pay(&self) -> PaymentStream {
        match self {
            PaymentProvider::Redirect(p) => p.pay(),
            PaymentProvider::EmbeddedConfirm(p) => p.pay(),
            PaymentProvider::Deferred(p) => p.pay(),
        }
    }

    fn status_notifications(&self) -> NotificationStream {
        match self {
            PaymentProvider::Redirect(p) => p.status_notifications(),
            PaymentProvider::EmbeddedConfirm(p) => p.status_notifications(),
            PaymentProvider::Deferred(p) => p.status_notifications(),
        }
    }
}
