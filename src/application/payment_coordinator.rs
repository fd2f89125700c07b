//! PaymentCoordinator - runs one payment submission from the overview page.
//!
//! A submission takes the first result of the provider's `pay()` stream and
//! follows it:
//!
//! 1. Success: confirm with the backend, then follow its redirect or let the
//!    guard route to the reservation's canonical view
//! 2. Status changed: let the guard route
//! 3. Failure: let the guard route as well, since a declined attempt does
//!    not mean the reservation failed; the message is returned for display
//!
//! Only one submission may be in flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;

use crate::domain::foundation::ReservationId;
use crate::domain::payment::PaymentConfirmation;
use crate::domain::reservation::{CanonicalView, PurchaseContext};
use crate::ports::{ClientError, PaymentMethodProvider, ReservationClient};

use super::reservation_guard::{ActivationOutcome, ReservationRouter};

/// Command to submit a payment for a reservation.
#[derive(Debug, Clone)]
pub struct SubmitPaymentCommand {
    pub context: PurchaseContext,
    pub reservation_id: ReservationId,
}

/// Where a submission ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The buyer was sent to an external page.
    Redirected(String),
    /// Routed by the guard.
    Routed(ActivationOutcome),
    /// The provider reported a failure; the reservation was re-checked.
    Declined {
        message: Option<String>,
        routing: ActivationOutcome,
    },
}

/// Errors from payment submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("A payment is already being submitted")]
    AlreadySubmitting,

    #[error("Payment provider finished without a result")]
    NoResult,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Resets the in-flight flag when a submission ends or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Coordinates payment submissions.
pub struct PaymentCoordinator {
    client: Arc<dyn ReservationClient>,
    router: Arc<ReservationRouter>,
    in_flight: AtomicBool,
}

impl PaymentCoordinator {
    pub fn new(client: Arc<dyn ReservationClient>, router: Arc<ReservationRouter>) -> Self {
        Self {
            client,
            router,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns true while a submission is running.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(
        &self,
        cmd: SubmitPaymentCommand,
        provider: &dyn PaymentMethodProvider,
    ) -> Result<PaymentOutcome, CheckoutError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!(reservation_id = %cmd.reservation_id, "Ignoring duplicate payment submission");
            return Err(CheckoutError::AlreadySubmitting);
        }
        let _in_flight = InFlight(&self.in_flight);

        let method = provider.payment_method();
        tracing::info!(
            reservation_id = %cmd.reservation_id,
            %method,
            deferred = provider.payment_method_deferred(),
            "Submitting payment"
        );

        // 1. First result of the provider
        let result = provider
            .pay()
            .next()
            .await
            .ok_or(CheckoutError::NoResult)?;

        // 2. Backend moved the reservation, or the attempt failed
        if result.reservation_status_changed {
            return Ok(PaymentOutcome::Routed(self.reroute(&cmd).await));
        }
        if !result.success {
            tracing::info!(
                reservation_id = %cmd.reservation_id,
                %method,
                error = result.error_message.as_deref().unwrap_or("unknown"),
                "Payment attempt failed"
            );
            let routing = self.reroute(&cmd).await;
            return Ok(PaymentOutcome::Declined {
                message: result.error_message,
                routing,
            });
        }

        // 3. Confirm and follow the backend
        let confirmation = PaymentConfirmation {
            payment_method: method,
            gateway_token: result.gateway_transaction_id,
        };
        let check = self
            .client
            .confirm_payment(&cmd.reservation_id, &confirmation)
            .await?;

        if let Some(url) = check.redirect_target() {
            self.router.redirect_external(url);
            return Ok(PaymentOutcome::Redirected(url.to_string()));
        }

        Ok(PaymentOutcome::Routed(self.reroute(&cmd).await))
    }

    async fn reroute(&self, cmd: &SubmitPaymentCommand) -> ActivationOutcome {
        self.router
            .activate(&cmd.context, &cmd.reservation_id, CanonicalView::Overview)
            .await
    }
}
