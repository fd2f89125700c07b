//! Redirect-style provider: hosted checkout widget with a completion callback.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::domain::foundation::ReservationId;
use crate::domain::payment::{PaymentProxy, PaymentResult};
use crate::ports::{
    HostedCheckoutWidget, NotificationStream, PaymentError, PaymentMethodProvider, PaymentStream,
    ReservationClient, WidgetOutcome, WidgetRequest,
};

/// Provider for gateways that complete inside a hosted widget.
///
/// The flow initiates the payment with the backend, opens the widget with
/// the issued session token and emits exactly one result when the widget
/// reports back.
pub struct RedirectPaymentProvider {
    reservation_id: ReservationId,
    method: PaymentProxy,
    client: Arc<dyn ReservationClient>,
    widget: Arc<dyn HostedCheckoutWidget>,
}

impl RedirectPaymentProvider {
    pub fn new(
        reservation_id: ReservationId,
        method: PaymentProxy,
        client: Arc<dyn ReservationClient>,
        widget: Arc<dyn HostedCheckoutWidget>,
    ) -> Self {
        Self {
            reservation_id,
            method,
            client,
            widget,
        }
    }

    async fn run(
        reservation_id: ReservationId,
        method: PaymentProxy,
        client: Arc<dyn ReservationClient>,
        widget: Arc<dyn HostedCheckoutWidget>,
    ) -> PaymentResult {
        let init = match client.initiate_payment(&reservation_id, method).await {
            Ok(init) => init,
            Err(e) => {
                tracing::warn!(reservation_id = %reservation_id, %method, error = %e, "Payment initialization failed");
                return PaymentResult::failed(PaymentError::from(e).message);
            }
        };

        if init.reservation_status_changed {
            return PaymentResult::status_changed();
        }

        let request = WidgetRequest {
            reservation_id: reservation_id.clone(),
            method,
            session_token: init.client_secret,
        };

        match widget.open(request).await {
            Ok(WidgetOutcome::Completed { transaction_id }) => {
                tracing::info!(reservation_id = %reservation_id, %method, "Hosted checkout completed");
                PaymentResult::succeeded(transaction_id)
            }
            Ok(WidgetOutcome::Closed) => {
                tracing::info!(reservation_id = %reservation_id, %method, "Hosted checkout closed");
                PaymentResult::failed("The payment window was closed before completion")
            }
            Err(e) => {
                tracing::warn!(reservation_id = %reservation_id, %method, error = %e, "Hosted checkout failed");
                PaymentResult::failed(e.message)
            }
        }
    }
}

impl PaymentMethodProvider for RedirectPaymentProvider {
    fn payment_method(&self) -> PaymentProxy {
        self.method
    }

    fn payment_method_deferred(&self) -> bool {
        false
    }

    fn pay(&self) -> PaymentStream {
        stream::once(Self::run(
            self.reservation_id.clone(),
            self.method,
            Arc::clone(&self.client),
            Arc::clone(&self.widget),
        ))
        .boxed()
    }

    fn status_notifications(&self) -> NotificationStream {
        stream::empty().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockCall, MockCheckoutWidget, MockReservationClient};
    use crate::domain::reservation::TransactionInitialization;
    use crate::ports::ClientError;

    fn provider(client: &MockReservationClient, widget: &MockCheckoutWidget) -> RedirectPaymentProvider {
        RedirectPaymentProvider::new(
            ReservationId::new("r-1").unwrap(),
            PaymentProxy::Paypal,
            Arc::new(client.clone()),
            Arc::new(widget.clone()),
        )
    }

    #[tokio::test]
    async fn completed_widget_yields_success_with_transaction() {
        let client = MockReservationClient::new();
        client.set_initialization(Ok(TransactionInitialization {
            client_secret: Some("session-1".into()),
            reservation_status_changed: false,
        }));
        let widget = MockCheckoutWidget::completing("tx-42");

        let results: Vec<_> = provider(&client, &widget).pay().collect().await;

        assert_eq!(results, vec![PaymentResult::succeeded(Some("tx-42".into()))]);
        assert_eq!(widget.requests()[0].session_token.as_deref(), Some("session-1"));
        assert_eq!(client.calls(), vec![MockCall::InitiatePayment(PaymentProxy::Paypal)]);
    }

    #[tokio::test]
    async fn closed_widget_yields_failure() {
        let client = MockReservationClient::new();
        let widget = MockCheckoutWidget::with_outcome(Ok(WidgetOutcome::Closed));

        let results: Vec<_> = provider(&client, &widget).pay().collect().await;

        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert!(results[0].error_message.is_some());
    }

    #[tokio::test]
    async fn widget_error_is_surfaced_not_swallowed() {
        let client = MockReservationClient::new();
        let widget = MockCheckoutWidget::with_outcome(Err(PaymentError::provider("gateway down")));

        let results: Vec<_> = provider(&client, &widget).pay().collect().await;

        assert_eq!(results, vec![PaymentResult::failed("gateway down")]);
    }

    #[tokio::test]
    async fn status_change_at_initialization_skips_widget() {
        let client = MockReservationClient::new();
        client.set_initialization(Ok(TransactionInitialization {
            client_secret: None,
            reservation_status_changed: true,
        }));
        let widget = MockCheckoutWidget::completing("tx-1");

        let results: Vec<_> = provider(&client, &widget).pay().collect().await;

        assert_eq!(results, vec![PaymentResult::status_changed()]);
        assert!(widget.requests().is_empty());
    }

    #[tokio::test]
    async fn initialization_error_yields_failure() {
        let client = MockReservationClient::new();
        client.set_initialization(Err(ClientError::Network("reset".into())));
        let widget = MockCheckoutWidget::completing("tx-1");

        let results: Vec<_> = provider(&client, &widget).pay().collect().await;

        assert!(!results[0].success);
        assert!(widget.requests().is_empty());
    }

    #[tokio::test]
    async fn no_progress_notifications() {
        let client = MockReservationClient::new();
        let widget = MockCheckoutWidget::completing("tx-1");
        let notifications: Vec<_> = provider(&client, &widget)
            .status_notifications()
            .collect()
            .await;
        assert!(notifications.is_empty());
    }
}
