//! Embedded-confirm provider: inline card confirmation, then status polling.
//!
//! After the card is confirmed the provider polls the backend's payment
//! status endpoint at a fixed interval. Polling ends on the first of:
//!
//! - a gateway error (surfaced as a failed result)
//! - the payment settling as paid
//! - the payment settling as failed, or the backend moving the reservation
//!
//! Progress is reported on a separate notification stream on every
//! `notify_every`-th tick, flagged as prolonged past `prolonged_after`.

use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::mpsc;
use futures::stream::{self, StreamExt};
use tokio::time::{self, MissedTickBehavior};

use crate::config::CardPollConfig;
use crate::domain::foundation::ReservationId;
use crate::domain::payment::{PaymentProxy, PaymentResult, StatusNotification};
use crate::ports::{
    CardConfirmation, CardConfirmer, NotificationStream, PaymentError, PaymentMethodProvider,
    PaymentStream, ReservationClient,
};

/// Provider for gateways that confirm inline and settle asynchronously.
pub struct EmbeddedConfirmProvider {
    reservation_id: ReservationId,
    method: PaymentProxy,
    client: Arc<dyn ReservationClient>,
    confirmer: Arc<dyn CardConfirmer>,
    config: CardPollConfig,
    notifications_tx: mpsc::UnboundedSender<StatusNotification>,
    notifications_rx: Mutex<Option<mpsc::UnboundedReceiver<StatusNotification>>>,
}

/// Everything one `pay()` run needs, moved into the result future.
struct ConfirmRun {
    reservation_id: ReservationId,
    method: PaymentProxy,
    client: Arc<dyn ReservationClient>,
    confirmer: Arc<dyn CardConfirmer>,
    config: CardPollConfig,
    notifications: mpsc::UnboundedSender<StatusNotification>,
}

impl EmbeddedConfirmProvider {
    pub fn new(
        reservation_id: ReservationId,
        method: PaymentProxy,
        client: Arc<dyn ReservationClient>,
        confirmer: Arc<dyn CardConfirmer>,
        config: CardPollConfig,
    ) -> Self {
        let (notifications_tx, notifications_rx) = mpsc::unbounded();
        Self {
            reservation_id,
            method,
            client,
            confirmer,
            config,
            notifications_tx,
            notifications_rx: Mutex::new(Some(notifications_rx)),
        }
    }
}

impl ConfirmRun {
    async fn execute(self) -> PaymentResult {
        let init = match self
            .client
            .initiate_payment(&self.reservation_id, self.method)
            .await
        {
            Ok(init) => init,
            Err(e) => {
                tracing::warn!(reservation_id = %self.reservation_id, error = %e, "Payment initialization failed");
                return PaymentResult::failed(PaymentError::from(e).message);
            }
        };

        if init.reservation_status_changed {
            return PaymentResult::status_changed();
        }

        let Some(client_secret) = init.client_secret else {
            return PaymentResult::failed("Payment initialization returned no client secret");
        };

        let confirmation = match self.confirmer.confirm_card_payment(&client_secret).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                tracing::info!(reservation_id = %self.reservation_id, code = %e.code, "Card confirmation failed");
                return PaymentResult::failed(e.message);
            }
        };

        self.poll_until_settled(confirmation).await
    }

    async fn poll_until_settled(self, confirmation: CardConfirmation) -> PaymentResult {
        let mut interval = time::interval(self.config.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the first check is one period in.
        interval.tick().await;

        let mut tick: u32 = 0;
        loop {
            interval.tick().await;
            tick = tick.saturating_add(1);

            let check = match self
                .client
                .get_payment_status(&self.reservation_id, self.method)
                .await
            {
                Ok(check) => check,
                Err(e) => {
                    tracing::warn!(reservation_id = %self.reservation_id, tick, error = %e, "Payment status check failed");
                    return PaymentResult::failed(PaymentError::from(e).message);
                }
            };

            if check.success {
                tracing::info!(reservation_id = %self.reservation_id, tick, "Card payment settled");
                return PaymentResult::succeeded(
                    check.gateway_id_or_null.or(confirmation.payment_intent_id),
                );
            }
            if check.failure {
                return PaymentResult::failed("The payment was declined by the gateway");
            }
            if check.redirect_target().is_some() {
                return PaymentResult::status_changed();
            }

            if tick.checked_rem(self.config.notify_every) == Some(0) {
                let notification = StatusNotification {
                    checking: true,
                    prolonged: tick > self.config.prolonged_after,
                };
                tracing::debug!(reservation_id = %self.reservation_id, tick, prolonged = notification.prolonged, "Payment still being checked");
                // The receiver may already be gone.
                let _ = self.notifications.unbounded_send(notification);
            }
        }
    }
}

impl PaymentMethodProvider for EmbeddedConfirmProvider {
    fn payment_method(&self) -> PaymentProxy {
        self.method
    }

    fn payment_method_deferred(&self) -> bool {
        false
    }

    fn pay(&self) -> PaymentStream {
        let run = ConfirmRun {
            reservation_id: self.reservation_id.clone(),
            method: self.method,
            client: Arc::clone(&self.client),
            confirmer: Arc::clone(&self.confirmer),
            config: self.config.clone(),
            notifications: self.notifications_tx.clone(),
        };
        stream::once(run.execute()).boxed()
    }

    /// Progress stream. Single consumer: later calls get an empty stream.
    fn status_notifications(&self) -> NotificationStream {
        match self
            .notifications_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(receiver) => receiver.boxed(),
            None => stream::empty().boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockCardConfirmer, MockReservationClient};
    use crate::domain::reservation::{PaymentStatusCheck, TransactionInitialization};
    use crate::ports::ClientError;
    use futures::FutureExt;

    fn client_with_secret() -> MockReservationClient {
        let client = MockReservationClient::new();
        client.set_initialization(Ok(TransactionInitialization {
            client_secret: Some("pi_secret".into()),
            reservation_status_changed: false,
        }));
        client
    }

    fn provider(client: &MockReservationClient, confirmer: MockCardConfirmer) -> EmbeddedConfirmProvider {
        EmbeddedConfirmProvider::new(
            ReservationId::new("r-1").unwrap(),
            PaymentProxy::Stripe,
            Arc::new(client.clone()),
            Arc::new(confirmer),
            CardPollConfig::default(),
        )
    }

    fn pending_then_paid(client: &MockReservationClient, pending_ticks: usize) {
        for _ in 0..pending_ticks {
            client.push_payment_status(Ok(PaymentStatusCheck::default()));
        }
        client.push_payment_status(Ok(PaymentStatusCheck {
            success: true,
            gateway_id_or_null: Some("ch_1".into()),
            ..Default::default()
        }));
    }

    fn drain(notifications: &mut NotificationStream) -> Vec<StatusNotification> {
        let mut received = Vec::new();
        while let Some(Some(n)) = notifications.next().now_or_never() {
            received.push(n);
        }
        received
    }

    #[tokio::test(start_paused = true)]
    async fn settles_after_polling() {
        let client = client_with_secret();
        pending_then_paid(&client, 3);
        let confirmer = MockCardConfirmer::confirming("pi_1");
        let provider = provider(&client, confirmer.clone());

        let result = provider.pay().next().await.unwrap();

        assert_eq!(result, PaymentResult::succeeded(Some("ch_1".into())));
        assert_eq!(confirmer.calls(), 1);
        assert_eq!(client.payment_status_calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_to_intent_id_without_gateway_id() {
        let client = client_with_secret();
        client.push_payment_status(Ok(PaymentStatusCheck {
            success: true,
            ..Default::default()
        }));
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));

        let result = provider.pay().next().await.unwrap();

        assert_eq!(result.gateway_transaction_id.as_deref(), Some("pi_1"));
    }

    #[tokio::test(start_paused = true)]
    async fn first_notification_at_tenth_tick() {
        let client = client_with_secret();
        pending_then_paid(&client, 11);
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));
        let mut notifications = provider.status_notifications();

        let result = provider.pay().next().await.unwrap();

        assert!(result.success);
        assert_eq!(
            drain(&mut notifications),
            vec![StatusNotification {
                checking: true,
                prolonged: false
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_notification_before_tenth_tick() {
        let client = client_with_secret();
        pending_then_paid(&client, 8);
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));
        let mut notifications = provider.status_notifications();

        provider.pay().next().await.unwrap();

        assert!(drain(&mut notifications).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_turn_prolonged_after_threshold() {
        let client = client_with_secret();
        pending_then_paid(&client, 131);
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));
        let mut notifications = provider.status_notifications();

        provider.pay().next().await.unwrap();

        let received = drain(&mut notifications);
        assert_eq!(received.len(), 13);
        assert!(received[..12].iter().all(|n| n.checking && !n.prolonged));
        assert!(received[12].prolonged);
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_error_terminates_with_failure() {
        let client = client_with_secret();
        client.push_payment_status(Ok(PaymentStatusCheck::default()));
        client.push_payment_status(Err(ClientError::Http {
            status: 502,
            body: String::new(),
        }));
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));

        let result = provider.pay().next().await.unwrap();

        assert!(!result.success);
        assert!(result.error_message.is_some());
        assert_eq!(client.payment_status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn declined_payment_terminates_with_failure() {
        let client = client_with_secret();
        client.push_payment_status(Ok(PaymentStatusCheck {
            failure: true,
            ..Default::default()
        }));
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));

        let result = provider.pay().next().await.unwrap();

        assert!(!result.success);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_payment_yields_exactly_one_result() {
        let client = client_with_secret();
        pending_then_paid(&client, 2);
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));

        let results: Vec<PaymentResult> = provider.pay().collect().await;

        assert_eq!(results, vec![PaymentResult::succeeded(Some("ch_1".into()))]);
        assert_eq!(client.payment_status_calls(), 3);
    }

    #[tokio::test]
    async fn declined_card_yields_exactly_one_result() {
        let client = client_with_secret();
        let confirmer =
            MockCardConfirmer::with_outcome(Err(PaymentError::card_declined("Card declined")));
        let provider = provider(&client, confirmer);

        let results: Vec<PaymentResult> = provider.pay().collect().await;

        assert_eq!(results, vec![PaymentResult::failed("Card declined")]);
    }

    #[tokio::test]
    async fn confirmation_error_is_surfaced() {
        let client = client_with_secret();
        let confirmer =
            MockCardConfirmer::with_outcome(Err(PaymentError::authentication_failed("3DS failed")));
        let provider = provider(&client, confirmer);

        let result = provider.pay().next().await.unwrap();

        assert_eq!(result, PaymentResult::failed("3DS failed"));
        assert_eq!(client.payment_status_calls(), 0);
    }

    #[tokio::test]
    async fn missing_client_secret_fails_without_confirming() {
        let client = MockReservationClient::new();
        let confirmer = MockCardConfirmer::confirming("pi_1");
        let provider = provider(&client, confirmer.clone());

        let result = provider.pay().next().await.unwrap();

        assert!(!result.success);
        assert_eq!(confirmer.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_result_stream_stops_polling() {
        let client = client_with_secret();
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));

        let mut results = provider.pay();
        let pending = tokio::time::timeout(std::time::Duration::from_millis(5500), results.next()).await;
        assert!(pending.is_err());
        drop(results);

        let calls = client.payment_status_calls();
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        assert_eq!(client.payment_status_calls(), calls);
    }

    #[test]
    fn notification_stream_has_single_consumer() {
        let client = MockReservationClient::new();
        let provider = provider(&client, MockCardConfirmer::confirming("pi_1"));

        let _first = provider.status_notifications();
        let mut second = provider.status_notifications();

        assert_eq!(second.next().now_or_never(), Some(None));
    }
}
