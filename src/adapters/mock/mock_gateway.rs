//! Mock payment gateway widgets for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::ports::{
    CardConfirmation, CardConfirmer, HostedCheckoutWidget, PaymentError, WidgetOutcome,
    WidgetRequest,
};

/// Hosted checkout widget with a pre-configured outcome.
#[derive(Clone)]
pub struct MockCheckoutWidget {
    outcome: Arc<Mutex<Result<WidgetOutcome, PaymentError>>>,
    requests: Arc<Mutex<Vec<WidgetRequest>>>,
}

impl MockCheckoutWidget {
    /// A widget the buyer completes with `transaction_id`.
    pub fn completing(transaction_id: impl Into<String>) -> Self {
        Self::with_outcome(Ok(WidgetOutcome::Completed {
            transaction_id: Some(transaction_id.into()),
        }))
    }

    pub fn with_outcome(outcome: Result<WidgetOutcome, PaymentError>) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests the widget was opened with.
    pub fn requests(&self) -> Vec<WidgetRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl HostedCheckoutWidget for MockCheckoutWidget {
    async fn open(&self, request: WidgetRequest) -> Result<WidgetOutcome, PaymentError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Card confirmer with a pre-configured outcome.
#[derive(Clone)]
pub struct MockCardConfirmer {
    outcome: Result<CardConfirmation, PaymentError>,
    calls: Arc<AtomicUsize>,
}

impl MockCardConfirmer {
    pub fn confirming(payment_intent_id: impl Into<String>) -> Self {
        Self::with_outcome(Ok(CardConfirmation {
            payment_intent_id: Some(payment_intent_id.into()),
        }))
    }

    pub fn with_outcome(outcome: Result<CardConfirmation, PaymentError>) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardConfirmer for MockCardConfirmer {
    async fn confirm_card_payment(
        &self,
        _client_secret: &str,
    ) -> Result<CardConfirmation, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
