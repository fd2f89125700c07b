//! Mock reservation client for testing.
//!
//! Provides a scriptable implementation of `ReservationClient` for unit and
//! integration tests. Supports:
//! - Scripted status sequences with a fallback status
//! - Per-call delays (deterministic under paused tokio time)
//! - Error injection
//! - Call tracking

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::ReservationId;
use crate::domain::payment::{PaymentConfirmation, PaymentProxy};
use crate::domain::reservation::{
    CustomOfflinePayment, PaymentStatusCheck, Reservation, ReservationMetadata,
    ReservationStatus, TransactionInitialization,
};
use crate::ports::{ClientError, ReservationClient};

/// A call recorded by [`MockReservationClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetStatus(ReservationId),
    ForceCheck(ReservationId),
    InitiatePayment(PaymentProxy),
    GetPaymentStatus(PaymentProxy),
    ConfirmPayment(PaymentConfirmation),
    OfflineDetails(ReservationId),
    ResendEmail(ReservationId),
}

struct ScriptedStatus {
    result: Result<(ReservationStatus, bool), ClientError>,
    delay: Option<Duration>,
}

#[derive(Default)]
struct MockState {
    statuses: VecDeque<ScriptedStatus>,
    fallback: Option<(ReservationStatus, bool)>,
    force_check: Option<Result<PaymentStatusCheck, ClientError>>,
    force_check_delay: Option<Duration>,
    payment_statuses: VecDeque<Result<PaymentStatusCheck, ClientError>>,
    initialization: Option<Result<TransactionInitialization, ClientError>>,
    confirmation: Option<Result<PaymentStatusCheck, ClientError>>,
    offline_details: Option<CustomOfflinePayment>,
    calls: Vec<MockCall>,
}

/// Mock reservation backend.
///
/// # Example
///
/// ```ignore
/// let client = MockReservationClient::new()
///     .with_status(ReservationStatus::Pending, true);
///
/// client.push_status(ReservationStatus::Complete, true);
/// let reservation = client.get_reservation_status(&id).await?;
/// assert_eq!(client.status_calls(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockReservationClient {
    inner: Arc<Mutex<MockState>>,
}

impl MockReservationClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Status returned once the scripted sequence is exhausted.
    pub fn with_status(self, status: ReservationStatus, validated: bool) -> Self {
        self.state().fallback = Some((status, validated));
        self
    }

    /// Replace the fallback status.
    pub fn set_status(&self, status: ReservationStatus, validated: bool) {
        self.state().fallback = Some((status, validated));
    }

    /// Queue a status for the next status call.
    pub fn push_status(&self, status: ReservationStatus, validated: bool) {
        self.state().statuses.push_back(ScriptedStatus {
            result: Ok((status, validated)),
            delay: None,
        });
    }

    /// Queue a status that is answered only after `delay`.
    pub fn push_delayed_status(&self, status: ReservationStatus, validated: bool, delay: Duration) {
        self.state().statuses.push_back(ScriptedStatus {
            result: Ok((status, validated)),
            delay: Some(delay),
        });
    }

    /// Queue an error for the next status call.
    pub fn push_status_error(&self, error: ClientError) {
        self.state().statuses.push_back(ScriptedStatus {
            result: Err(error),
            delay: None,
        });
    }

    pub fn set_force_check(&self, result: Result<PaymentStatusCheck, ClientError>) {
        self.state().force_check = Some(result);
    }

    /// Answer force checks only after `delay`.
    pub fn delay_force_check(&self, delay: Duration) {
        self.state().force_check_delay = Some(delay);
    }

    /// Queue an answer of the payment status endpoint. Unscripted calls
    /// answer "still pending".
    pub fn push_payment_status(&self, result: Result<PaymentStatusCheck, ClientError>) {
        self.state().payment_statuses.push_back(result);
    }

    pub fn set_initialization(&self, result: Result<TransactionInitialization, ClientError>) {
        self.state().initialization = Some(result);
    }

    pub fn set_confirmation(&self, result: Result<PaymentStatusCheck, ClientError>) {
        self.state().confirmation = Some(result);
    }

    pub fn set_offline_details(&self, details: CustomOfflinePayment) {
        self.state().offline_details = Some(details);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Number of status fetches received.
    pub fn status_calls(&self) -> usize {
        self.count(|c| matches!(c, MockCall::GetStatus(_)))
    }

    pub fn force_check_calls(&self) -> usize {
        self.count(|c| matches!(c, MockCall::ForceCheck(_)))
    }

    pub fn payment_status_calls(&self) -> usize {
        self.count(|c| matches!(c, MockCall::GetPaymentStatus(_)))
    }

    fn count(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: MockCall) {
        self.state().calls.push(call);
    }
}

#[async_trait]
impl ReservationClient for MockReservationClient {
    async fn get_reservation_status(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, ClientError> {
        let scripted = {
            let mut state = self.state();
            state.calls.push(MockCall::GetStatus(reservation_id.clone()));
            match state.statuses.pop_front() {
                Some(scripted) => scripted,
                None => ScriptedStatus {
                    result: state.fallback.ok_or_else(|| ClientError::Http {
                        status: 404,
                        body: String::new(),
                    }),
                    delay: None,
                },
            }
        };

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        scripted.result.map(|(status, validated)| Reservation {
            id: reservation_id.clone(),
            status,
            validated_booking_information: validated,
            paid: matches!(status, ReservationStatus::Complete),
            metadata: ReservationMetadata::default(),
        })
    }

    async fn force_check_payment(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<PaymentStatusCheck, ClientError> {
        let (result, delay) = {
            let mut state = self.state();
            state.calls.push(MockCall::ForceCheck(reservation_id.clone()));
            (state.force_check.clone(), state.force_check_delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        result.unwrap_or_else(|| Ok(PaymentStatusCheck::default()))
    }

    async fn initiate_payment(
        &self,
        _reservation_id: &ReservationId,
        method: PaymentProxy,
    ) -> Result<TransactionInitialization, ClientError> {
        self.record(MockCall::InitiatePayment(method));
        self.state()
            .initialization
            .clone()
            .unwrap_or_else(|| Ok(TransactionInitialization::default()))
    }

    async fn get_payment_status(
        &self,
        _reservation_id: &ReservationId,
        method: PaymentProxy,
    ) -> Result<PaymentStatusCheck, ClientError> {
        let mut state = self.state();
        state.calls.push(MockCall::GetPaymentStatus(method));
        state
            .payment_statuses
            .pop_front()
            .unwrap_or_else(|| Ok(PaymentStatusCheck::default()))
    }

    async fn confirm_payment(
        &self,
        _reservation_id: &ReservationId,
        confirmation: &PaymentConfirmation,
    ) -> Result<PaymentStatusCheck, ClientError> {
        self.record(MockCall::ConfirmPayment(confirmation.clone()));
        self.state().confirmation.clone().unwrap_or_else(|| {
            Ok(PaymentStatusCheck {
                success: true,
                ..Default::default()
            })
        })
    }

    async fn get_selected_offline_payment_details(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<CustomOfflinePayment, ClientError> {
        self.record(MockCall::OfflineDetails(reservation_id.clone()));
        self.state()
            .offline_details
            .clone()
            .ok_or_else(|| ClientError::Http {
                status: 404,
                body: String::new(),
            })
    }

    async fn resend_reservation_email(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<bool, ClientError> {
        self.record(MockCall::ResendEmail(reservation_id.clone()));
        Ok(true)
    }
}
