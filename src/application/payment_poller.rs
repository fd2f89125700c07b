//! Payment confirmation poller.
//!
//! Backs the "processing" view while a gateway confirms a payment out of
//! band. The poller re-reads the reservation on a fixed interval until its
//! status leaves the baseline observed on entry, then hands routing back to
//! the reservation guard.
//!
//! # Escalation
//!
//! Unchanged reads are counted. On every `escalation_every`-th count:
//!
//! - up to `escalation_threshold`, the manual force-check affordance is
//!   shown (unless a force check is already running)
//! - past it, the slow-provider warning replaces the affordance and the
//!   poller enters [`PollerPhase::Escalated`]
//!
//! # Cancellation
//!
//! [`PaymentConfirmationPoller::cancel`] marks the poller cancelled under
//! the same lock that guards its state, signals the loop and aborts the
//! task. A read that completes afterwards finds the mark and is dropped
//! without touching state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::PollerConfig;
use crate::domain::foundation::{ReservationId, StateMachine, ValidationError};
use crate::domain::reservation::{CanonicalView, PurchaseContext, Reservation, ReservationStatus};
use crate::ports::{ClientError, EmbeddedStatusMessage, EmbeddingNotifier, ReservationClient};

use super::reservation_guard::{ActivationOutcome, ReservationRouter};

/// Lifecycle of one poller instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollerPhase {
    /// Created, not yet started.
    Idle,
    Polling,
    /// Slow-provider warning shown; polling continues.
    Escalated,
    /// The reservation moved on and routing was handed back.
    Resolved,
    /// Cancelled, or stopped on an unrecoverable error.
    Stopped,
}

impl StateMachine for PollerPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PollerPhase::*;
        matches!(
            (self, target),
            (Idle, Polling)
                | (Idle, Stopped)
                | (Polling, Escalated)
                | (Polling, Resolved)
                | (Polling, Stopped)
                | (Escalated, Resolved)
                | (Escalated, Stopped)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PollerPhase::*;
        match self {
            Idle => vec![Polling, Stopped],
            Polling => vec![Escalated, Resolved, Stopped],
            Escalated => vec![Resolved, Stopped],
            Resolved | Stopped => vec![],
        }
    }
}

/// Observable poller state, published after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSnapshot {
    pub phase: PollerPhase,
    pub check_count: u32,
    pub force_check_visible: bool,
    pub provider_warning_visible: bool,
    pub force_check_in_progress: bool,
}

impl PollerSnapshot {
    fn initial() -> Self {
        Self {
            phase: PollerPhase::Idle,
            check_count: 0,
            force_check_visible: false,
            provider_warning_visible: false,
            force_check_in_progress: false,
        }
    }
}

/// Reservation a poller watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTarget {
    pub context: PurchaseContext,
    pub reservation_id: ReservationId,

    /// Status observed when the processing view was entered.
    pub baseline: ReservationStatus,
}

/// Result of a buyer-triggered force check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForceCheckOutcome {
    /// The backend sent the buyer to an external page.
    Redirected(String),
    /// The payment settled and routing was handed to the guard.
    Resolved(ActivationOutcome),
    /// Nothing settled yet; polling continues.
    Pending,
    /// The request failed; the embedding host was told and polling continues.
    Failed(ClientError),
    AlreadyInProgress,
    /// The poller is not running.
    Inactive,
}

struct PollerState {
    snapshot: PollerSnapshot,
    cancelled: bool,
}

enum TickOutcome {
    Continue,
    Changed(ReservationStatus),
    Stop,
}

struct PollerShared {
    target: PollTarget,
    client: Arc<dyn ReservationClient>,
    router: Arc<ReservationRouter>,
    notifier: Arc<dyn EmbeddingNotifier>,
    config: PollerConfig,
    state: Mutex<PollerState>,
    updates: watch::Sender<PollerSnapshot>,
    shutdown: watch::Sender<bool>,
}

/// Polls a reservation until its payment confirmation lands.
pub struct PaymentConfirmationPoller {
    shared: Arc<PollerShared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PaymentConfirmationPoller {
    pub fn new(
        target: PollTarget,
        client: Arc<dyn ReservationClient>,
        router: Arc<ReservationRouter>,
        notifier: Arc<dyn EmbeddingNotifier>,
        config: PollerConfig,
    ) -> Self {
        let (updates, _) = watch::channel(PollerSnapshot::initial());
        let (shutdown, _) = watch::channel(false);

        Self {
            shared: Arc::new(PollerShared {
                target,
                client,
                router,
                notifier,
                config,
                state: Mutex::new(PollerState {
                    snapshot: PollerSnapshot::initial(),
                    cancelled: false,
                }),
                updates,
                shutdown,
            }),
            task: Mutex::new(None),
        }
    }

    /// Start polling. Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the poller was already started.
    pub fn start(&self) -> Result<(), ValidationError> {
        {
            let mut state = self.shared.lock();
            state.snapshot.phase = state.snapshot.phase.transition_to(PollerPhase::Polling)?;
            self.shared.publish(state.snapshot);
        }

        tracing::info!(
            reservation_id = %self.shared.target.reservation_id,
            baseline = %self.shared.target.baseline,
            interval_ms = self.shared.config.interval_ms,
            "Payment confirmation polling started"
        );

        let handle = tokio::spawn(run(Arc::clone(&self.shared)));
        *self.task_slot() = Some(handle);
        Ok(())
    }

    /// Stop polling. No tick is acted upon after this returns.
    pub fn cancel(&self) {
        {
            let mut state = self.shared.lock();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            if let Ok(next) = state.snapshot.phase.transition_to(PollerPhase::Stopped) {
                state.snapshot.phase = next;
            }
            state.snapshot.force_check_in_progress = false;
            state.snapshot.force_check_visible = false;
            self.shared.publish(state.snapshot);
        }

        self.shared.shutdown.send_replace(true);
        self.abort_task();
        tracing::debug!(
            reservation_id = %self.shared.target.reservation_id,
            "Payment confirmation polling cancelled"
        );
    }

    /// Current state.
    pub fn snapshot(&self) -> PollerSnapshot {
        self.shared.lock().snapshot
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PollerSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Ask the backend to re-query the gateway now.
    pub async fn force_check(&self) -> ForceCheckOutcome {
        {
            let mut state = self.shared.lock();
            if state.cancelled
                || state.snapshot.phase == PollerPhase::Idle
                || state.snapshot.phase.is_terminal()
            {
                return ForceCheckOutcome::Inactive;
            }
            if state.snapshot.force_check_in_progress {
                return ForceCheckOutcome::AlreadyInProgress;
            }
            state.snapshot.force_check_in_progress = true;
            state.snapshot.force_check_visible = false;
            self.shared.publish(state.snapshot);
        }

        let reservation_id = &self.shared.target.reservation_id;
        tracing::info!(reservation_id = %reservation_id, "Force check requested");

        let check = match self.shared.client.force_check_payment(reservation_id).await {
            Ok(check) => check,
            Err(e) => {
                if !self.shared.finish_force_check() {
                    tracing::debug!(reservation_id = %reservation_id, error = %e, "Force check failed after cancel, discarded");
                    return ForceCheckOutcome::Inactive;
                }
                tracing::warn!(reservation_id = %reservation_id, error = %e, "Force check failed");
                self.shared.notifier.report_error(reservation_id, &e.to_string());
                return ForceCheckOutcome::Failed(e);
            }
        };

        if let Some(url) = check.redirect_target() {
            if !self.shared.claim_resolution() {
                return ForceCheckOutcome::Inactive;
            }
            self.abort_task();
            if !self.shared.redirect_external(url) {
                return ForceCheckOutcome::Inactive;
            }
            return ForceCheckOutcome::Redirected(url.to_string());
        }

        if check.success || check.failure {
            if !self.shared.claim_resolution() {
                return ForceCheckOutcome::Inactive;
            }
            self.abort_task();
            return ForceCheckOutcome::Resolved(self.shared.reroute().await);
        }

        if !self.shared.finish_force_check() {
            return ForceCheckOutcome::Inactive;
        }
        ForceCheckOutcome::Pending
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn abort_task(&self) {
        if let Some(handle) = self.task_slot().take() {
            handle.abort();
        }
    }
}

impl Drop for PaymentConfirmationPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl PollerShared {
    fn lock(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: PollerSnapshot) {
        self.updates.send_replace(snapshot);
    }

    /// Fold one status read into the state.
    fn apply_tick(&self, result: Result<Reservation, ClientError>) -> TickOutcome {
        let mut state = self.lock();
        if state.cancelled || state.snapshot.phase.is_terminal() {
            return TickOutcome::Stop;
        }

        let reservation = match result {
            Ok(reservation) => reservation,
            Err(ClientError::ChallengeAbandoned) => {
                tracing::info!(
                    reservation_id = %self.target.reservation_id,
                    "Challenge abandoned, polling stopped"
                );
                if let Ok(next) = state.snapshot.phase.transition_to(PollerPhase::Stopped) {
                    state.snapshot.phase = next;
                }
                state.snapshot.force_check_visible = false;
                self.publish(state.snapshot);
                drop(state);
                self.notifier.report_error(
                    &self.target.reservation_id,
                    &ClientError::ChallengeAbandoned.to_string(),
                );
                return TickOutcome::Stop;
            }
            Err(e) => {
                tracing::warn!(
                    reservation_id = %self.target.reservation_id,
                    error = %e,
                    "Status check failed, will retry on next tick"
                );
                return TickOutcome::Continue;
            }
        };

        if reservation.status != self.target.baseline {
            return match state.snapshot.phase.transition_to(PollerPhase::Resolved) {
                Ok(next) => {
                    state.snapshot.phase = next;
                    state.snapshot.force_check_visible = false;
                    self.publish(state.snapshot);
                    tracing::info!(
                        reservation_id = %self.target.reservation_id,
                        from = %self.target.baseline,
                        to = %reservation.status,
                        checks = state.snapshot.check_count,
                        "Reservation status changed"
                    );
                    TickOutcome::Changed(reservation.status)
                }
                Err(_) => TickOutcome::Stop,
            };
        }

        let snapshot = &mut state.snapshot;
        snapshot.check_count = snapshot.check_count.saturating_add(1);
        let count = snapshot.check_count;

        if count.checked_rem(self.config.escalation_every) == Some(0) {
            if count <= self.config.escalation_threshold {
                snapshot.force_check_visible = !snapshot.force_check_in_progress;
            } else {
                snapshot.provider_warning_visible = true;
                snapshot.force_check_visible = false;
                if snapshot.phase == PollerPhase::Polling {
                    snapshot.phase = PollerPhase::Escalated;
                    tracing::warn!(
                        reservation_id = %self.target.reservation_id,
                        checks = count,
                        "Payment confirmation is taking unusually long"
                    );
                }
            }
        }

        self.publish(state.snapshot);
        TickOutcome::Continue
    }

    /// Move to `Resolved` unless cancelled or already finished.
    fn claim_resolution(&self) -> bool {
        let mut state = self.lock();
        if state.cancelled {
            return false;
        }
        match state.snapshot.phase.transition_to(PollerPhase::Resolved) {
            Ok(next) => {
                state.snapshot.phase = next;
                state.snapshot.force_check_in_progress = false;
                state.snapshot.force_check_visible = false;
                self.publish(state.snapshot);
                true
            }
            Err(_) => false,
        }
    }

    /// Clear the in-progress flag. Returns false once cancelled.
    fn finish_force_check(&self) -> bool {
        let mut state = self.lock();
        if state.cancelled {
            return false;
        }
        state.snapshot.force_check_in_progress = false;
        self.publish(state.snapshot);
        true
    }

    /// Leave the application unless cancelled. Returns false once cancelled.
    fn redirect_external(&self, url: &str) -> bool {
        let state = self.lock();
        if state.cancelled {
            return false;
        }
        self.router.redirect_external(url);
        true
    }

    fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Hand routing back to the guard.
    async fn reroute(&self) -> ActivationOutcome {
        // Issued under the state lock: no ticket is taken after `cancel()` returns.
        let ticket = {
            let state = self.lock();
            if state.cancelled {
                return ActivationOutcome::Superseded;
            }
            self.router.begin()
        };
        let decision = self
            .router
            .guard()
            .resolve(
                &self.target.context,
                &self.target.reservation_id,
                CanonicalView::Processing,
            )
            .await;

        let state = self.lock();
        if state.cancelled {
            return ActivationOutcome::Superseded;
        }
        self.router.apply(ticket, decision)
    }
}

async fn run(shared: Arc<PollerShared>) {
    let mut shutdown = shared.shutdown.subscribe();
    let mut interval = time::interval(shared.config.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first read is one period in.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.changed() => return,
            _ = interval.tick() => {}
        }

        let result = tokio::select! {
            _ = shutdown.changed() => return,
            result = shared.client.get_reservation_status(&shared.target.reservation_id) => result,
        };

        match shared.apply_tick(result) {
            TickOutcome::Continue => {}
            TickOutcome::Stop => return,
            TickOutcome::Changed(status) => {
                if status.is_terminal() && !shared.is_cancelled() {
                    shared.notifier.post_status(EmbeddedStatusMessage {
                        status,
                        reservation_id: shared.target.reservation_id.clone(),
                    });
                }
                shared.reroute().await;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockReservationClient, RecordingNavigator, RecordingNotifier};
    use crate::application::reservation_guard::GuardDecision;
    use crate::domain::foundation::PurchaseContextId;
    use crate::domain::reservation::{PaymentStatusCheck, Route};
    use crate::ports::NavigationEvent;
    use std::sync::mpsc;
    use std::time::Duration;
    use tokio::time::{sleep, sleep_until, Instant};

    /// Notifier whose `post_status` blocks until the test releases it.
    struct GatedNotifier {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl EmbeddingNotifier for GatedNotifier {
        fn post_status(&self, _message: EmbeddedStatusMessage) {
            let _ = self.entered.lock().unwrap().send(());
            let _ = self
                .release
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5));
        }

        fn report_error(&self, _reservation_id: &ReservationId, _message: &str) {}
    }

    struct Fixture {
        client: MockReservationClient,
        navigator: RecordingNavigator,
        notifier: RecordingNotifier,
        poller: PaymentConfirmationPoller,
    }

    fn context() -> PurchaseContext {
        PurchaseContext::event(PurchaseContextId::new("conf-2026").unwrap())
    }

    fn rid() -> ReservationId {
        ReservationId::new("r-1").unwrap()
    }

    fn fixture(client: MockReservationClient, baseline: ReservationStatus) -> Fixture {
        let navigator = RecordingNavigator::new();
        let notifier = RecordingNotifier::new();
        let router = Arc::new(ReservationRouter::new(
            Arc::new(client.clone()),
            Arc::new(navigator.clone()),
        ));
        let poller = PaymentConfirmationPoller::new(
            PollTarget {
                context: context(),
                reservation_id: rid(),
                baseline,
            },
            Arc::new(client.clone()),
            router,
            Arc::new(notifier.clone()),
            PollerConfig::default(),
        );

        Fixture {
            client,
            navigator,
            notifier,
            poller,
        }
    }

    fn at_tick(start: Instant, n: u64) -> Instant {
        start + Duration::from_millis(2000 * n + 500)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Phase transitions
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn phase_transitions() {
        use PollerPhase::*;
        assert!(Idle.can_transition_to(&Polling));
        assert!(Polling.can_transition_to(&Escalated));
        assert!(Escalated.can_transition_to(&Resolved));
        assert!(!Resolved.can_transition_to(&Polling));
        assert!(!Escalated.can_transition_to(&Polling));
        assert!(Resolved.is_terminal());
        assert!(Stopped.is_terminal());
        assert!(!Escalated.is_terminal());
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let f = fixture(
            MockReservationClient::new().with_status(ReservationStatus::ExternalProcessingPayment, false),
            ReservationStatus::ExternalProcessingPayment,
        );
        f.poller.start().unwrap();
        assert!(f.poller.start().is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Polling
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test(start_paused = true)]
    async fn stops_on_fourth_tick_when_status_changes() {
        let client = MockReservationClient::new().with_status(ReservationStatus::Complete, true);
        for _ in 0..3 {
            client.push_status(ReservationStatus::Pending, true);
        }
        let f = fixture(client, ReservationStatus::Pending);

        f.poller.start().unwrap();
        sleep(Duration::from_secs(60)).await;

        // Four ticks plus exactly one re-resolution by the guard.
        assert_eq!(f.client.status_calls(), 5);
        assert_eq!(f.poller.snapshot().phase, PollerPhase::Resolved);
        assert_eq!(f.poller.snapshot().check_count, 3);
        assert_eq!(
            f.navigator.events(),
            vec![NavigationEvent::Route(Route::new(context(), rid(), CanonicalView::Success))]
        );
        assert_eq!(
            f.notifier.messages(),
            vec![EmbeddedStatusMessage {
                status: ReservationStatus::Complete,
                reservation_id: rid(),
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn escalates_at_tick_ten_and_warns_past_threshold() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);

        let start = Instant::now();
        f.poller.start().unwrap();

        for n in 1..=140u64 {
            sleep_until(at_tick(start, n)).await;
            let s = f.poller.snapshot();

            assert_eq!(s.check_count as u64, n);
            assert!(!(s.force_check_visible && s.provider_warning_visible), "tick {n}");
            assert_eq!(s.force_check_visible, (10..130).contains(&n), "tick {n}");
            assert_eq!(s.provider_warning_visible, n >= 130, "tick {n}");

            let expected_phase = if n >= 130 {
                PollerPhase::Escalated
            } else {
                PollerPhase::Polling
            };
            assert_eq!(s.phase, expected_phase, "tick {n}");
        }
        assert!(f.navigator.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_keep_polling_without_counting() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        client.push_status_error(ClientError::Network("reset".into()));
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);

        let start = Instant::now();
        f.poller.start().unwrap();
        sleep_until(at_tick(start, 3)).await;

        assert_eq!(f.client.status_calls(), 3);
        assert_eq!(f.poller.snapshot().check_count, 2);
        assert_eq!(f.poller.snapshot().phase, PollerPhase::Polling);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_challenge_stops_polling() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        client.push_status_error(ClientError::ChallengeAbandoned);
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);

        f.poller.start().unwrap();
        sleep(Duration::from_secs(30)).await;

        assert_eq!(f.client.status_calls(), 1);
        assert_eq!(f.poller.snapshot().phase, PollerPhase::Stopped);
        assert_eq!(f.notifier.errors().len(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Cancellation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_tick_discards_the_late_response() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        client.push_delayed_status(ReservationStatus::Complete, true, Duration::from_secs(1));
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);

        let start = Instant::now();
        f.poller.start().unwrap();
        sleep_until(start + Duration::from_millis(2500)).await;

        assert_eq!(f.client.status_calls(), 1, "first read is in flight");
        f.poller.cancel();
        let after_cancel = f.poller.snapshot();

        sleep(Duration::from_secs(30)).await;

        assert_eq!(f.poller.snapshot(), after_cancel);
        assert_eq!(after_cancel.phase, PollerPhase::Stopped);
        assert_eq!(after_cancel.check_count, 0);
        assert_eq!(f.client.status_calls(), 1);
        assert!(f.navigator.events().is_empty());
        assert!(f.notifier.messages().is_empty());
    }

    #[test]
    fn late_read_after_cancel_mutates_nothing() {
        let f = fixture(MockReservationClient::new(), ReservationStatus::ExternalProcessingPayment);
        {
            let mut state = f.poller.shared.lock();
            state.snapshot.phase = PollerPhase::Polling;
        }
        f.poller.cancel();
        let before = f.poller.snapshot();

        let late = Reservation::not_found(rid());
        let outcome = f.poller.shared.apply_tick(Ok(late));

        assert!(matches!(outcome, TickOutcome::Stop));
        assert_eq!(f.poller.snapshot(), before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancel_while_posting_status_takes_no_navigation_ticket() {
        let client = MockReservationClient::new().with_status(ReservationStatus::Complete, true);
        let navigator = RecordingNavigator::new();
        let router = Arc::new(ReservationRouter::new(
            Arc::new(client.clone()),
            Arc::new(navigator.clone()),
        ));
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let poller = PaymentConfirmationPoller::new(
            PollTarget {
                context: context(),
                reservation_id: rid(),
                baseline: ReservationStatus::ExternalProcessingPayment,
            },
            Arc::new(client.clone()),
            Arc::clone(&router),
            Arc::new(GatedNotifier {
                entered: Mutex::new(entered_tx),
                release: Mutex::new(release_rx),
            }),
            PollerConfig::default().with_interval(Duration::from_millis(10)),
        );

        poller.start().unwrap();
        entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        poller.cancel();
        let ticket = router.begin();
        release_tx.send(()).unwrap();
        sleep(Duration::from_millis(200)).await;

        let booking = Route::new(context(), rid(), CanonicalView::Booking);
        let outcome = router.apply(ticket, GuardDecision::RedirectTo(booking.clone()));

        assert_eq!(outcome, ActivationOutcome::Redirected(booking.clone()));
        assert_eq!(navigator.routes(), vec![booking]);
        assert_eq!(client.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_poller_stops_ticks() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        let f = fixture(client.clone(), ReservationStatus::ExternalProcessingPayment);

        let start = Instant::now();
        f.poller.start().unwrap();
        sleep_until(at_tick(start, 2)).await;
        drop(f.poller);
        sleep(Duration::from_secs(30)).await;

        assert_eq!(client.status_calls(), 2);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Force check
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn force_check_before_start_is_inactive() {
        let f = fixture(MockReservationClient::new(), ReservationStatus::ExternalProcessingPayment);
        assert_eq!(f.poller.force_check().await, ForceCheckOutcome::Inactive);
        assert_eq!(f.client.force_check_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn force_check_redirect_leaves_and_stops_polling() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        client.set_force_check(Ok(PaymentStatusCheck {
            redirect: true,
            redirect_url: Some("https://gateway.example/3ds".into()),
            ..Default::default()
        }));
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);

        f.poller.start().unwrap();
        let outcome = f.poller.force_check().await;
        sleep(Duration::from_secs(30)).await;

        assert_eq!(
            outcome,
            ForceCheckOutcome::Redirected("https://gateway.example/3ds".into())
        );
        assert_eq!(f.poller.snapshot().phase, PollerPhase::Resolved);
        assert_eq!(f.client.status_calls(), 0);
        assert_eq!(
            f.navigator.events(),
            vec![NavigationEvent::External("https://gateway.example/3ds".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn force_check_success_hands_routing_to_guard() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        client.set_force_check(Ok(PaymentStatusCheck {
            success: true,
            ..Default::default()
        }));
        let f = fixture(client.clone(), ReservationStatus::ExternalProcessingPayment);

        f.poller.start().unwrap();
        client.set_status(ReservationStatus::Complete, true);
        let outcome = f.poller.force_check().await;

        let success = Route::new(context(), rid(), CanonicalView::Success);
        assert_eq!(
            outcome,
            ForceCheckOutcome::Resolved(ActivationOutcome::Redirected(success.clone()))
        );
        assert_eq!(f.navigator.routes(), vec![success]);
    }

    #[tokio::test(start_paused = true)]
    async fn force_check_failure_reports_and_keeps_polling() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        client.set_force_check(Err(ClientError::Network("timeout".into())));
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);

        let start = Instant::now();
        f.poller.start().unwrap();
        let outcome = f.poller.force_check().await;
        sleep_until(at_tick(start, 2)).await;

        assert!(matches!(outcome, ForceCheckOutcome::Failed(ClientError::Network(_))));
        assert_eq!(f.notifier.errors().len(), 1);
        let snapshot = f.poller.snapshot();
        assert!(!snapshot.force_check_in_progress);
        assert_eq!(snapshot.phase, PollerPhase::Polling);
        assert_eq!(snapshot.check_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unsettled_force_check_keeps_polling() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);

        f.poller.start().unwrap();
        assert_eq!(f.poller.force_check().await, ForceCheckOutcome::Pending);
        assert_eq!(f.poller.snapshot().phase, PollerPhase::Polling);
        assert!(!f.poller.snapshot().force_check_in_progress);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_force_check_answered_after_cancel_is_discarded() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        client.set_force_check(Err(ClientError::Network("timeout".into())));
        client.delay_force_check(Duration::from_secs(1));
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);

        f.poller.start().unwrap();
        let (outcome, after_cancel) = tokio::join!(f.poller.force_check(), async {
            sleep(Duration::from_millis(100)).await;
            f.poller.cancel();
            f.poller.snapshot()
        });
        sleep(Duration::from_secs(30)).await;

        assert_eq!(outcome, ForceCheckOutcome::Inactive);
        assert_eq!(after_cancel.phase, PollerPhase::Stopped);
        assert!(!after_cancel.force_check_in_progress);
        assert_eq!(f.poller.snapshot(), after_cancel);
        assert!(f.notifier.errors().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pending_force_check_answered_after_cancel_is_discarded() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        client.delay_force_check(Duration::from_secs(1));
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);
        let mut updates = f.poller.subscribe();

        f.poller.start().unwrap();
        let (outcome, _) = tokio::join!(f.poller.force_check(), async {
            sleep(Duration::from_millis(100)).await;
            f.poller.cancel();
            updates.borrow_and_update();
        });
        sleep(Duration::from_secs(30)).await;

        assert_eq!(outcome, ForceCheckOutcome::Inactive);
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_escalation() {
        let client = MockReservationClient::new()
            .with_status(ReservationStatus::ExternalProcessingPayment, false);
        let f = fixture(client, ReservationStatus::ExternalProcessingPayment);
        let mut updates = f.poller.subscribe();

        f.poller.start().unwrap();
        let escalated = *updates.wait_for(|s| s.force_check_visible).await.unwrap();

        assert_eq!(escalated.check_count, 10);
    }
}
