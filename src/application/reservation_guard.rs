//! Reservation lifecycle guard.
//!
//! Runs on every route activation inside the checkout flow. It fetches the
//! reservation, maps its status to the one canonical view and either lets
//! the activation stay or redirects to that view.
//!
//! A failed fetch is treated as "not found". That also covers a backend
//! that is only briefly unreachable, so the buyer lands on the not-found
//! page in that case too.

use std::sync::Arc;

use crate::domain::foundation::ReservationId;
use crate::domain::reservation::{canonical_view, CanonicalView, PurchaseContext, Reservation, Route};
use crate::ports::{Navigator, ReservationClient};

use super::navigation_gate::{NavigationGate, NavigationTicket};

/// Result of guarding a route activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The current view is canonical.
    Stay,
    RedirectTo(Route),
}

/// What happened when a decision was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    Stayed,
    Redirected(Route),
    /// A newer navigation started while this one was deciding.
    Superseded,
}

/// Decide where a reservation belongs, given the view currently shown.
pub fn decide(
    context: &PurchaseContext,
    reservation: &Reservation,
    current_view: CanonicalView,
) -> GuardDecision {
    let target = canonical_view(reservation.status, reservation.validated_booking_information);
    if target == current_view {
        GuardDecision::Stay
    } else {
        GuardDecision::RedirectTo(Route::new(context.clone(), reservation.id.clone(), target))
    }
}

/// Fetches reservations and decides their canonical view.
pub struct ReservationGuard {
    client: Arc<dyn ReservationClient>,
}

impl ReservationGuard {
    pub fn new(client: Arc<dyn ReservationClient>) -> Self {
        Self { client }
    }

    /// Fetch the reservation, synthesizing "not found" on any failure.
    pub async fn fetch(&self, reservation_id: &ReservationId) -> Reservation {
        match self.client.get_reservation_status(reservation_id).await {
            Ok(reservation) => reservation,
            Err(e) => {
                tracing::warn!(
                    reservation_id = %reservation_id,
                    error = %e,
                    "Reservation fetch failed, treating as not found"
                );
                Reservation::not_found(reservation_id.clone())
            }
        }
    }

    /// Resolve a route activation. Reads once, mutates nothing.
    pub async fn resolve(
        &self,
        context: &PurchaseContext,
        reservation_id: &ReservationId,
        current_view: CanonicalView,
    ) -> GuardDecision {
        let reservation = self.fetch(reservation_id).await;
        let decision = decide(context, &reservation, current_view);

        tracing::debug!(
            reservation_id = %reservation_id,
            status = %reservation.status,
            current_view = %current_view,
            ?decision,
            "Resolved reservation view"
        );

        decision
    }
}

/// Applies guard decisions through a navigator, latest decision wins.
pub struct ReservationRouter {
    guard: ReservationGuard,
    navigator: Arc<dyn Navigator>,
    gate: NavigationGate,
}

impl ReservationRouter {
    pub fn new(client: Arc<dyn ReservationClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            guard: ReservationGuard::new(client),
            navigator,
            gate: NavigationGate::new(),
        }
    }

    pub fn guard(&self) -> &ReservationGuard {
        &self.guard
    }

    /// Start a navigation attempt.
    pub fn begin(&self) -> NavigationTicket {
        self.gate.issue()
    }

    /// Apply `decision` if `ticket` is still the latest attempt.
    pub fn apply(&self, ticket: NavigationTicket, decision: GuardDecision) -> ActivationOutcome {
        if !self.gate.is_current(ticket) {
            tracing::debug!(?decision, "Dropping superseded navigation decision");
            return ActivationOutcome::Superseded;
        }

        match decision {
            GuardDecision::Stay => ActivationOutcome::Stayed,
            GuardDecision::RedirectTo(route) => {
                self.navigator.navigate(&route);
                ActivationOutcome::Redirected(route)
            }
        }
    }

    /// Guard a route activation and navigate if needed.
    pub async fn activate(
        &self,
        context: &PurchaseContext,
        reservation_id: &ReservationId,
        current_view: CanonicalView,
    ) -> ActivationOutcome {
        let ticket = self.begin();
        let decision = self
            .guard
            .resolve(context, reservation_id, current_view)
            .await;
        self.apply(ticket, decision)
    }

    /// Leave the application. Supersedes every decision still in flight.
    pub fn redirect_external(&self, url: &str) {
        self.gate.issue();
        self.navigator.redirect_external(url);
    }
}
