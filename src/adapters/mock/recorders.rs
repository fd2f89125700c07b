//! Recording implementations of the host ports.

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::foundation::ReservationId;
use crate::domain::reservation::Route;
use crate::ports::{EmbeddedStatusMessage, EmbeddingNotifier, NavigationEvent, Navigator};

/// Navigator that records every call.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    events: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Routes navigated to, ignoring external redirects.
    pub fn routes(&self) -> Vec<Route> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NavigationEvent::Route(route) => Some(route),
                NavigationEvent::External(_) => None,
            })
            .collect()
    }

    fn push(&self, event: NavigationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &Route) {
        self.push(NavigationEvent::Route(route.clone()));
    }

    fn redirect_external(&self, url: &str) {
        self.push(NavigationEvent::External(url.to_string()));
    }
}

/// Embedding notifier that records posted messages and reported errors.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<EmbeddedStatusMessage>>>,
    errors: Arc<Mutex<Vec<(ReservationId, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<EmbeddedStatusMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> Vec<(ReservationId, String)> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EmbeddingNotifier for RecordingNotifier {
    fn post_status(&self, message: EmbeddedStatusMessage) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }

    fn report_error(&self, reservation_id: &ReservationId, message: &str) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((reservation_id.clone(), message.to_string()));
    }
}
