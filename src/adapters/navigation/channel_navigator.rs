//! Navigator that forwards navigation to a host event loop.

use tokio::sync::mpsc;

use crate::domain::reservation::Route;
use crate::ports::{NavigationEvent, Navigator};

/// Sends every navigation as a [`NavigationEvent`] on an unbounded channel.
#[derive(Clone)]
pub struct ChannelNavigator {
    events: mpsc::UnboundedSender<NavigationEvent>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NavigationEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { events }, receiver)
    }

    fn send(&self, event: NavigationEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Navigation receiver closed, event dropped");
        }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: &Route) {
        tracing::info!(path = %route.path(), "Navigating");
        self.send(NavigationEvent::Route(route.clone()));
    }

    fn redirect_external(&self, url: &str) {
        tracing::info!(url = url, "Redirecting to external page");
        self.send(NavigationEvent::External(url.to_string()));
    }
}
