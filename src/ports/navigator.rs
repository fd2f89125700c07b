//! Navigator port - applies routing decisions in the embedding application.

use crate::domain::reservation::Route;

/// Port for performing navigation.
///
/// Calls are fire-and-forget; the navigator must not block.
pub trait Navigator: Send + Sync {
    /// Navigate to a route inside the checkout flow.
    fn navigate(&self, route: &Route);

    /// Leave the application for an external URL (e.g. a gateway page).
    fn redirect_external(&self, url: &str);
}

/// A navigator call captured as a value, for hosts that consume navigation
/// asynchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Route(Route),
    External(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigator_is_object_safe() {
        fn _accepts_dyn(_navigator: &dyn Navigator) {}
    }
}
