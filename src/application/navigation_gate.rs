//! Stale-redirect suppression.
//!
//! Every navigation attempt takes a ticket before it starts its read. Only
//! the holder of the most recent ticket may navigate; a slower, older
//! decision that completes later is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Proof of when a navigation attempt started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NavigationTicket(u64);

/// Issues monotonically numbered navigation tickets.
#[derive(Debug, Default)]
pub struct NavigationGate {
    latest: AtomicU64,
}

impl NavigationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation attempt, superseding all earlier ones.
    pub fn issue(&self) -> NavigationTicket {
        NavigationTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns true if no newer attempt has started since `ticket`.
    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_is_current() {
        let gate = NavigationGate::new();
        let first = gate.issue();
        assert!(gate.is_current(first));

        let second = gate.issue();
        assert!(!gate.is_current(first));
        assert!(gate.is_current(second));
        assert!(second > first);
    }
}
