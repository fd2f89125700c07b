//! Polling and escalation configuration
//!
//! Defaults reproduce the long-standing production cadence: a 2 s status
//! poll that escalates every 10 checks and switches to the "provider is
//! slow" warning after 120 checks (about four minutes), and a 1 s card
//! confirmation poll that reports progress every 10 ticks.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment confirmation poller configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PollerConfig {
    /// Milliseconds between status checks
    #[serde(default = "default_poller_interval")]
    pub interval_ms: u64,

    /// Escalation is evaluated on every multiple of this count
    #[serde(default = "default_every")]
    pub escalation_every: u32,

    /// Check count above which the slow-provider warning replaces force check
    #[serde(default = "default_threshold")]
    pub escalation_threshold: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poller_interval(),
            escalation_every: default_every(),
            escalation_threshold: default_threshold(),
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_ms == 0 {
            return Err(ValidationError::InvalidInterval("POLLER__INTERVAL_MS"));
        }
        if self.escalation_every == 0 {
            return Err(ValidationError::InvalidEscalationPeriod(
                "POLLER__ESCALATION_EVERY",
            ));
        }
        Ok(())
    }
}

/// Card confirmation polling configuration (embedded-confirm providers)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardPollConfig {
    /// Milliseconds between payment status checks
    #[serde(default = "default_card_interval")]
    pub interval_ms: u64,

    /// A progress notification is emitted on every multiple of this tick
    #[serde(default = "default_every")]
    pub notify_every: u32,

    /// Tick count above which notifications are flagged as prolonged
    #[serde(default = "default_threshold")]
    pub prolonged_after: u32,
}

impl Default for CardPollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_card_interval(),
            notify_every: default_every(),
            prolonged_after: default_threshold(),
        }
    }
}

impl CardPollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_ms == 0 {
            return Err(ValidationError::InvalidInterval("CARD_POLL__INTERVAL_MS"));
        }
        if self.notify_every == 0 {
            return Err(ValidationError::InvalidEscalationPeriod(
                "CARD_POLL__NOTIFY_EVERY",
            ));
        }
        Ok(())
    }
}

fn default_poller_interval() -> u64 {
    2000
}

fn default_card_interval() -> u64 {
    1000
}

fn default_every() -> u32 {
    10
}

fn default_threshold() -> u32 {
    120
}
