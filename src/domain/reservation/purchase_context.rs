//! Purchase context: the event or subscription a reservation belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{PurchaseContextId, ValidationError};

/// Kind of thing being purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseContextType {
    Event,
    Subscription,
}

impl PurchaseContextType {
    /// Path segment used in routes and API URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseContextType::Event => "event",
            PurchaseContextType::Subscription => "subscription",
        }
    }
}

impl fmt::Display for PurchaseContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PurchaseContextType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(PurchaseContextType::Event),
            "subscription" => Ok(PurchaseContextType::Subscription),
            other => Err(ValidationError::invalid_format(
                "purchase_context_type",
                format!("expected 'event' or 'subscription', got '{}'", other),
            )),
        }
    }
}

/// The event or subscription a checkout runs under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseContext {
    #[serde(rename = "type")]
    pub kind: PurchaseContextType,
    pub id: PurchaseContextId,
}

impl PurchaseContext {
    pub fn new(kind: PurchaseContextType, id: PurchaseContextId) -> Self {
        Self { kind, id }
    }

    pub fn event(short_name: PurchaseContextId) -> Self {
        Self::new(PurchaseContextType::Event, short_name)
    }

    pub fn subscription(id: PurchaseContextId) -> Self {
        Self::new(PurchaseContextType::Subscription, id)
    }
}
