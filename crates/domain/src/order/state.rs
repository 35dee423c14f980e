//! Order state.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The state of an order.
///
/// There are no transitions to guard: the state is whatever was last
/// written, either on save or through a targeted state update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    #[default]
    Confirmed,
    Cancelled,
}

impl OrderState {
    /// Resolves the state of a newly posted order: cancelled only when the
    /// client asked for it explicitly, confirmed otherwise.
    pub fn for_new_order(requested: Option<OrderState>) -> OrderState {
        match requested {
            Some(OrderState::Cancelled) => OrderState::Cancelled,
            Some(OrderState::Confirmed) | None => OrderState::Confirmed,
        }
    }

    /// Returns the state name as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Confirmed => "CONFIRMED",
            OrderState::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderState {
    type Err = DomainError;

    /// Parses an exact, case-sensitive state name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIRMED" => Ok(OrderState::Confirmed),
            "CANCELLED" => Ok(OrderState::Cancelled),
            other => Err(DomainError::InvalidOrderState(other.to_string())),
        }
    }
}
