//! Book events emitted by the Cohort matching core.
//!
//! A [`BookEvent`] is the immutable record of one observable outcome of a
//! command. Events are produced during matching, held by the cohort
//! collector, and flushed exactly once to the output sink in global
//! timestamp order.

use serde::{Deserialize, Serialize};

use crate::{Instrument, OrderId, Side, Timestamp};

/// A new resting order entered the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAdded {
    pub order_id: OrderId,
    pub instrument: Instrument,
    pub price: u32,
    pub quantity: u32,
    pub side: Side,
    pub timestamp: Timestamp,
}

/// Outcome of a cancel command. `found` is `false` when no live order
/// carried the requested id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: OrderId,
    pub found: bool,
    pub timestamp: Timestamp,
}

/// A fill between a resting order and an incoming command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExecuted {
    pub resting_order_id: OrderId,
    pub incoming_order_id: OrderId,
    /// Per-resting-order fill counter, starting at 1.
    pub execution_seq: u32,
    /// The resting order's price.
    pub price: u32,
    pub quantity: u32,
    pub timestamp: Timestamp,
}

/// One observable outcome in the output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BookEvent {
    Added(OrderAdded),
    Cancelled(OrderCancelled),
    Executed(OrderExecuted),
}

impl BookEvent {
    /// Timestamp of the command that produced this event.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Added(e) => e.timestamp,
            Self::Cancelled(e) => e.timestamp,
            Self::Executed(e) => e.timestamp,
        }
    }

    #[must_use]
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    #[must_use]
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed(_))
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

impl std::fmt::Display for BookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added(e) => write!(
                f,
                "Added[{}] {} {} {} @ {} t={}",
                e.order_id, e.instrument, e.side, e.quantity, e.price, e.timestamp
            ),
            Self::Cancelled(e) => write!(
                f,
                "Cancelled[{}] found={} t={}",
                e.order_id, e.found, e.timestamp
            ),
            Self::Executed(e) => write!(
                f,
                "Executed[{} <- {}] #{} {} @ {} t={}",
                e.resting_order_id,
                e.incoming_order_id,
                e.execution_seq,
                e.quantity,
                e.price,
                e.timestamp
            ),
        }
    }
}

impl From<OrderAdded> for BookEvent {
    fn from(value: OrderAdded) -> Self {
        Self::Added(value)
    }
}

impl From<OrderCancelled> for BookEvent {
    fn from(value: OrderCancelled) -> Self {
        Self::Cancelled(value)
    }
}

impl From<OrderExecuted> for BookEvent {
    fn from(value: OrderExecuted) -> Self {
        Self::Executed(value)
    }
}
