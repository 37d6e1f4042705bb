//! Command types accepted by the Cohort matching core.
//!
//! A [`Command`] is ephemeral: it lives for one processing call. Only its
//! `quantity` is mutated, as the residual while walking the opposite side.

use serde::{Deserialize, Serialize};

use crate::{Instrument, OrderId};

/// Which side of the book a resting order sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order of this side matches against.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    #[must_use]
    pub fn is_sell(self) -> bool {
        self == Self::Sell
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// The kind of a command. Cohorts are formed from commands of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CommandKind {
    Buy,
    Sell,
    Cancel,
}

impl CommandKind {
    /// The book side this kind adds to, or `None` for [`CommandKind::Cancel`].
    #[must_use]
    pub fn side(self) -> Option<Side> {
        match self {
            Self::Buy => Some(Side::Buy),
            Self::Sell => Some(Side::Sell),
            Self::Cancel => None,
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Cancel => write!(f, "CANCEL"),
        }
    }
}

/// One client command. For [`CommandKind::Cancel`] only `order_id` is
/// meaningful; `instrument`, `price` and `quantity` are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub order_id: OrderId,
    pub instrument: Instrument,
    pub price: u32,
    pub quantity: u32,
}

impl Command {
    #[must_use]
    pub fn buy(order_id: u32, instrument: impl Into<String>, price: u32, quantity: u32) -> Self {
        Self::limit(CommandKind::Buy, order_id, instrument, price, quantity)
    }

    #[must_use]
    pub fn sell(order_id: u32, instrument: impl Into<String>, price: u32, quantity: u32) -> Self {
        Self::limit(CommandKind::Sell, order_id, instrument, price, quantity)
    }

    #[must_use]
    pub fn cancel(order_id: u32) -> Self {
        Self {
            kind: CommandKind::Cancel,
            order_id: OrderId(order_id),
            instrument: Instrument::default(),
            price: 0,
            quantity: 0,
        }
    }

    fn limit(
        kind: CommandKind,
        order_id: u32,
        instrument: impl Into<String>,
        price: u32,
        quantity: u32,
    ) -> Self {
        Self {
            kind,
            order_id: OrderId(order_id),
            instrument: Instrument::new(instrument),
            price,
            quantity,
        }
    }

    /// Whether an incoming order of this command would trade with a resting
    /// order on the opposite side at `resting_price`.
    #[must_use]
    pub fn crosses(&self, resting_price: u32) -> bool {
        match self.kind {
            CommandKind::Buy => self.price >= resting_price,
            CommandKind::Sell => self.price <= resting_price,
            CommandKind::Cancel => false,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CommandKind::Cancel => write!(f, "CANCEL #{}", self.order_id),
            kind => write!(
                f,
                "{kind} #{} {} {} @ {}",
                self.order_id, self.instrument, self.quantity, self.price
            ),
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Command {
    /// A buy for the default test instrument.
    pub fn dummy_buy(order_id: u32, price: u32, quantity: u32) -> Self {
        Self::buy(order_id, "XYZ", price, quantity)
    }

    /// A sell for the default test instrument.
    pub fn dummy_sell(order_id: u32, price: u32, quantity: u32) -> Self {
        Self::sell(order_id, "XYZ", price, quantity)
    }
}
