//! A resting order in the book.
//!
//! The identity of a resting order (id, instrument, side, price, creation
//! timestamp) never changes after construction. Its fill state (residual
//! quantity, cancelled flag, execution counter) sits behind a
//! per-order lock so that every member of a cohort can match against or
//! cancel it concurrently. The lock is the only thing serialising those
//! members: two buys racing for one sell are served in lock-acquisition
//! order, not timestamp order.

use std::cmp::Ordering;

use cohort_types::{
    Command, Instrument, OrderCancelled, OrderExecuted, OrderId, Side, Timestamp,
};
use parking_lot::Mutex;

/// The mutable part of a resting order, read and written as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillState {
    /// Unfilled quantity. Never increases.
    pub residual: u32,
    /// Once set, never cleared.
    pub cancelled: bool,
    /// Number of fills so far; the last fill's sequence number.
    pub executions: u32,
}

impl FillState {
    /// Whether this order can still trade or be cancelled.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.residual > 0 && !self.cancelled
    }
}

/// A book entry waiting to be matched.
#[derive(Debug)]
pub struct RestingOrder {
    pub id: OrderId,
    pub instrument: Instrument,
    pub side: Side,
    pub price: u32,
    /// Timestamp of the command that created this order.
    pub timestamp: Timestamp,
    fill: Mutex<FillState>,
}

impl RestingOrder {
    #[must_use]
    pub fn new(
        id: OrderId,
        instrument: Instrument,
        side: Side,
        price: u32,
        quantity: u32,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            instrument,
            side,
            price,
            timestamp,
            fill: Mutex::new(FillState {
                residual: quantity,
                cancelled: false,
                executions: 0,
            }),
        }
    }

    /// Atomically match `incoming` against this order.
    ///
    /// On success both residuals drop by `min(incoming, resting)`, the
    /// execution counter advances, and the fill is returned. Returns `None`
    /// (leaving both sides untouched) if this order is exhausted or
    /// cancelled, the instruments differ, the prices don't cross, or this
    /// order is younger than the incoming command.
    pub fn try_match(&self, incoming: &mut Command, timestamp: Timestamp) -> Option<OrderExecuted> {
        debug_assert_eq!(incoming.kind.side(), Some(self.side.opposite()));

        let mut fill = self.fill.lock();
        if !fill.is_live()
            || incoming.quantity == 0
            || self.timestamp > timestamp
            || self.instrument != incoming.instrument
            || !incoming.crosses(self.price)
        {
            return None;
        }

        let matched = fill.residual.min(incoming.quantity);
        fill.residual -= matched;
        fill.executions += 1;
        incoming.quantity -= matched;

        Some(OrderExecuted {
            resting_order_id: self.id,
            incoming_order_id: incoming.order_id,
            execution_seq: fill.executions,
            price: self.price,
            quantity: matched,
            timestamp,
        })
    }

    /// Atomically cancel this order if it carries `order_id` and is live.
    pub fn try_cancel(&self, order_id: OrderId, timestamp: Timestamp) -> Option<OrderCancelled> {
        if self.id != order_id {
            return None;
        }
        let mut fill = self.fill.lock();
        if !fill.is_live() {
            return None;
        }
        fill.cancelled = true;

        Some(OrderCancelled {
            order_id,
            found: true,
            timestamp,
        })
    }

    /// A consistent copy of the fill state.
    #[must_use]
    pub fn fill_state(&self) -> FillState {
        *self.fill.lock()
    }

    #[must_use]
    pub fn residual(&self) -> u32 {
        self.fill.lock().residual
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.fill.lock().is_live()
    }

    /// Lock-free liveness check for the exclusive merge sweep.
    pub(crate) fn is_live_mut(&mut self) -> bool {
        self.fill.get_mut().is_live()
    }

    /// Price-time priority within `side`: better price first, then older.
    #[must_use]
    pub fn priority_cmp(side: Side, a: &Self, b: &Self) -> Ordering {
        let by_price = match side {
            Side::Buy => b.price.cmp(&a.price),
            Side::Sell => a.price.cmp(&b.price),
        };
        by_price.then(a.timestamp.cmp(&b.timestamp))
    }
}
