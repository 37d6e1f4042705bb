//! The shared order book.
//!
//! Two side collections, each kept in price-time priority as of the last
//! merge:
//! - **Buys**: price descending, then timestamp ascending
//! - **Sells**: price ascending, then timestamp ascending
//!
//! Matching threads only ever read the collections (fill state is mutated
//! through each order's own lock). Structural changes are `pub(crate)` and
//! happen only in the merge phase.

use cohort_types::{OrderId, Side};

use crate::resting_order::RestingOrder;

#[derive(Debug, Default)]
pub struct Book {
    buys: Vec<RestingOrder>,
    sells: Vec<RestingOrder>,
}

impl Book {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =================================================================
    // Read access (matching)
    // =================================================================

    /// Orders on `side` in priority order.
    #[must_use]
    pub fn side(&self, side: Side) -> &[RestingOrder] {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }

    #[must_use]
    pub fn buys(&self) -> &[RestingOrder] {
        &self.buys
    }

    #[must_use]
    pub fn sells(&self) -> &[RestingOrder] {
        &self.sells
    }

    /// Buys then sells, each in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &RestingOrder> {
        self.buys.iter().chain(self.sells.iter())
    }

    /// The first live order carrying `order_id`, if any.
    #[must_use]
    pub fn find_live(&self, order_id: OrderId) -> Option<&RestingOrder> {
        self.iter().find(|o| o.id == order_id && o.is_live())
    }

    /// Number of entries on `side`, including ones awaiting removal.
    #[must_use]
    pub fn len(&self, side: Side) -> usize {
        self.side(side).len()
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.buys.len() + self.sells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }

    // =================================================================
    // Structural mutation (merge phase only)
    // =================================================================

    /// Drop every cancelled or fully filled order. Returns how many went.
    pub(crate) fn sweep(&mut self) -> usize {
        let before = self.order_count();
        self.buys.retain_mut(RestingOrder::is_live_mut);
        self.sells.retain_mut(RestingOrder::is_live_mut);
        before - self.order_count()
    }

    /// Append new orders to their sides. Priority is restored by
    /// [`Book::resort`].
    pub(crate) fn insert_pending(&mut self, orders: impl IntoIterator<Item = RestingOrder>) -> usize {
        let mut inserted = 0;
        for order in orders {
            match order.side {
                Side::Buy => self.buys.push(order),
                Side::Sell => self.sells.push(order),
            }
            inserted += 1;
        }
        inserted
    }

    /// Restore price-time priority on both sides (stable).
    pub(crate) fn resort(&mut self) {
        self.buys
            .sort_by(|a, b| RestingOrder::priority_cmp(Side::Buy, a, b));
        self.sells
            .sort_by(|a, b| RestingOrder::priority_cmp(Side::Sell, a, b));
    }
}
