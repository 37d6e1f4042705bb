//! Per-command matching.
//!
//! The matcher processes one command against a shared, read-only view of
//! the book. It never changes the book's structure: fills and
//! cancellations go through each resting order's own lock, and a leftover
//! quantity becomes a new [`RestingOrder`] handed back to the caller for
//! insertion at the next merge.
//!
//! ```text
//! process_command(&Book, Command, Timestamp) -> CommandOutcome
//! ```
//!
//! Every event a command produces carries the single timestamp it was
//! assigned when processing began.

use cohort_types::{
    BookEvent, Command, CommandKind, OrderAdded, OrderCancelled, OrderId, Side, Timestamp,
};

use crate::{Book, RestingOrder};

/// The events one command produced, in production order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub timestamp: Timestamp,
    pub events: Vec<BookEvent>,
}

/// Everything a command hands to the cohort collector.
#[derive(Debug)]
pub struct CommandOutcome {
    pub result: CommandResult,
    /// The leftover quantity as a new order, not yet in the book.
    pub new_order: Option<RestingOrder>,
}

/// Process one command against the current book.
#[must_use]
pub fn process_command(book: &Book, command: Command, timestamp: Timestamp) -> CommandOutcome {
    match command.kind {
        CommandKind::Cancel => CommandOutcome {
            result: CommandResult {
                timestamp,
                events: vec![cancel(book, command.order_id, timestamp)],
            },
            new_order: None,
        },
        CommandKind::Buy => match_limit(book, Side::Buy, command, timestamp),
        CommandKind::Sell => match_limit(book, Side::Sell, command, timestamp),
    }
}

/// Cancel the first live order with this id, buys before sells.
fn cancel(book: &Book, order_id: OrderId, timestamp: Timestamp) -> BookEvent {
    let cancelled = book
        .iter()
        .find_map(|order| order.try_cancel(order_id, timestamp))
        .unwrap_or(OrderCancelled {
            order_id,
            found: false,
            timestamp,
        });
    tracing::trace!(order = %order_id, found = cancelled.found, "Cancel processed");
    cancelled.into()
}

/// Walk the opposite side in priority order until the command is filled,
/// then rest whatever is left.
fn match_limit(book: &Book, side: Side, mut command: Command, timestamp: Timestamp) -> CommandOutcome {
    let mut events = Vec::new();

    for resting in book.side(side.opposite()) {
        if command.quantity == 0 {
            break;
        }
        // Sides are price-sorted; nothing past here crosses.
        if !command.crosses(resting.price) {
            break;
        }
        if let Some(exec) = resting.try_match(&mut command, timestamp) {
            tracing::trace!(
                resting = %exec.resting_order_id,
                incoming = %exec.incoming_order_id,
                seq = exec.execution_seq,
                price = exec.price,
                qty = exec.quantity,
                "Order executed"
            );
            events.push(exec.into());
        }
    }

    let new_order = (command.quantity > 0).then(|| {
        events.push(
            OrderAdded {
                order_id: command.order_id,
                instrument: command.instrument.clone(),
                price: command.price,
                quantity: command.quantity,
                side,
                timestamp,
            }
            .into(),
        );
        RestingOrder::new(
            command.order_id,
            command.instrument,
            side,
            command.price,
            command.quantity,
            timestamp,
        )
    });

    CommandOutcome {
        result: CommandResult { timestamp, events },
        new_order,
    }
}
