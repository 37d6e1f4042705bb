//! The merge phase: the only place the book's structure changes.
//!
//! Runs once per cohort on the thread that drained the gate, while the gate
//! lock is held, so it is single-threaded by construction:
//!
//! 1. Stable-sort the cohort's results by command timestamp
//! 2. Flush each result's events, in production order, to the sink
//! 3. Sweep cancelled and fully filled orders out of both sides
//! 4. Insert the orders the cohort created
//! 5. Restore price-time priority on both sides
//! 6. Drop the cohort's results

use crate::gate::Cohort;
use crate::sink::OutputSink;
use crate::Book;

/// What one merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub commands: usize,
    pub events_flushed: usize,
    pub removed: usize,
    pub inserted: usize,
}

/// Apply a drained cohort to the book and flush its events.
pub fn run_merge<S>(cohort: Cohort, book: &mut Book, sink: &mut S) -> MergeReport
where
    S: OutputSink + ?Sized,
{
    let Cohort {
        kind,
        mut results,
        pending,
    } = cohort;

    // Stable: equal stamps keep departure order.
    results.sort_by_key(|r| r.timestamp);

    let mut events_flushed = 0;
    for result in &results {
        for event in &result.events {
            sink.deliver(event);
            events_flushed += 1;
        }
    }
    sink.end_cohort();

    let removed = book.sweep();
    let inserted = book.insert_pending(pending);
    book.resort();

    let report = MergeReport {
        commands: results.len(),
        events_flushed,
        removed,
        inserted,
    };
    tracing::debug!(
        kind = %kind,
        commands = report.commands,
        events = report.events_flushed,
        removed = report.removed,
        inserted = report.inserted,
        resting = book.order_count(),
        "Cohort merged"
    );
    report
}
