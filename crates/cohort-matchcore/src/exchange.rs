//! The exchange: one shared context tying gate, book, clock and sink.
//!
//! ```text
//! process(command):
//!     pass    = gate.admit(kind)                 // may block
//!     outcome = matcher(book.read(), command)    // parallel within cohort
//!     gate.depart(pass, outcome, |cohort| {      // last one out merges
//!         merge(cohort, book.write(), sink)
//!     })
//! ```
//!
//! The book sits behind a reader-writer lock. Matching takes it shared and
//! releases it before departing; the merge takes it exclusively, and since
//! the merge runs only once every cohort member has departed, that
//! exclusive acquisition never waits on a matcher.

use cohort_types::{Command, EngineConfig, Side};
use parking_lot::{Mutex, RwLock};

use crate::clock::MonotonicClock;
use crate::gate::CommandGate;
use crate::merge::{MergeReport, run_merge};
use crate::sink::OutputSink;
use crate::{Book, matcher};

/// A matching engine instance. Share it between workers with `Arc`.
#[derive(Debug)]
pub struct Exchange<S> {
    gate: CommandGate,
    book: RwLock<Book>,
    clock: MonotonicClock,
    sink: Mutex<S>,
    last_merge: Mutex<MergeReport>,
    config: EngineConfig,
}

impl<S: OutputSink> Exchange<S> {
    /// Create an exchange with the default configuration.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(sink: S, config: EngineConfig) -> Self {
        let gate = CommandGate::new(config.wake_policy);
        tracing::debug!(wake_policy = ?gate.wake_policy(), "Exchange created");
        Self {
            gate,
            book: RwLock::new(Book::new()),
            clock: MonotonicClock::new(),
            sink: Mutex::new(sink),
            last_merge: Mutex::new(MergeReport::default()),
            config,
        }
    }

    /// Run one command through admission, matching and departure.
    ///
    /// Blocks while a cohort of another kind is in flight. When this call
    /// drains its cohort it also runs the merge, so on return every event
    /// of that cohort has been delivered to the sink.
    pub fn process(&self, command: Command) {
        let pass = self.gate.admit(command.kind);

        let outcome = {
            let book = self.book.read();
            let timestamp = self.clock.now();
            matcher::process_command(&book, command, timestamp)
        };

        self.gate.depart(pass, outcome, |cohort| {
            let mut book = self.book.write();
            let mut sink = self.sink.lock();
            let report = run_merge(cohort, &mut book, &mut *sink);
            *self.last_merge.lock() = report;
        });
    }

    /// Number of cohorts merged since construction.
    #[must_use]
    pub fn cohorts_merged(&self) -> u64 {
        self.gate.cohorts_merged()
    }

    /// Summary of the most recent merge.
    #[must_use]
    pub fn last_merge(&self) -> MergeReport {
        *self.last_merge.lock()
    }

    /// Entries on `side` as of the last merge.
    #[must_use]
    pub fn resting_count(&self, side: Side) -> usize {
        self.book.read().len(side)
    }

    /// Read-only access to the book between cohorts.
    pub fn with_book<R>(&self, f: impl FnOnce(&Book) -> R) -> R {
        f(&self.book.read())
    }

    /// Access the sink, e.g. to flush or inspect it.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.sink.lock())
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tear the exchange down and hand back its sink.
    pub fn into_sink(self) -> S {
        self.sink.into_inner()
    }
}
