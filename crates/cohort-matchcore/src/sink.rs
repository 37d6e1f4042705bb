//! Output sinks: where the merge phase delivers the ordered event stream.
//!
//! A sink is called only from the merge phase, one cohort at a time, so it
//! needs no internal synchronisation of its own. It must not reorder or
//! drop events.

use std::sync::Arc;

use cohort_types::BookEvent;
use crossbeam::channel::Sender;
use parking_lot::Mutex;

use crate::determinism::{StreamHasher, root_hex};

/// Receives the globally ordered event stream.
pub trait OutputSink: Send {
    /// Deliver one event. Called in global flush order.
    fn deliver(&mut self, event: &BookEvent);

    /// Called after the last event of each merged cohort.
    fn end_cohort(&mut self) {}
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn deliver(&mut self, event: &BookEvent) {
        (**self).deliver(event);
    }

    fn end_cohort(&mut self) {
        (**self).end_cohort();
    }
}

// ---------------------------------------------------------------------------
// VecSink
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct LogInner {
    events: Vec<BookEvent>,
    /// Exclusive end index of each merged cohort in `events`.
    cohort_ends: Vec<usize>,
}

/// Shared read handle onto a [`VecSink`]'s contents.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Arc<Mutex<LogInner>>,
}

impl EventLog {
    /// Every event delivered so far, in flush order.
    #[must_use]
    pub fn events(&self) -> Vec<BookEvent> {
        self.inner.lock().events.clone()
    }

    /// Delivered events split at cohort boundaries.
    #[must_use]
    pub fn cohorts(&self) -> Vec<Vec<BookEvent>> {
        let inner = self.inner.lock();
        let mut start = 0;
        inner
            .cohort_ends
            .iter()
            .map(|&end| {
                let cohort = inner.events[start..end].to_vec();
                start = end;
                cohort
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().events.is_empty()
    }

    #[must_use]
    pub fn cohort_count(&self) -> usize {
        self.inner.lock().cohort_ends.len()
    }
}

/// Collects every event in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    log: EventLog,
}

impl VecSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that stays readable after the sink moves into an exchange.
    #[must_use]
    pub fn handle(&self) -> EventLog {
        self.log.clone()
    }
}

impl OutputSink for VecSink {
    fn deliver(&mut self, event: &BookEvent) {
        self.log.inner.lock().events.push(event.clone());
    }

    fn end_cohort(&mut self) {
        let mut inner = self.log.inner.lock();
        let end = inner.events.len();
        inner.cohort_ends.push(end);
    }
}

// ---------------------------------------------------------------------------
// ChannelSink
// ---------------------------------------------------------------------------

/// Forwards events into a channel for a consumer on another thread.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<BookEvent>,
    disconnected: bool,
}

impl ChannelSink {
    #[must_use]
    pub fn new(tx: Sender<BookEvent>) -> Self {
        Self {
            tx,
            disconnected: false,
        }
    }
}

impl OutputSink for ChannelSink {
    fn deliver(&mut self, event: &BookEvent) {
        if self.tx.send(event.clone()).is_err() && !self.disconnected {
            self.disconnected = true;
            tracing::warn!("Event receiver dropped; discarding further events");
        }
    }
}

// ---------------------------------------------------------------------------
// DigestSink
// ---------------------------------------------------------------------------

/// Passes events through to `inner` while folding them into a stream root.
#[derive(Debug)]
pub struct DigestSink<S> {
    inner: S,
    hasher: StreamHasher,
}

impl<S: OutputSink> DigestSink<S> {
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            hasher: StreamHasher::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        self.hasher.root()
    }

    #[must_use]
    pub fn events_seen(&self) -> u64 {
        self.hasher.count()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: OutputSink> OutputSink for DigestSink<S> {
    fn deliver(&mut self, event: &BookEvent) {
        self.hasher.update(event);
        self.inner.deliver(event);
    }

    fn end_cohort(&mut self) {
        tracing::trace!(
            events = self.hasher.count(),
            root = %root_hex(&self.hasher.root()),
            "Stream root advanced"
        );
        self.inner.end_cohort();
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn deliver(&mut self, _event: &BookEvent) {}
}
