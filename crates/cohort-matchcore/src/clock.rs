//! Monotonic command clock.
//!
//! Every command is stamped once, at the start of processing. Stamps are
//! nanoseconds since the clock was created and strictly increase across
//! all threads, so no two commands ever share a timestamp.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use cohort_types::Timestamp;

#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
    last: AtomicU64,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last: AtomicU64::new(0),
        }
    }

    /// Next timestamp: the elapsed nanoseconds, bumped past the previous
    /// stamp when two callers read the same instant.
    pub fn now(&self) -> Timestamp {
        let elapsed = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(elapsed.max(prev.saturating_add(1)))
            })
            .unwrap_or_else(|prev| prev);
        Timestamp(elapsed.max(prev.saturating_add(1)))
    }

    /// The most recently issued timestamp (zero before the first call).
    #[must_use]
    pub fn last(&self) -> Timestamp {
        Timestamp(self.last.load(Ordering::Acquire))
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
