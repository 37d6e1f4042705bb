//! Event stream digests.
//!
//! Two runs that feed the same commands through the engine in the same
//! cohort order must flush the same event stream. The stream root is a
//! SHA-256 hash over every event in flush order, which lets two streams be
//! compared without keeping either in memory.
//!
//! Timestamps are excluded: they come from a monotonic clock and differ
//! between runs. Their effect on the stream is captured by event order.

use cohort_types::{BookEvent, Side, constants};
use sha2::{Digest, Sha256};

/// Incremental stream root over events in flush order.
#[derive(Debug, Clone)]
pub struct StreamHasher {
    hasher: Sha256,
    count: u64,
}

impl StreamHasher {
    #[must_use]
    pub fn new() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(constants::STREAM_ROOT_DOMAIN);
        Self { hasher, count: 0 }
    }

    pub fn update(&mut self, event: &BookEvent) {
        match event {
            BookEvent::Added(e) => {
                self.hasher.update([0u8]);
                self.hasher.update(e.order_id.0.to_le_bytes());
                self.hasher.update((e.instrument.len() as u64).to_le_bytes());
                self.hasher.update(e.instrument.as_str().as_bytes());
                self.hasher.update(e.price.to_le_bytes());
                self.hasher.update(e.quantity.to_le_bytes());
                self.hasher.update(match e.side {
                    Side::Buy => [0u8],
                    Side::Sell => [1u8],
                });
            }
            BookEvent::Cancelled(e) => {
                self.hasher.update([1u8]);
                self.hasher.update(e.order_id.0.to_le_bytes());
                self.hasher.update([u8::from(e.found)]);
            }
            BookEvent::Executed(e) => {
                self.hasher.update([2u8]);
                self.hasher.update(e.resting_order_id.0.to_le_bytes());
                self.hasher.update(e.incoming_order_id.0.to_le_bytes());
                self.hasher.update(e.execution_seq.to_le_bytes());
                self.hasher.update(e.price.to_le_bytes());
                self.hasher.update(e.quantity.to_le_bytes());
            }
        }
        self.count += 1;
    }

    /// Number of events folded in so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The root over everything seen so far. Does not consume the hasher.
    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        let mut hasher = self.hasher.clone();
        hasher.update(self.count.to_le_bytes());
        let result = hasher.finalize();
        let mut root = [0u8; 32];
        root.copy_from_slice(&result);
        root
    }
}

impl Default for StreamHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the stream root over a complete event stream.
#[must_use]
pub fn compute_stream_root(events: &[BookEvent]) -> [u8; 32] {
    let mut hasher = StreamHasher::new();
    for event in events {
        hasher.update(event);
    }
    hasher.root()
}

/// Verify that a stream hashes to the expected root.
#[must_use]
pub fn verify_stream_root(events: &[BookEvent], expected_root: &[u8; 32]) -> bool {
    compute_stream_root(events) == *expected_root
}

/// Hex rendering of a root, for logs.
#[must_use]
pub fn root_hex(root: &[u8; 32]) -> String {
    hex::encode(root)
}
