//! Identifiers and scalar newtypes used throughout Cohort.
//!
//! Order identifiers are client-assigned and share one numbering space
//! across both sides of the book. Timestamps are engine-assigned.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Client-assigned order identifier, unique per book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for OrderId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Engine-assigned command timestamp (monotonic nanoseconds).
///
/// Every event and resting order produced by one command carries the
/// timestamp of that command.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    #[must_use]
    pub fn as_nanos(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Instrument
// ---------------------------------------------------------------------------

/// Short text token naming a tradable instrument (e.g. `AAPL`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Instrument(String);

impl Instrument {
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Instrument {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_order_numerically() {
        assert!(Timestamp(1) < Timestamp(2));
        assert_eq!(Timestamp::default(), Timestamp(0));
        assert_eq!(Timestamp(42).as_nanos(), 42);
    }

    #[test]
    fn instrument_display_and_eq() {
        let a = Instrument::new("GOOG");
        let b: Instrument = "GOOG".into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "GOOG");
        assert_eq!(a.len(), 4);
        assert!(!a.is_empty());
        assert!(Instrument::default().is_empty());
    }

    #[test]
    fn serde_roundtrips() {
        let oid = OrderId(17);
        let json = serde_json::to_string(&oid).unwrap();
        assert_eq!(json, "17");
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(oid, back);

        let inst = Instrument::new("MSFT");
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instrument = serde_json::from_str(&json).unwrap();
        assert_eq!(inst, back);
    }
}
