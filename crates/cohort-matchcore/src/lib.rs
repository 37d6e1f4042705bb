//! # cohort-matchcore
//!
//! **The concurrent matching core for Cohort.**
//!
//! Commands from many threads pass through an admission gate that groups
//! them into cohorts of one kind (buy, sell or cancel). Members of a cohort
//! match in parallel against a read-only book, serialised only by each
//! resting order's own lock. When the last member departs, the merge phase
//! sorts the cohort's events by timestamp, flushes them, and is the only
//! step that changes the book's structure.
//!
//! - **Total order**: events are flushed cohort by cohort, by timestamp
//! - **Price-time priority**: better price first, then older orders
//! - **Fine-grained locking**: one lock per resting order, plus the gate

pub mod book;
pub mod clock;
pub mod determinism;
pub mod exchange;
pub mod gate;
pub mod matcher;
pub mod merge;
pub mod resting_order;
pub mod sink;

pub use book::Book;
pub use clock::MonotonicClock;
pub use determinism::{StreamHasher, compute_stream_root, verify_stream_root};
pub use exchange::Exchange;
pub use gate::{AdmissionPass, Cohort, CommandGate};
pub use matcher::{CommandOutcome, CommandResult, process_command};
pub use merge::{MergeReport, run_merge};
pub use resting_order::{FillState, RestingOrder};
pub use sink::{ChannelSink, DigestSink, EventLog, NullSink, OutputSink, VecSink};
