//! # cohort-ingress
//!
//! **Plumbing around the matching core**: the text line protocol, command
//! sources, per-source worker threads, and the `cohort-server` binary.
//!
//! ## Data flow
//!
//! ```text
//! TCP / stdin / channel → CommandSource → worker thread → Exchange::process
//!     → merge phase → LineSink → stdout
//! ```
//!
//! Each source is drained by exactly one worker, so commands from one
//! connection are submitted in the order they were read. Commands from
//! different connections interleave as the admission gate allows.

pub mod decoder;
pub mod logging;
pub mod printer;
pub mod server;
pub mod source;
pub mod worker;

pub use decoder::LineDecoder;
pub use logging::init_logging;
pub use printer::{LineSink, format_event};
pub use server::{ServerConfig, bind, serve_connections};
pub use source::{ChannelSource, CommandSource, LineSource, VecSource};
pub use worker::{WorkerExit, WorkerPool, WorkerReport, run_worker};
