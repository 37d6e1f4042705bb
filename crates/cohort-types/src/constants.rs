//! System-wide constants for the Cohort matching engine.

/// Default maximum length (in bytes) of an instrument token.
pub const DEFAULT_MAX_INSTRUMENT_LEN: usize = 8;

/// Default listen address of the `cohort-server` binary.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:7400";

/// Default `tracing` filter directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Thread name prefix for per-source workers.
pub const WORKER_THREAD_PREFIX: &str = "cohort-worker";

/// Domain separator for the event stream digest.
pub const STREAM_ROOT_DOMAIN: &[u8] = b"cohort:stream_root:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Cohort";
