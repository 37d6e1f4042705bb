//! Logging bootstrap for binaries. Library code only emits `tracing` events.

use cohort_types::{CohortError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `filter` when it is set. Stdout is left to the
/// event stream.
///
/// # Errors
/// - `Configuration` if `filter` is not a valid directive or a subscriber
///   is already installed
pub fn init_logging(filter: &str, json: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env) => env,
        Err(_) => EnvFilter::try_new(filter)
            .map_err(|e| CohortError::Configuration(format!("log filter {filter:?}: {e}")))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CohortError::Configuration(format!("logging already initialised: {e}")))
}
