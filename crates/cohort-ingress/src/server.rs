//! TCP front end: one worker thread per accepted connection.

use std::io::{self, BufReader};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cohort_matchcore::{Exchange, OutputSink};
use cohort_types::{CohortError, EngineConfig, Result, WakePolicy, constants};

use crate::decoder::LineDecoder;
use crate::source::LineSource;
use crate::worker::{WorkerPool, WorkerReport};

/// Command-line configuration of `cohort-server`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "cohort-server", version, about = "Cohort-batched concurrent matching engine")]
pub struct ServerConfig {
    /// Address to accept command connections on.
    #[arg(short = 'L', long, default_value = constants::DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,

    /// Read commands from stdin instead of listening on TCP.
    #[arg(long, default_value_t = false)]
    pub stdin: bool,

    /// Stop accepting after this many connections and exit once they close.
    #[arg(long)]
    pub max_connections: Option<usize>,

    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    #[arg(short = 'l', long, default_value = constants::DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Emit logs as JSON lines.
    #[arg(long, default_value_t = false)]
    pub log_json: bool,

    /// Wake one blocked worker per departure instead of all of them.
    #[arg(long, default_value_t = false)]
    pub wake_one: bool,

    /// Longest accepted instrument token.
    #[arg(long)]
    pub max_instrument_len: Option<usize>,

    /// JSON file with engine settings; flags override it.
    #[arg(long)]
    pub engine_config: Option<PathBuf>,
}

impl ServerConfig {
    /// Resolve the engine configuration from the optional file and flags.
    ///
    /// # Errors
    /// - `Io` if the config file cannot be read
    /// - `Serialization` if it is not valid JSON
    /// - `Configuration` if the result fails validation
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.engine_config {
            Some(path) => EngineConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => EngineConfig::default(),
        };
        if self.wake_one {
            config.wake_policy = WakePolicy::One;
        }
        if let Some(len) = self.max_instrument_len {
            config.max_instrument_len = len;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Accept connections on `listener`, draining each one on its own worker.
///
/// Returns once `max_connections` connections have been accepted and all
/// of their workers have finished. Failed accepts are logged and do not
/// count toward the limit. Without a limit it only returns on a worker
/// panic.
///
/// Finished workers are reaped only when a new connection arrives, so an
/// idle listener keeps their reports until the next accept or the final
/// join.
///
/// # Errors
/// - `Io` if a worker thread cannot be spawned
/// - `Internal` if a worker panicked
pub fn serve_connections<S>(
    listener: &TcpListener,
    exchange: Arc<Exchange<S>>,
    decoder: LineDecoder,
    max_connections: Option<usize>,
) -> Result<Vec<WorkerReport>>
where
    S: OutputSink + 'static,
{
    let mut pool = WorkerPool::new(exchange);
    let mut reports = Vec::new();
    let limit = max_connections.unwrap_or(usize::MAX);

    for stream in accepted(listener.incoming(), limit) {
        let peer = stream
            .peer_addr()
            .map_or_else(|_| "unknown".to_string(), |addr| addr.to_string());
        tracing::info!(%peer, "Connection accepted");

        pool.spawn(LineSource::new(BufReader::new(stream), decoder))?;
        reports.extend(pool.reap()?);
    }

    reports.extend(pool.join()?);
    Ok(reports)
}

/// Bind `addr`, mapping failure to a configuration error naming the address.
///
/// # Errors
/// - `Configuration` if the address cannot be bound
pub fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .map_err(|e| CohortError::Configuration(format!("cannot listen on {addr}: {e}")))
}

/// The first `limit` successful accepts; failures are logged and skipped.
fn accepted<T>(
    incoming: impl Iterator<Item = io::Result<T>>,
    limit: usize,
) -> impl Iterator<Item = T> {
    incoming
        .filter_map(|stream| {
            stream
                .map_err(|err| tracing::warn!(error = %err, "Accept failed"))
                .ok()
        })
        .take(limit)
}
