//! Workers: one OS thread per command source, all feeding one exchange.
//!
//! Each worker submits its source's commands in order and blocks in the
//! admission gate whenever a cohort of another kind is in flight.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use cohort_matchcore::{Exchange, OutputSink};
use cohort_types::{CohortError, Result, constants};

use crate::source::CommandSource;

/// Why a worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The source reported end of input.
    EndOfInput,
    /// The source failed; the failure was logged.
    ReadFailed,
}

/// Outcome of one worker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub exit: WorkerExit,
    /// Commands submitted to the exchange.
    pub processed: u64,
}

/// Submit every command of `source` to `exchange`, in order, until the
/// source ends or fails.
pub fn run_worker<S, C>(exchange: &Exchange<S>, source: &mut C) -> WorkerReport
where
    S: OutputSink,
    C: CommandSource + ?Sized,
{
    let mut processed = 0;
    let exit = loop {
        match source.next_command() {
            Ok(Some(command)) => {
                exchange.process(command);
                processed += 1;
            }
            Ok(None) => break WorkerExit::EndOfInput,
            Err(err) => {
                tracing::warn!(error = %err, processed, "Command source failed");
                break WorkerExit::ReadFailed;
            }
        }
    };
    WorkerReport { exit, processed }
}

/// A set of named worker threads sharing one exchange.
pub struct WorkerPool<S> {
    exchange: Arc<Exchange<S>>,
    workers: Vec<(String, JoinHandle<WorkerReport>)>,
    spawned: usize,
}

impl<S: OutputSink + 'static> WorkerPool<S> {
    #[must_use]
    pub fn new(exchange: Arc<Exchange<S>>) -> Self {
        Self {
            exchange,
            workers: Vec::new(),
            spawned: 0,
        }
    }

    /// Start a worker thread draining `source`.
    ///
    /// # Errors
    /// - `Io` if the OS refuses to create the thread
    pub fn spawn<C>(&mut self, mut source: C) -> Result<()>
    where
        C: CommandSource + 'static,
    {
        let name = format!("{}-{}", constants::WORKER_THREAD_PREFIX, self.spawned);
        let exchange = Arc::clone(&self.exchange);
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            tracing::info!("Worker started");
            let report = run_worker(&exchange, &mut source);
            tracing::info!(
                processed = report.processed,
                exit = ?report.exit,
                "Worker stopped"
            );
            report
        })?;
        self.spawned += 1;
        self.workers.push((name, handle));
        Ok(())
    }

    /// Workers not yet joined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Join workers that have already finished, keeping the rest running.
    ///
    /// # Errors
    /// - `Internal` if a finished worker panicked
    pub fn reap(&mut self) -> Result<Vec<WorkerReport>> {
        let (done, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.workers)
            .into_iter()
            .partition(|(_, handle)| handle.is_finished());
        self.workers = running;
        done.into_iter().map(join_one).collect()
    }

    /// Wait for every worker and collect their reports in spawn order.
    ///
    /// # Errors
    /// - `Internal` if any worker panicked
    pub fn join(self) -> Result<Vec<WorkerReport>> {
        self.workers.into_iter().map(join_one).collect()
    }
}

fn join_one((name, handle): (String, JoinHandle<WorkerReport>)) -> Result<WorkerReport> {
    handle
        .join()
        .map_err(|_| CohortError::Internal(format!("worker {name} panicked")))
}
