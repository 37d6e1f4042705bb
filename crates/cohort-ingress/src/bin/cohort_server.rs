//! `cohort-server`: accept line-protocol commands and print the event stream.

use std::io::{self, BufReader, BufWriter};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cohort_ingress::{
    LineDecoder, LineSink, LineSource, ServerConfig, WorkerExit, bind, init_logging, run_worker,
    serve_connections,
};
use cohort_matchcore::Exchange;
use cohort_types::{CohortError, Result, constants};

fn main() -> ExitCode {
    let config = ServerConfig::parse();
    if let Err(err) = init_logging(&config.log_filter, config.log_json) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Server failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ServerConfig) -> Result<()> {
    let engine = config.engine_config()?;
    let decoder = LineDecoder::from_config(&engine);
    tracing::info!(
        engine = constants::ENGINE_NAME,
        version = constants::VERSION,
        wake_policy = ?engine.wake_policy,
        max_instrument_len = decoder.max_instrument_len(),
        "Starting"
    );

    let sink = LineSink::new(BufWriter::new(io::stdout()));
    let exchange = Arc::new(Exchange::with_config(sink, engine));

    if config.stdin {
        let mut source = LineSource::new(BufReader::new(io::stdin()), decoder);
        let report = run_worker(&exchange, &mut source);
        tracing::info!(
            processed = report.processed,
            rejected = source.rejected(),
            cohorts = exchange.cohorts_merged(),
            "Input finished"
        );
        return match report.exit {
            WorkerExit::EndOfInput => Ok(()),
            WorkerExit::ReadFailed => Err(CohortError::SourceRead("stdin".to_string())),
        };
    }

    let listener = bind(config.listen)?;
    tracing::info!(addr = %config.listen, "Listening");
    let reports = serve_connections(
        &listener,
        Arc::clone(&exchange),
        decoder,
        config.max_connections,
    )?;

    let processed: u64 = reports.iter().map(|r| r.processed).sum();
    tracing::info!(
        connections = reports.len(),
        processed,
        cohorts = exchange.cohorts_merged(),
        "Server stopped"
    );
    Ok(())
}
