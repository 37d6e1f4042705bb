//! Command sources: where a worker pulls its next command from.

use std::collections::VecDeque;
use std::io::{BufRead, ErrorKind};

use cohort_types::{CohortError, Command, Result};
use crossbeam::channel::Receiver;

use crate::decoder::LineDecoder;

/// A stream of commands feeding one worker.
pub trait CommandSource: Send {
    /// The next command, or `Ok(None)` at end of input.
    ///
    /// # Errors
    /// Any error ends the worker reading from this source.
    fn next_command(&mut self) -> Result<Option<Command>>;
}

impl<C: CommandSource + ?Sized> CommandSource for Box<C> {
    fn next_command(&mut self) -> Result<Option<Command>> {
        (**self).next_command()
    }
}

// ---------------------------------------------------------------------------
// LineSource
// ---------------------------------------------------------------------------

/// Reads protocol lines from any buffered reader.
///
/// Lines that fail to decode are logged and skipped; only I/O failures end
/// the source.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    decoder: LineDecoder,
    buf: Vec<u8>,
    line_no: u64,
    rejected: u64,
}

impl<R: BufRead + Send> LineSource<R> {
    pub fn new(reader: R, decoder: LineDecoder) -> Self {
        Self {
            reader,
            decoder,
            buf: Vec::new(),
            line_no: 0,
            rejected: 0,
        }
    }

    /// Number of lines read so far.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }

    /// Number of malformed lines skipped.
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

impl<R: BufRead + Send> CommandSource for LineSource<R> {
    fn next_command(&mut self) -> Result<Option<Command>> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .map_err(|e| match e.kind() {
                    ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe => CohortError::SourceDisconnected,
                    _ => CohortError::SourceRead(e.to_string()),
                })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            match self.decoder.decode_bytes(&self.buf) {
                Ok(Some(command)) => return Ok(Some(command)),
                Ok(None) => {}
                Err(err) => {
                    self.rejected += 1;
                    let input = String::from_utf8_lossy(&self.buf);
                    tracing::warn!(
                        line = self.line_no,
                        input = input.trim_end(),
                        error = %err,
                        "Rejected command line"
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelSource
// ---------------------------------------------------------------------------

/// Receives already decoded commands from other threads. Input ends when
/// every sender has been dropped.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<Command>,
}

impl ChannelSource {
    #[must_use]
    pub fn new(rx: Receiver<Command>) -> Self {
        Self { rx }
    }
}

impl CommandSource for ChannelSource {
    fn next_command(&mut self) -> Result<Option<Command>> {
        Ok(self.rx.recv().ok())
    }
}

// ---------------------------------------------------------------------------
// VecSource
// ---------------------------------------------------------------------------

/// A scripted, in-memory list of commands.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    commands: VecDeque<Command>,
}

impl VecSource {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl CommandSource for VecSource {
    fn next_command(&mut self) -> Result<Option<Command>> {
        Ok(self.commands.pop_front())
    }
}
