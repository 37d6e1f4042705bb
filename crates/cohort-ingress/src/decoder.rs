//! Line decoder for the text command protocol.
//!
//! ```text
//! B <id> <instrument> <price> <qty>     buy limit order
//! S <id> <instrument> <price> <qty>     sell limit order
//! C <id>                                cancel
//! ```
//!
//! Tokens are separated by any whitespace. Blank lines and lines starting
//! with `#` carry no command.

use cohort_types::{CohortError, Command, EngineConfig, Result, constants};

/// Turns protocol lines into [`Command`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDecoder {
    max_instrument_len: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new(constants::DEFAULT_MAX_INSTRUMENT_LEN)
    }
}

impl LineDecoder {
    #[must_use]
    pub fn new(max_instrument_len: usize) -> Self {
        Self { max_instrument_len }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_instrument_len)
    }

    #[must_use]
    pub fn max_instrument_len(&self) -> usize {
        self.max_instrument_len
    }

    /// Decode one line.
    ///
    /// Returns `Ok(None)` for blank and comment lines.
    ///
    /// # Errors
    /// - `UnknownCommandKind` if the first token is not `B`, `S` or `C`
    /// - `MalformedCommand` on a wrong token count
    /// - `InvalidNumber` if an id, price or quantity is not a `u32`
    /// - `InvalidInstrument` if the instrument token is too long
    pub fn decode(&self, line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let command = match tokens[0] {
            "B" | "S" => {
                let &[kind, id, instrument, price, quantity] = tokens.as_slice() else {
                    return Err(malformed(&tokens, 5));
                };
                let id = number("order_id", id)?;
                let instrument = self.instrument(instrument)?;
                let price = number("price", price)?;
                let quantity = number("quantity", quantity)?;
                if kind == "B" {
                    Command::buy(id, instrument, price, quantity)
                } else {
                    Command::sell(id, instrument, price, quantity)
                }
            }
            "C" => {
                let &[_, id] = tokens.as_slice() else {
                    return Err(malformed(&tokens, 2));
                };
                Command::cancel(number("order_id", id)?)
            }
            other => return Err(CohortError::UnknownCommandKind(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Decode one raw line, rejecting bytes that are not UTF-8.
    ///
    /// # Errors
    /// - `MalformedCommand` if the line is not valid UTF-8
    /// - anything [`LineDecoder::decode`] returns
    pub fn decode_bytes(&self, line: &[u8]) -> Result<Option<Command>> {
        let line = std::str::from_utf8(line).map_err(|e| CohortError::MalformedCommand {
            reason: format!("line is not valid UTF-8: {e}"),
        })?;
        self.decode(line)
    }

    fn instrument<'a>(&self, symbol: &'a str) -> Result<&'a str> {
        if symbol.len() > self.max_instrument_len {
            return Err(CohortError::InvalidInstrument {
                symbol: symbol.to_string(),
                max_len: self.max_instrument_len,
            });
        }
        Ok(symbol)
    }
}

fn number(field: &'static str, token: &str) -> Result<u32> {
    token.parse().map_err(|_| CohortError::InvalidNumber {
        field,
        value: token.to_string(),
    })
}

fn malformed(tokens: &[&str], expected: usize) -> CohortError {
    CohortError::MalformedCommand {
        reason: format!(
            "{} expects {expected} tokens, got {}",
            tokens[0],
            tokens.len()
        ),
    }
}
