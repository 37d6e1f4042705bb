//! Error types for the Cohort matching engine.
//!
//! All errors use the `CX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Command decoding errors
//! - 2xx: Command source errors
//! - 3xx: Configuration errors
//! - 9xx: General / internal errors
//!
//! Nothing inside the matching core is fallible: a cancel that finds no
//! live order is reported as an event, not an error.

use thiserror::Error;

/// Central error enum for all Cohort operations.
#[derive(Debug, Error)]
pub enum CohortError {
    // =================================================================
    // Decoding Errors (1xx)
    // =================================================================
    /// The command verb is not one of `B`, `S`, `C`.
    #[error("CX_ERR_100: Unknown command kind: {0:?}")]
    UnknownCommandKind(String),

    /// The line does not carry the fields its command kind needs.
    #[error("CX_ERR_101: Malformed command: {reason}")]
    MalformedCommand { reason: String },

    /// A numeric field did not parse as an unsigned 32-bit integer.
    #[error("CX_ERR_102: Invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// The instrument token is empty or too long.
    #[error("CX_ERR_103: Invalid instrument {symbol:?}: max length is {max_len}")]
    InvalidInstrument { symbol: String, max_len: usize },

    // =================================================================
    // Source Errors (2xx)
    // =================================================================
    /// Reading from a command source failed.
    #[error("CX_ERR_200: Source read failed: {0}")]
    SourceRead(String),

    /// The source's peer went away mid-command.
    #[error("CX_ERR_201: Source disconnected")]
    SourceDisconnected,

    // =================================================================
    // Configuration (3xx)
    // =================================================================
    /// Configuration error (invalid value, unparseable file, etc.).
    #[error("CX_ERR_300: Configuration error: {0}")]
    Configuration(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CX_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("CX_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// I/O error (socket, pipe, file).
    #[error("CX_ERR_903: I/O error: {0}")]
    Io(String),
}

impl CohortError {
    /// Whether the error was produced by the decoding layer (1xx).
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommandKind(_)
                | Self::MalformedCommand { .. }
                | Self::InvalidNumber { .. }
                | Self::InvalidInstrument { .. }
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CohortError>;

// Conversion from std::io::Error
impl From<std::io::Error> for CohortError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CohortError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
