// Ingestion error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Ingestion error code constants
///
/// Error code range: 4001-4006
pub struct IngestErrorCodes {}

impl IngestErrorCodes {
    /// Recording could not be opened or read
    pub const IO: i32 = 4001;

    /// No header line after the skipped preamble
    pub const MISSING_HEADER: i32 = 4002;

    /// Data row width differs from the header
    pub const RAGGED_ROW: i32 = 4003;

    /// Cell is not a number
    pub const INVALID_NUMBER: i32 = 4004;

    /// Cell parsed to NaN or infinity
    pub const NON_FINITE: i32 = 4005;

    /// Requested column name is not in the header
    pub const UNKNOWN_COLUMN: i32 = 4006;
}

/// Log an ingestion error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_ingest_error(err: &IngestError, context: &str) {
    error!(
        "Ingest error in {}: code={}, component=SensorTable, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while turning a CSV recording into a numeric table
///
/// Row numbers are 1-based line numbers in the source file so they can be
/// matched against an editor directly.
///
/// Error code range: 4001-4006
#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Underlying reader failed
    Io { details: String },

    /// File ended before the header line
    MissingHeader { lines_to_skip: usize },

    /// Row has a different number of cells than the header
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Cell could not be parsed as a number
    InvalidNumber { line: u64, column: String, value: String },

    /// Cell parsed but is NaN or infinite
    NonFinite { line: u64, column: String },

    /// Column lookup by name failed
    UnknownColumn { name: String },
}

impl ErrorCode for IngestError {
    fn code(&self) -> i32 {
        match self {
            IngestError::Io { .. } => IngestErrorCodes::IO,
            IngestError::MissingHeader { .. } => IngestErrorCodes::MISSING_HEADER,
            IngestError::RaggedRow { .. } => IngestErrorCodes::RAGGED_ROW,
            IngestError::InvalidNumber { .. } => IngestErrorCodes::INVALID_NUMBER,
            IngestError::NonFinite { .. } => IngestErrorCodes::NON_FINITE,
            IngestError::UnknownColumn { .. } => IngestErrorCodes::UNKNOWN_COLUMN,
        }
    }

    fn message(&self) -> String {
        match self {
            IngestError::Io { details } => format!("I/O error: {}", details),
            IngestError::MissingHeader { lines_to_skip } => {
                format!("No header line found after skipping {} lines", lines_to_skip)
            }
            IngestError::RaggedRow {
                line,
                expected,
                found,
            } => {
                format!(
                    "Line {}: expected {} columns, found {}",
                    line, expected, found
                )
            }
            IngestError::InvalidNumber {
                line,
                column,
                value,
            } => {
                format!("Line {}: column '{}' is not a number: {:?}", line, column, value)
            }
            IngestError::NonFinite { line, column } => {
                format!("Line {}: column '{}' is not finite", line, column)
            }
            IngestError::UnknownColumn { name } => {
                format!("The column name {} does not exist as a column title", name)
            }
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IngestError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for IngestError {}

/// Convert from std::io::Error to IngestError
impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io {
            details: err.to_string(),
        }
    }
}

/// Convert from csv::Error to IngestError
impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Io {
            details: err.to_string(),
        }
    }
}
