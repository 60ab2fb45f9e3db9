// Error types for the step counter
//
// This module defines custom error types for the analysis core and the CSV
// ingestion boundary, providing structured error handling with stable numeric
// codes suitable for scripting around the CLI.

mod analysis;
mod ingest;

pub use analysis::{log_analysis_error, AnalysisError, AnalysisErrorCodes};
pub use ingest::{log_ingest_error, IngestError, IngestErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library and the CLI.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
