// Analysis error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Analysis error code constants
///
/// Error code range: 3001-3004
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Input series is too short for the requested statistic
    pub const INSUFFICIENT_DATA: i32 = 3001;

    /// Magnitude and time series differ in length
    pub const LENGTH_MISMATCH: i32 = 3002;

    /// Deviation multiplier is negative or not finite
    pub const INVALID_MULTIPLIER: i32 = 3003;

    /// Elapsed-time cutoff is negative or not finite
    pub const INVALID_CUTOFF: i32 = 3004;
}

/// Log an analysis error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=StepPipeline, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Analysis-related errors
///
/// These cover precondition violations inside the peak detection and
/// thresholding pipeline. Every variant is deterministic: retrying with the
/// same input yields the same error.
///
/// Error code range: 3001-3004
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Fewer values than the computation needs (mean needs 1, deviation needs 2)
    InsufficientData { required: usize, provided: usize },

    /// Magnitude and time series must be index-aligned
    LengthMismatch { magnitudes: usize, times: usize },

    /// Deviation multiplier must be finite and non-negative
    InvalidMultiplier { multiplier: f64 },

    /// Elapsed-time cutoff must be finite and non-negative
    InvalidCutoff { cutoff_ms: f64 },
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::InsufficientData { .. } => AnalysisErrorCodes::INSUFFICIENT_DATA,
            AnalysisError::LengthMismatch { .. } => AnalysisErrorCodes::LENGTH_MISMATCH,
            AnalysisError::InvalidMultiplier { .. } => AnalysisErrorCodes::INVALID_MULTIPLIER,
            AnalysisError::InvalidCutoff { .. } => AnalysisErrorCodes::INVALID_CUTOFF,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::InsufficientData { required, provided } => {
                format!("Insufficient data: need {}, got {}", required, provided)
            }
            AnalysisError::LengthMismatch { magnitudes, times } => {
                format!(
                    "Length mismatch: {} magnitudes but {} timestamps",
                    magnitudes, times
                )
            }
            AnalysisError::InvalidMultiplier { multiplier } => {
                format!("Invalid deviation multiplier: {}", multiplier)
            }
            AnalysisError::InvalidCutoff { cutoff_ms } => {
                format!("Invalid elapsed-time cutoff: {} ms", cutoff_ms)
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {}
