// Step Counter Core - accelerometer step detection
// Peak detection, deadzone suppression and adaptive thresholding over
// in-memory recordings

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod testing;

// Re-exports for convenience
pub use analysis::{count_steps, Sample, StepAnalysis, StepPipeline, ThresholdSeries};
pub use config::AppConfig;
pub use error::{AnalysisError, ErrorCode, IngestError};

use log::info;

/// Install a stderr `tracing` subscriber for binaries
///
/// Library `log` records are forwarded through the subscriber as well. Safe
/// to call more than once; later calls are ignored.
pub fn init_logging(level: tracing::Level) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        info!("Logging initialized at {}", level);
    }
}
