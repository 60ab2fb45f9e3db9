// Analysis module - peak detection and step counting pipeline
//
// This module orchestrates the complete step counting pipeline over one fully
// materialized recording. Every stage is a pure function of its inputs; the
// only in-place mutation is deadzone suppression on a freshly built flag
// vector.
//
// Architecture:
// - Pipeline: Magnitude → PeakDetector → AdaptiveThreshold → StepCounter
// - Output: StepAnalysis with every intermediate series, for plotting or
//   tabular peak listings

use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, CountingStrategy};
use crate::error::AnalysisError;

pub mod counter;
pub mod magnitude;
pub mod peaks;
pub mod statistics;
pub mod threshold;
pub mod window;

pub use counter::{count_above_threshold, count_periodic, stride_gaps};
pub use magnitude::{magnitude, magnitudes_for, magnitudes_for_rows, times_for, Sample};
pub use peaks::{find_peaks, peak_indices, raw_peaks, suppress_in_deadzone};
pub use statistics::{mean, standard_deviation};
pub use threshold::{adaptive_thresholds, global_threshold, threshold, thresholds, ThresholdSeries};
pub use window::{radius_from_elapsed, resolve_radius};

/// Minimum series length any stage accepts
pub const MIN_SAMPLES: usize = 2;

/// Every series computed for one recording
///
/// This is the hand-off to presentation: plain arrays, index-aligned, with no
/// formatting applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAnalysis {
    /// Counting strategy that produced `steps`
    pub strategy: CountingStrategy,
    /// Elapsed time in milliseconds per sample
    pub times: Vec<f64>,
    /// Accelerometer magnitude per sample
    pub magnitudes: Vec<f64>,
    /// Peak flags the strategy counted on (suppressed for threshold counting,
    /// raw for periodicity counting)
    pub peaks: Vec<bool>,
    /// Threshold the magnitudes were compared against
    pub thresholds: ThresholdSeries,
    /// Final step count
    pub steps: usize,
}

/// One flagged peak, as listed in a peak table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakRow {
    pub index: usize,
    pub time_ms: f64,
    pub magnitude: f64,
    pub threshold: f64,
    /// Whether the magnitude clears the threshold at this index
    pub above_threshold: bool,
}

impl StepAnalysis {
    pub fn peak_count(&self) -> usize {
        self.peaks.iter().filter(|&&p| p).count()
    }

    /// Flagged peaks with their time, magnitude and threshold
    pub fn peak_rows(&self) -> Vec<PeakRow> {
        peak_indices(&self.peaks)
            .into_iter()
            .map(|index| {
                let threshold = self.thresholds.at(index);
                PeakRow {
                    index,
                    time_ms: self.times[index],
                    magnitude: self.magnitudes[index],
                    threshold,
                    above_threshold: self.magnitudes[index] > threshold,
                }
            })
            .collect()
    }
}

/// Step counting pipeline bound to one configuration
///
/// Holds no per-recording state, so one pipeline can serve any number of
/// recordings, including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct StepPipeline {
    config: AppConfig,
}

impl StepPipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run every stage over accelerometer samples
    pub fn analyze(&self, samples: &[Sample]) -> Result<StepAnalysis, AnalysisError> {
        self.analyze_series(times_for(samples), magnitudes_for(samples))
    }

    /// Run every stage over an already computed magnitude series
    ///
    /// # Errors
    /// `InsufficientData` for fewer than two samples, `LengthMismatch` for
    /// misaligned series, and the configuration errors of
    /// [`AppConfig::validate`].
    pub fn analyze_series(
        &self,
        times: Vec<f64>,
        magnitudes: Vec<f64>,
    ) -> Result<StepAnalysis, AnalysisError> {
        check_series(&magnitudes, &times)?;
        self.config.validate()?;

        let strategy = self.config.counting.strategy;
        let thresholds = thresholds(&magnitudes, &times, &self.config.threshold)?;

        let (peaks, steps) = match strategy {
            CountingStrategy::Threshold => {
                let peaks = find_peaks(&magnitudes, &times, self.config.peaks.deadzone)?;
                let steps = count_above_threshold(
                    &magnitudes,
                    &peaks,
                    &thresholds,
                    self.config.threshold.floor,
                );
                (peaks, steps)
            }
            CountingStrategy::Periodicity => {
                let peaks = raw_peaks(&magnitudes);
                let steps = count_periodic(&peaks);
                (peaks, steps)
            }
        };

        tracing::debug!(
            "[StepPipeline] {} samples, {} peaks, {} steps ({:?})",
            magnitudes.len(),
            peaks.iter().filter(|&&p| p).count(),
            steps,
            strategy
        );

        Ok(StepAnalysis {
            strategy,
            times,
            magnitudes,
            peaks,
            thresholds,
            steps,
        })
    }

    /// Step count only
    pub fn count(&self, samples: &[Sample]) -> Result<usize, AnalysisError> {
        self.analyze(samples).map(|analysis| analysis.steps)
    }
}

/// Count steps in a recording with the given configuration
pub fn count_steps(samples: &[Sample], config: &AppConfig) -> Result<usize, AnalysisError> {
    StepPipeline::new(config.clone()).count(samples)
}

/// Precondition shared by every series-level stage
pub(crate) fn check_series(magnitudes: &[f64], times: &[f64]) -> Result<(), AnalysisError> {
    if magnitudes.len() != times.len() {
        return Err(AnalysisError::LengthMismatch {
            magnitudes: magnitudes.len(),
            times: times.len(),
        });
    }

    if magnitudes.len() < MIN_SAMPLES {
        return Err(AnalysisError::InsufficientData {
            required: MIN_SAMPLES,
            provided: magnitudes.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests;
