// AdaptiveThreshold - mean + k·σ step thresholds
//
// Two modes:
// - Global: one threshold over the whole recording
// - Adaptive: one threshold per sample from a window of 2r + 1 magnitudes
//
// Adaptive window placement:
//   start = max(i - r, 0)
//   end   = min(start + 2r + 1, n)
// Near the start of the series the window slides right and keeps its full
// size instead of shrinking; near the end it is simply truncated. The two
// edges are treated differently and that is kept for compatibility with
// existing recordings' counts.

use serde::{Deserialize, Serialize};

use crate::config::{ThresholdConfig, ThresholdMode, WindowRadius};
use crate::error::AnalysisError;

use super::statistics::{mean, standard_deviation};
use super::window::resolve_radius;

/// Threshold used by the step decision, either shared or per sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ThresholdSeries {
    Global(f64),
    PerSample(Vec<f64>),
}

impl ThresholdSeries {
    /// Threshold that applies at `index`
    ///
    /// Out-of-range indices on a per-sample series yield infinity, which no
    /// magnitude can exceed.
    pub fn at(&self, index: usize) -> f64 {
        match self {
            ThresholdSeries::Global(value) => *value,
            ThresholdSeries::PerSample(values) => {
                values.get(index).copied().unwrap_or(f64::INFINITY)
            }
        }
    }
}

/// multiplier · σ + mean
///
/// # Errors
/// `InvalidMultiplier` for a negative or non-finite multiplier,
/// `InsufficientData` for fewer than two values.
pub fn threshold(values: &[f64], mean: f64, multiplier: f64) -> Result<f64, AnalysisError> {
    check_multiplier(multiplier)?;
    Ok(standard_deviation(values, mean)? * multiplier + mean)
}

/// One threshold over the whole series
pub fn global_threshold(magnitudes: &[f64], multiplier: f64) -> Result<f64, AnalysisError> {
    let m = mean(magnitudes)?;
    threshold(magnitudes, m, multiplier)
}

/// Per-sample thresholds from left-clamped windows
///
/// A radius of zero makes every window a single sample; its threshold is the
/// sample itself.
pub fn adaptive_thresholds(
    magnitudes: &[f64],
    times: &[f64],
    window: WindowRadius,
    multiplier: f64,
) -> Result<Vec<f64>, AnalysisError> {
    super::check_series(magnitudes, times)?;
    check_multiplier(multiplier)?;

    let radius = resolve_radius(window, times)?;
    let size = 2 * radius + 1;
    let len = magnitudes.len();

    (0..len)
        .map(|index| {
            let start = index.saturating_sub(radius);
            let end = (start + size).min(len);
            window_threshold(&magnitudes[start..end], multiplier)
        })
        .collect()
}

/// Thresholds for the configured mode
pub fn thresholds(
    magnitudes: &[f64],
    times: &[f64],
    config: &ThresholdConfig,
) -> Result<ThresholdSeries, AnalysisError> {
    match config.mode {
        ThresholdMode::Global => {
            super::check_series(magnitudes, times)?;
            global_threshold(magnitudes, config.deviation_multiplier).map(ThresholdSeries::Global)
        }
        ThresholdMode::Adaptive { window } => {
            adaptive_thresholds(magnitudes, times, window, config.deviation_multiplier)
                .map(ThresholdSeries::PerSample)
        }
    }
}

fn window_threshold(cluster: &[f64], multiplier: f64) -> Result<f64, AnalysisError> {
    match cluster {
        [single] => Ok(*single),
        _ => {
            let m = mean(cluster)?;
            threshold(cluster, m, multiplier)
        }
    }
}

fn check_multiplier(multiplier: f64) -> Result<(), AnalysisError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(AnalysisError::InvalidMultiplier { multiplier });
    }
    Ok(())
}
