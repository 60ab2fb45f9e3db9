//! Configuration management for step counting parameters
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling fast iteration on deadzones, threshold windows and counting
//! strategies without recompilation. Every section has defaults, so a config
//! file only needs to name the values it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::AnalysisError;

/// Configuration file read by [`AppConfig::load`], relative to the working
/// directory
pub const DEFAULT_CONFIG_PATH: &str = "assets/step_config.json";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ingest: IngestConfig,
    pub peaks: PeakDetectionConfig,
    pub threshold: ThresholdConfig,
    pub counting: CountingConfig,
}

/// How a window or deadzone radius is expressed
///
/// `ElapsedMs` is resolved against the time column: the radius becomes the
/// number of samples after the first that lie within the cutoff of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRadius {
    /// Fixed radius in samples
    Samples(usize),
    /// Radius derived from an elapsed-time cutoff in milliseconds
    ElapsedMs(f64),
}

/// Units of the raw time column before correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[default]
    Milliseconds,
    Seconds,
}

/// Where the step threshold comes from
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdMode {
    /// One threshold over the whole series
    #[default]
    Global,
    /// One threshold per sample from a local window
    Adaptive { window: WindowRadius },
}

/// Step decision rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingStrategy {
    /// Suppressed peaks whose magnitude exceeds the threshold
    #[default]
    Threshold,
    /// Consecutive equal gaps between raw peaks
    Periodicity,
}

/// Column layout of the sensor recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Lines before the header row
    pub lines_to_skip: usize,
    /// Header name of the timestamp column
    pub time_column: String,
    /// Header names of the accelerometer x, y, z columns
    pub accel_columns: [String; 3],
    /// Units of the raw timestamp column
    pub time_unit: TimeUnit,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            lines_to_skip: 0,
            time_column: "time".to_string(),
            accel_columns: [
                "accel x".to_string(),
                "accel y".to_string(),
                "accel z".to_string(),
            ],
            time_unit: TimeUnit::Milliseconds,
        }
    }
}

/// Peak detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakDetectionConfig {
    /// Radius around each peak in which weaker peaks are cleared
    pub deadzone: WindowRadius,
}

impl Default for PeakDetectionConfig {
    fn default() -> Self {
        Self {
            deadzone: WindowRadius::Samples(2),
        }
    }
}

/// Threshold parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub mode: ThresholdMode,
    /// Scale applied to the standard deviation before adding the mean
    pub deviation_multiplier: f64,
    /// Thresholds at or below this value never count a step
    pub floor: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            mode: ThresholdMode::Global,
            deviation_multiplier: 1.0,
            floor: 0.5,
        }
    }
}

impl ThresholdConfig {
    /// Adaptive mode with the 20 ms window used for per-sample thresholds
    pub fn adaptive() -> Self {
        Self {
            mode: ThresholdMode::Adaptive {
                window: WindowRadius::ElapsedMs(20.0),
            },
            ..Self::default()
        }
    }
}

/// Step counting parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingConfig {
    pub strategy: CountingStrategy,
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file doesn't exist or
    /// its JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default assets location
    ///
    /// A missing asset file is not an error here; the defaults apply.
    pub fn load() -> Self {
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            log::debug!("[Config] No {} found. Using defaults.", DEFAULT_CONFIG_PATH);
            return Self::default();
        }
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    /// Reject parameter values the analysis cannot work with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let multiplier = self.threshold.deviation_multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(AnalysisError::InvalidMultiplier { multiplier });
        }

        validate_radius(self.peaks.deadzone)?;
        if let ThresholdMode::Adaptive { window } = self.threshold.mode {
            validate_radius(window)?;
        }

        Ok(())
    }
}

fn validate_radius(radius: WindowRadius) -> Result<(), AnalysisError> {
    match radius {
        WindowRadius::ElapsedMs(cutoff_ms) if !cutoff_ms.is_finite() || cutoff_ms < 0.0 => {
            Err(AnalysisError::InvalidCutoff { cutoff_ms })
        }
        _ => Ok(()),
    }
}
