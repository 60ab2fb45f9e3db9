// Magnitude - orientation-independent acceleration intensity
//
// A phone carried in a hand or pocket rotates freely while walking, so the
// individual axes are meaningless on their own. The Euclidean norm of the
// accelerometer vector is the signal every later stage works on.

use serde::{Deserialize, Serialize};

/// One accelerometer reading
///
/// `time_ms` is elapsed time since the first sample of the recording, already
/// unit-corrected by the ingestion layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time_ms: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sample {
    pub fn new(time_ms: f64, x: f64, y: f64, z: f64) -> Self {
        Self { time_ms, x, y, z }
    }

    /// Norm of this sample's acceleration vector
    pub fn magnitude(&self) -> f64 {
        magnitude(self.x, self.y, self.z)
    }
}

/// Euclidean norm: sqrt(x² + y² + z²)
pub fn magnitude(x: f64, y: f64, z: f64) -> f64 {
    (x * x + y * y + z * z).sqrt()
}

/// Magnitude of every sample, index-aligned with the input
pub fn magnitudes_for(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(Sample::magnitude).collect()
}

/// Magnitude of every raw accelerometer triple
pub fn magnitudes_for_rows(rows: &[[f64; 3]]) -> Vec<f64> {
    rows.iter().map(|[x, y, z]| magnitude(*x, *y, *z)).collect()
}

/// Elapsed-time column of a sample slice
pub fn times_for(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.time_ms).collect()
}
