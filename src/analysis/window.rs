// Window radius resolution shared by peak suppression and adaptive thresholds

use crate::config::WindowRadius;
use crate::error::AnalysisError;

/// Number of samples after the first that lie within `cutoff_ms` of it
///
/// Counting stops at the first sample at or past the cutoff, so a sampling
/// rate that changes later in the recording does not affect the radius. When
/// the first gap already reaches the cutoff the radius is 0.
pub fn radius_from_elapsed(times: &[f64], cutoff_ms: f64) -> Result<usize, AnalysisError> {
    if !cutoff_ms.is_finite() || cutoff_ms < 0.0 {
        return Err(AnalysisError::InvalidCutoff { cutoff_ms });
    }

    let Some(&start) = times.first() else {
        return Ok(0);
    };

    Ok(times
        .iter()
        .skip(1)
        .take_while(|&&t| t - start < cutoff_ms)
        .count())
}

/// Resolve a configured radius to an index count, clamped to `[0, len - 1]`
pub fn resolve_radius(radius: WindowRadius, times: &[f64]) -> Result<usize, AnalysisError> {
    let raw = match radius {
        WindowRadius::Samples(n) => n,
        WindowRadius::ElapsedMs(cutoff_ms) => radius_from_elapsed(times, cutoff_ms)?,
    };

    Ok(raw.min(times.len().saturating_sub(1)))
}
