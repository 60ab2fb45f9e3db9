// PeakDetector - local maxima with deadzone suppression
//
// Algorithm:
// 1. Flag every strict local maximum: m[i] > m[i-1] && m[i] > m[i+1]
// 2. Walk the flags left to right. For each still-flagged index i, scan
//    [i - r, i + r) for another flagged index. The first one found is compared
//    with i, the smaller of the two is cleared, and the scan of that window
//    stops there.
//
// Step 2 is greedy and order dependent. A peak can be cleared by a neighbour
// that is itself cleared later, leaving a gap no survivor covers.

use crate::config::WindowRadius;
use crate::error::AnalysisError;

use super::window::resolve_radius;

/// Flag strict local maxima
///
/// Endpoints are never flagged and plateaus (ties) are never peaks.
pub fn raw_peaks(magnitudes: &[f64]) -> Vec<bool> {
    let mut peaks = vec![false; magnitudes.len()];

    for i in 1..magnitudes.len().saturating_sub(1) {
        if magnitudes[i] > magnitudes[i - 1] && magnitudes[i] > magnitudes[i + 1] {
            peaks[i] = true;
        }
    }

    peaks
}

/// Clear weaker peaks that fall within `radius` of a stronger one
///
/// Flags only ever go from `true` to `false`. On equal magnitudes the peak
/// found by the scan is cleared and the one being visited survives.
pub fn suppress_in_deadzone(peaks: &mut [bool], magnitudes: &[f64], radius: usize) {
    let len = peaks.len().min(magnitudes.len());
    if len == 0 {
        return;
    }
    let radius = radius.min(len - 1);

    for index in 0..len {
        if !peaks[index] {
            continue;
        }

        let start = index.saturating_sub(radius);
        let end = (index + radius).min(len - 1);
        let current = magnitudes[index];

        if let Some(other) = (start..end).find(|&j| j != index && peaks[j]) {
            if magnitudes[other] > current {
                peaks[index] = false;
            } else {
                peaks[other] = false;
            }
        }
    }
}

/// Raw peaks followed by deadzone suppression
///
/// # Errors
/// `InsufficientData` for fewer than two samples, `LengthMismatch` when the
/// time column is not index-aligned with the magnitudes.
pub fn find_peaks(
    magnitudes: &[f64],
    times: &[f64],
    deadzone: WindowRadius,
) -> Result<Vec<bool>, AnalysisError> {
    super::check_series(magnitudes, times)?;

    let radius = resolve_radius(deadzone, times)?;
    let mut peaks = raw_peaks(magnitudes);
    suppress_in_deadzone(&mut peaks, magnitudes, radius);

    Ok(peaks)
}

/// Indices of flagged peaks, ascending
pub fn peak_indices(peaks: &[bool]) -> Vec<usize> {
    peaks
        .iter()
        .enumerate()
        .filter_map(|(i, &flagged)| flagged.then_some(i))
        .collect()
}
