// StepCounter - turning peaks into a step count
//
// Two decision rules, selected by `CountingStrategy`:
// - Threshold: a suppressed peak counts when its magnitude is above the
//   threshold at that index and the threshold itself is above a floor. The
//   floor stops a flat stretch, where the adaptive threshold collapses onto
//   the noise, from counting every ripple.
// - Periodicity: on raw peaks, each pair of consecutive equal peak-to-peak
//   gaps counts one step. This tracks a steady stride rhythm when amplitude
//   alone is unreliable (e.g. phone in a loose pocket).

use super::peaks::peak_indices;
use super::threshold::ThresholdSeries;

/// Count flagged peaks above their threshold
pub fn count_above_threshold(
    magnitudes: &[f64],
    peaks: &[bool],
    thresholds: &ThresholdSeries,
    floor: f64,
) -> usize {
    magnitudes
        .iter()
        .zip(peaks)
        .enumerate()
        .filter(|&(i, (&magnitude, &is_peak))| {
            let threshold = thresholds.at(i);
            is_peak && threshold > floor && magnitude > threshold
        })
        .count()
}

/// Index gaps between consecutive flagged peaks
pub fn stride_gaps(peaks: &[bool]) -> Vec<usize> {
    peak_indices(peaks)
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect()
}

/// Count consecutive equal stride gaps
///
/// Peaks at 2, 7, 12 (gaps 5, 5) count one step; 2, 7, 15 (gaps 5, 8) count
/// none. Expects unsuppressed peaks.
pub fn count_periodic(raw_peaks: &[bool]) -> usize {
    stride_gaps(raw_peaks)
        .windows(2)
        .filter(|pair| pair[0] == pair[1])
        .count()
}
