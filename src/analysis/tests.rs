use super::*;
use crate::config::{ThresholdConfig, WindowRadius};
use crate::testing::SyntheticWalk;
use std::thread;

fn times(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64 * 10.0).collect()
}

fn config_with(deadzone: WindowRadius, multiplier: f64) -> AppConfig {
    let mut config = AppConfig::default();
    config.peaks.deadzone = deadzone;
    config.threshold.deviation_multiplier = multiplier;
    config
}

fn periodicity_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.counting.strategy = CountingStrategy::Periodicity;
    config
}

fn spikes_at(len: usize, indices: &[usize]) -> Vec<f64> {
    let mut magnitudes = vec![0.0; len];
    for &i in indices {
        magnitudes[i] = 1.0;
    }
    magnitudes
}

#[test]
fn test_two_separated_peaks_with_global_threshold() {
    let magnitudes = vec![1.0, 5.0, 1.0, 1.0, 6.0, 1.0];
    let pipeline = StepPipeline::new(config_with(WindowRadius::Samples(1), 1.0));

    let analysis = pipeline.analyze_series(times(6), magnitudes).unwrap();

    assert_eq!(peak_indices(&analysis.peaks), vec![1, 4]);
    // mean 2.5 + σ sqrt(5.5) ≈ 4.845: both 5 and 6 clear it
    match analysis.thresholds {
        ThresholdSeries::Global(value) => assert!((value - 4.845).abs() < 1e-3),
        ref other => panic!("Expected a global threshold, got {:?}", other),
    }
    assert_eq!(analysis.steps, 2);
}

#[test]
fn test_scaled_deviation_keeps_only_tallest_peak() {
    let magnitudes = vec![1.0, 5.0, 1.0, 1.0, 6.0, 1.0];
    let pipeline = StepPipeline::new(config_with(WindowRadius::Samples(1), 1.25));

    let analysis = pipeline.analyze_series(times(6), magnitudes).unwrap();

    // 2.5 + 1.25 · sqrt(5.5) ≈ 5.43
    assert_eq!(analysis.steps, 1);
    let counted: Vec<usize> = analysis
        .peak_rows()
        .into_iter()
        .filter(|row| row.above_threshold)
        .map(|row| row.index)
        .collect();
    assert_eq!(counted, vec![4]);
}

#[test]
fn test_peak_rows_carry_time_and_threshold() {
    let magnitudes = vec![1.0, 5.0, 1.0, 1.0, 6.0, 1.0];
    let pipeline = StepPipeline::new(config_with(WindowRadius::Samples(1), 1.25));
    let analysis = pipeline.analyze_series(times(6), magnitudes).unwrap();

    let rows = analysis.peak_rows();

    assert_eq!(analysis.peak_count(), 2);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].time_ms, 10.0);
    assert_eq!(rows[1].magnitude, 6.0);
    assert!(!rows[0].above_threshold);
    assert_eq!(rows[0].threshold, rows[1].threshold);
}

#[test]
fn test_periodicity_counts_steady_stride() {
    let pipeline = StepPipeline::new(periodicity_config());

    let steady = pipeline
        .analyze_series(times(15), spikes_at(15, &[2, 7, 12]))
        .unwrap();
    assert_eq!(steady.steps, 1);

    let uneven = pipeline
        .analyze_series(times(17), spikes_at(17, &[2, 7, 15]))
        .unwrap();
    assert_eq!(uneven.steps, 0);
}

#[test]
fn test_periodicity_uses_unsuppressed_peaks() {
    // Spikes 2 apart would be merged by a radius-2 deadzone
    let mut config = periodicity_config();
    config.peaks.deadzone = WindowRadius::Samples(2);
    let pipeline = StepPipeline::new(config);

    let analysis = pipeline
        .analyze_series(times(10), spikes_at(10, &[1, 3, 5, 7]))
        .unwrap();

    assert_eq!(peak_indices(&analysis.peaks), vec![1, 3, 5, 7]);
    assert_eq!(analysis.steps, 2);
}

#[test]
fn test_insufficient_data_fails_fast() {
    let pipeline = StepPipeline::default();

    assert_eq!(
        pipeline.analyze(&[]),
        Err(AnalysisError::InsufficientData {
            required: 2,
            provided: 0
        })
    );
    assert_eq!(
        pipeline.count(&[Sample::new(0.0, 0.0, 0.0, 9.81)]),
        Err(AnalysisError::InsufficientData {
            required: 2,
            provided: 1
        })
    );
}

#[test]
fn test_mismatched_series_rejected() {
    let err = StepPipeline::default()
        .analyze_series(times(3), vec![1.0, 2.0])
        .unwrap_err();
    assert_eq!(
        err,
        AnalysisError::LengthMismatch {
            magnitudes: 2,
            times: 3
        }
    );
}

#[test]
fn test_invalid_config_rejected() {
    let pipeline = StepPipeline::new(config_with(WindowRadius::Samples(1), -2.0));
    let err = pipeline
        .analyze_series(times(4), vec![1.0, 2.0, 1.0, 2.0])
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidMultiplier { .. }));
}

#[test]
fn test_clean_walk_counts_every_step() {
    let walk = SyntheticWalk::new(10);
    let samples = walk.samples();

    let analysis = StepPipeline::default().analyze(&samples).unwrap();

    assert_eq!(analysis.magnitudes.len(), samples.len());
    assert_eq!(peak_indices(&analysis.peaks), walk.crest_indices());
    assert_eq!(analysis.steps, 10);
}

#[test]
fn test_noisy_walk_with_time_deadzone() {
    let walk = SyntheticWalk::new(10).with_noise(0.05, 42);
    let samples = walk.samples();

    // Raw noise produces many local maxima around each crest
    let raw = raw_peaks(&magnitudes_for(&samples));
    assert!(peak_indices(&raw).len() > 10);

    // 150 ms at 100 Hz: radius 14
    let config = config_with(WindowRadius::ElapsedMs(150.0), 1.0);
    assert_eq!(count_steps(&samples, &config).unwrap(), 10);
}

#[test]
fn test_clean_walk_with_adaptive_thresholds() {
    let samples = SyntheticWalk::new(10).samples();
    let mut config = AppConfig::default();
    config.threshold = ThresholdConfig::adaptive();

    let analysis = StepPipeline::new(config).analyze(&samples).unwrap();

    match &analysis.thresholds {
        ThresholdSeries::PerSample(values) => assert_eq!(values.len(), samples.len()),
        other => panic!("Expected per-sample thresholds, got {:?}", other),
    }
    assert_eq!(analysis.steps, 10);
}

#[test]
fn test_clean_walk_periodicity() {
    let samples = SyntheticWalk::new(10).samples();

    // Ten evenly spaced crests give nine equal gaps, eight matching pairs
    let steps = count_steps(&samples, &periodicity_config()).unwrap();

    assert_eq!(steps, 8);
}

#[test]
fn test_pipeline_shared_across_threads() {
    let pipeline = StepPipeline::new(config_with(WindowRadius::ElapsedMs(150.0), 1.0));
    let walks: Vec<Vec<Sample>> = (0..4)
        .map(|seed| SyntheticWalk::new(6 + seed as usize).with_noise(0.05, seed).samples())
        .collect();

    let pipeline = &pipeline;
    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = walks
            .iter()
            .map(|samples| scope.spawn(move || pipeline.count(samples).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(counts, vec![6, 7, 8, 9]);
}
