// Statistics - mean and sample standard deviation
//
// The standard deviation uses Bessel's correction (divide by n - 1). Every
// threshold downstream is calibrated against that choice, so switching to the
// population variance would silently move all step decisions.

use crate::error::AnalysisError;

/// Arithmetic mean
///
/// # Errors
/// `InsufficientData` for an empty slice.
pub fn mean(values: &[f64]) -> Result<f64, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            provided: 0,
        });
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation around a precomputed mean
///
/// Formula: sqrt(Σ(v - mean)² / (n - 1))
///
/// # Errors
/// `InsufficientData` when fewer than two values are given.
pub fn standard_deviation(values: &[f64], mean: f64) -> Result<f64, AnalysisError> {
    if values.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            provided: values.len(),
        });
    }

    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok((sum_sq / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(mean(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_mean_rejects_empty() {
        assert_eq!(
            mean(&[]),
            Err(AnalysisError::InsufficientData {
                required: 1,
                provided: 0
            })
        );
    }

    #[test]
    fn test_standard_deviation_of_constant_pair_is_zero() {
        let values = [4.2, 4.2];
        let m = mean(&values).unwrap();
        assert_eq!(standard_deviation(&values, m).unwrap(), 0.0);
    }

    #[test]
    fn test_standard_deviation_uses_bessel_correction() {
        // Σ(v - 5)² = 32 over 8 values: population σ = 2, sample σ = sqrt(32 / 7)
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values).unwrap();
        let sd = standard_deviation(&values, m).unwrap();

        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(sd > 2.0);
    }

    #[test]
    fn test_standard_deviation_rejects_single_value() {
        assert_eq!(
            standard_deviation(&[3.0], 3.0),
            Err(AnalysisError::InsufficientData {
                required: 2,
                provided: 1
            })
        );
    }
}
