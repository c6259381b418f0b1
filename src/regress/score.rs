//! Accuracy scoring of a user-drawn line against the true fit.
//!
//! The score compares the two lines where it matters: at the observed x
//! values. The mean squared difference between their predictions is
//! normalized by the variance of the observed scores, so a line as wrong as
//! "predict the mean score everywhere" lands near 0 and a perfect match
//! lands at 100.

use crate::domain::{AccuracyScore, LineParams, Sample};
use crate::regress::DegenerateInput;

/// Score a user line against the true fit over the given samples.
///
/// `normalized` is clamped to `[0, 100]` so a wildly wrong line reads as 0
/// rather than a negative percentage.
pub fn score(
    samples: &[Sample],
    true_fit: LineParams,
    user_fit: LineParams,
) -> Result<AccuracyScore, DegenerateInput> {
    if samples.len() < 2 {
        return Err(DegenerateInput::TooFewSamples);
    }

    let n = samples.len() as f64;
    let mut sq_sum = 0.0;
    for s in samples {
        let diff = user_fit.y_at(s.x) - true_fit.y_at(s.x);
        sq_sum += diff * diff;
    }
    let mse = sq_sum / n;

    let max_error = sample_variance(samples.iter().map(|s| s.y));
    if max_error == 0.0 || !max_error.is_finite() {
        return Err(DegenerateInput::ZeroScoreVariance);
    }

    let accuracy = 100.0 * (1.0 - mse / max_error);
    let normalized = accuracy.clamp(0.0, 100.0);

    Ok(AccuracyScore { mse, normalized })
}

/// Unbiased sample variance (n-1 denominator), matching `d3.variance`.
fn sample_variance(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let mean = values.clone().sum::<f64>() / n_f;
    let sq_sum: f64 = values.map(|v| (v - mean) * (v - mean)).sum();
    sq_sum / (n_f - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(pairs: &[(f64, f64)]) -> Vec<Sample> {
        pairs.iter().map(|&(x, y)| Sample::new(x, y)).collect()
    }

    #[test]
    fn identical_lines_score_perfectly() {
        let data = samples(&[(60.0, 70.0), (80.0, 85.0), (100.0, 78.0)]);
        let line = LineParams::new(0.3, 55.0);
        let acc = score(&data, line, line).unwrap();
        assert_eq!(acc.mse, 0.0);
        assert_eq!(acc.normalized, 100.0);
    }

    #[test]
    fn wildly_wrong_line_clamps_to_zero() {
        let data = samples(&[(60.0, 70.0), (80.0, 72.0), (100.0, 74.0)]);
        let true_fit = LineParams::new(0.1, 64.0);
        // Predictions hundreds of points off; mse dwarfs the score variance.
        let user_fit = LineParams::new(-10.0, 900.0);
        let acc = score(&data, true_fit, user_fit).unwrap();
        assert!(acc.mse > 0.0);
        assert_eq!(acc.normalized, 0.0);
    }

    #[test]
    fn close_line_scores_high_but_imperfect() {
        let data = samples(&[(1.0, 10.0), (2.0, 20.0), (3.0, 30.0), (4.0, 40.0)]);
        let true_fit = LineParams::new(10.0, 0.0);
        let user_fit = LineParams::new(10.0, 1.0);
        let acc = score(&data, true_fit, user_fit).unwrap();
        // mse is exactly 1 (constant offset), variance is ~166.7.
        assert!((acc.mse - 1.0).abs() < 1e-12);
        assert!(acc.normalized > 99.0 && acc.normalized < 100.0);
    }

    #[test]
    fn identical_scores_are_degenerate() {
        let data = samples(&[(60.0, 75.0), (80.0, 75.0), (100.0, 75.0)]);
        let true_fit = LineParams::new(0.0, 75.0);
        let user_fit = LineParams::new(1.0, 0.0);
        assert_eq!(
            score(&data, true_fit, user_fit),
            Err(DegenerateInput::ZeroScoreVariance)
        );
    }

    #[test]
    fn variance_uses_unbiased_denominator() {
        // Variance of {1, 2, 3} is 1.0 with the n-1 denominator.
        let v = sample_variance([1.0, 2.0, 3.0].into_iter());
        assert!((v - 1.0).abs() < 1e-12);
    }
}
