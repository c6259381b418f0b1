//! Ordinary least squares over a single predictor.
//!
//! The sample sets here are tiny (tens of points, one per student/exam pair),
//! so the closed-form sum formulas are both sufficient and exact:
//!
//! ```text
//! slope     = (n*Σxy - Σx*Σy) / (n*Σx² - (Σx)²)
//! intercept = (Σy - slope*Σx) / n
//! ```
//!
//! No design matrix, no iterative solver. The only failure mode is a zero
//! denominator (all x identical), which is rejected explicitly.

use crate::domain::{LineParams, Sample};
use crate::regress::DegenerateInput;

/// Fit the OLS best-fit line through the samples.
pub fn fit(samples: &[Sample]) -> Result<LineParams, DegenerateInput> {
    let n = samples.len();
    if n < 2 {
        return Err(DegenerateInput::TooFewSamples);
    }

    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for s in samples {
        sum_x += s.x;
        sum_y += s.y;
        sum_xy += s.x * s.y;
        sum_x2 += s.x * s.x;
    }

    let denom = n_f * sum_x2 - sum_x * sum_x;
    if denom == 0.0 || !denom.is_finite() {
        return Err(DegenerateInput::ZeroXVariance);
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f;

    Ok(LineParams::new(slope, intercept))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(pairs: &[(f64, f64)]) -> Vec<Sample> {
        pairs.iter().map(|&(x, y)| Sample::new(x, y)).collect()
    }

    #[test]
    fn fits_exact_linear_data() {
        // y = 2x + 1 over x in 1..=5
        let data = samples(&[(1.0, 3.0), (2.0, 5.0), (3.0, 7.0), (4.0, 9.0), (5.0, 11.0)]);
        let line = fit(&data).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-10);
        assert!((line.intercept - 1.0).abs() < 1e-10);
    }

    #[test]
    fn line_passes_through_mean_point() {
        // OLS property: the fitted line passes through (mean_x, mean_y).
        let data = samples(&[
            (62.0, 71.0),
            (75.0, 88.0),
            (81.0, 64.0),
            (90.0, 93.0),
            (104.0, 85.0),
        ]);
        let line = fit(&data).unwrap();

        let n = data.len() as f64;
        let mean_x = data.iter().map(|s| s.x).sum::<f64>() / n;
        let mean_y = data.iter().map(|s| s.y).sum::<f64>() / n;
        assert!((line.y_at(mean_x) - mean_y).abs() < 1e-9);
    }

    #[test]
    fn identical_x_is_degenerate() {
        let data = samples(&[(5.0, 1.0), (5.0, 2.0)]);
        assert_eq!(fit(&data), Err(DegenerateInput::ZeroXVariance));
    }

    #[test]
    fn too_few_samples_is_degenerate() {
        assert_eq!(fit(&[]), Err(DegenerateInput::TooFewSamples));
        assert_eq!(
            fit(&[Sample::new(1.0, 2.0)]),
            Err(DegenerateInput::TooFewSamples)
        );
    }

    #[test]
    fn two_points_fit_exactly() {
        let data = samples(&[(0.0, 1.0), (10.0, 21.0)]);
        let line = fit(&data).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-12);
        assert!((line.intercept - 1.0).abs() < 1e-12);
    }
}
