//! Reporting utilities: residuals, outlier rankings, and formatted output.

use crate::domain::{LineParams, Observation};
use crate::error::AppError;

pub mod format;

pub use format::*;

/// One observation with its fitted value and residual.
#[derive(Debug, Clone)]
pub struct ObservationResidual {
    pub observation: Observation,
    pub y_fit: f64,
    pub residual: f64,
}

/// Top-N observations above and below the fit line.
///
/// "Above" students scored better than their signal level predicts; "below"
/// students scored worse.
#[derive(Debug, Clone)]
pub struct Outliers {
    pub above: Vec<ObservationResidual>,
    pub below: Vec<ObservationResidual>,
}

/// Compute fitted values and residuals for each observation.
pub fn compute_residuals(
    observations: &[Observation],
    fit: LineParams,
) -> Result<Vec<ObservationResidual>, AppError> {
    let mut out = Vec::with_capacity(observations.len());
    for o in observations {
        let y_fit = fit.y_at(o.signal_avg);
        if !y_fit.is_finite() {
            return Err(AppError::new(
                4,
                "Non-finite prediction during residual computation.",
            ));
        }
        out.push(ObservationResidual {
            observation: o.clone(),
            y_fit,
            residual: o.score - y_fit,
        });
    }
    Ok(out)
}

/// Rank the top over- and under-performers by residual.
pub fn rank_outliers(residuals: &[ObservationResidual], top_n: usize) -> Outliers {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| {
        b.residual
            .partial_cmp(&a.residual)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let above = sorted.iter().take(top_n).cloned().collect();

    sorted.sort_by(|a, b| {
        a.residual
            .partial_cmp(&b.residual)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let below = sorted.into_iter().take(top_n).collect();

    Outliers { above, below }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExamKind;

    fn obs(student: u32, x: f64, y: f64) -> Observation {
        Observation {
            student,
            exam: ExamKind::Midterm1,
            signal_avg: x,
            score: y,
        }
    }

    #[test]
    fn residuals_measure_distance_from_line() {
        let fit = LineParams::new(1.0, 0.0);
        let residuals =
            compute_residuals(&[obs(1, 50.0, 50.0), obs(2, 60.0, 65.0)], fit).unwrap();
        assert!((residuals[0].residual).abs() < 1e-12);
        assert!((residuals[1].residual - 5.0).abs() < 1e-12);
    }

    #[test]
    fn outliers_split_above_and_below() {
        let fit = LineParams::new(0.0, 70.0);
        let residuals = compute_residuals(
            &[obs(1, 50.0, 90.0), obs(2, 60.0, 70.0), obs(3, 70.0, 40.0)],
            fit,
        )
        .unwrap();
        let outliers = rank_outliers(&residuals, 1);
        assert_eq!(outliers.above[0].observation.student, 1);
        assert_eq!(outliers.below[0].observation.student, 3);
    }
}
