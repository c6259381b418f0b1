//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the regression/scoring code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::{RunOutput, SlideRun};
use crate::domain::{AccuracyScore, Sample, StudyConfig};
use crate::report::{ObservationResidual, Outliers};

/// Feedback line shown after the user completes a drawn line.
pub fn format_feedback(accuracy: AccuracyScore, threshold: f64) -> String {
    if accuracy.normalized >= threshold {
        format!(
            "Great job! Your hypothesis matches the data. Accuracy: {:.1}%",
            accuracy.normalized
        )
    } else {
        format!(
            "Nice try, but the actual trend is a bit different. Accuracy: {:.1}%",
            accuracy.normalized
        )
    }
}

/// Format the full run summary (dataset + per-signal fit lines).
pub fn format_run_summary(run: &RunOutput, config: &StudyConfig) -> String {
    let mut out = String::new();

    out.push_str("=== scst - Score and Stress ===\n");
    out.push_str(&format!("Dataset: {}\n", run.dataset.source.label()));
    out.push_str(&format!("Students: {}\n", config.student_count));
    if !run.dataset.row_errors.is_empty() {
        out.push_str(&format!(
            "Skipped rows: {} (bad values in dataset CSVs)\n",
            run.dataset.row_errors.len()
        ));
    }

    out.push_str("\nBest-fit lines (weighted score vs in-test signal average):\n");
    out.push_str(&format!(
        "{:<28} {:>4} {:>10} {:>10} {:>8}\n",
        "signal", "n", "slope", "intercept", "r"
    ));
    for slide in &run.slides {
        out.push_str(&format!(
            "{:<28} {:>4} {:>10.4} {:>10.2} {:>8.3}\n",
            slide.signal.display_name(),
            slide.stats.n_points,
            slide.true_fit.slope,
            slide.true_fit.intercept,
            pearson_r(&slide.samples),
        ));
    }

    out
}

/// Format the over/under-performer tables for one signal slide.
pub fn format_outliers(slide: &SlideRun, outliers: &Outliers) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", slide.signal.display_name()));
    out.push_str("Scored above the line (overperformed their signal level):\n");
    out.push_str(&format_table(&outliers.above, slide));
    out.push('\n');
    out.push_str("Scored below the line:\n");
    out.push_str(&format_table(&outliers.below, slide));

    out
}

fn format_table(rows: &[ObservationResidual], slide: &SlideRun) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<10} {:>12} {:>8} {:>8} {:>9}\n",
        "id",
        "exam",
        trim_label(slide.signal.axis_label()),
        "score",
        "fit",
        "residual"
    ));
    out.push_str(&format!(
        "{:-<6} {:-<10} {:-<12} {:-<8} {:-<8} {:-<9}\n",
        "", "", "", "", "", ""
    ));

    for r in rows {
        let o = &r.observation;
        out.push_str(&format!(
            "{:<6} {:<10} {:>12.2} {:>8.2} {:>8.2} {:>+9.2}\n",
            o.student_id(),
            o.exam.display_name(),
            o.signal_avg,
            o.score,
            r.y_fit,
            r.residual,
        ));
    }

    out
}

/// Pearson correlation over the slide's samples.
///
/// Shown alongside the slope so a flat-but-noisy relationship is easy to tell
/// apart from a genuinely strong one.
pub fn pearson_r(samples: &[Sample]) -> f64 {
    let n = samples.len() as f64;
    if samples.len() < 2 {
        return f64::NAN;
    }
    let mean_x = samples.iter().map(|s| s.x).sum::<f64>() / n;
    let mean_y = samples.iter().map(|s| s.y).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for s in samples {
        let dx = s.x - mean_x;
        let dy = s.y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    sxy / denom
}

fn trim_label(label: &str) -> String {
    let mut s = label.to_string();
    s.truncate(12);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_congratulates_at_threshold() {
        let high = AccuracyScore {
            mse: 1.0,
            normalized: 87.3,
        };
        let msg = format_feedback(high, 70.0);
        assert!(msg.starts_with("Great job!"));
        assert!(msg.contains("87.3%"));

        let low = AccuracyScore {
            mse: 50.0,
            normalized: 12.04,
        };
        let msg = format_feedback(low, 70.0);
        assert!(msg.starts_with("Nice try"));
        assert!(msg.contains("12.0%"));
    }

    #[test]
    fn pearson_r_on_perfect_line() {
        let samples: Vec<Sample> = (0..5).map(|i| Sample::new(i as f64, 2.0 * i as f64)).collect();
        assert!((pearson_r(&samples) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_r_degenerate_is_nan() {
        let samples = vec![Sample::new(1.0, 5.0), Sample::new(2.0, 5.0)];
        assert!(pearson_r(&samples).is_nan());
    }
}
