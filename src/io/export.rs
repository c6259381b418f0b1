//! Export per-observation results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::SlideRun;
use crate::error::AppError;
use crate::report::ObservationResidual;

/// Write per-observation results for one signal slide to a CSV file.
pub fn write_results_csv(
    path: &Path,
    slide: &SlideRun,
    residuals: &[ObservationResidual],
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(
        file,
        "student,exam,signal,signal_avg,score,score_fit,residual"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    let signal = format!("{:?}", slide.signal).to_lowercase();
    for r in residuals {
        let o = &r.observation;
        writeln!(
            file,
            "{},{},{},{:.4},{:.4},{:.4},{:.4}",
            o.student_id(),
            o.exam.display_name(),
            signal,
            o.signal_avg,
            o.score,
            r.y_fit,
            r.residual,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
