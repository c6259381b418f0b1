//! Read/write fit JSON files.
//!
//! Fit JSON is the "portable" representation of one slide's best-fit line:
//! slope/intercept plus the dataset stats and axis labels needed to re-plot
//! it later without the observations. The schema is `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::SlideRun;
use crate::domain::FitFile;
use crate::error::AppError;

/// Write a fit JSON file for one signal slide.
pub fn write_fit_json(path: &Path, slide: &SlideRun) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create fit JSON '{}': {e}", path.display()),
        )
    })?;

    let fit = FitFile {
        tool: "scst".to_string(),
        generated: chrono::Local::now().naive_local(),
        signal: slide.signal,
        x_label: slide.signal.axis_label().to_string(),
        y_label: "Weighted score".to_string(),
        line: slide.true_fit,
        stats: slide.stats.clone(),
    };

    serde_json::to_writer_pretty(file, &fit)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open fit JSON '{}': {e}", path.display()),
        )
    })?;
    let fit: FitFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DatasetStats, LineParams, Sample, SignalKind};

    #[test]
    fn fit_json_round_trips() {
        let samples = vec![Sample::new(1.0, 3.0), Sample::new(2.0, 5.0)];
        let slide = SlideRun {
            signal: SignalKind::Eda,
            stats: DatasetStats {
                n_points: 2,
                x_min: 1.0,
                x_max: 2.0,
                y_min: 3.0,
                y_max: 5.0,
            },
            samples,
            true_fit: LineParams::new(2.0, 1.0),
        };

        let mut path = std::env::temp_dir();
        path.push(format!("scst-fit-test-{}.json", std::process::id()));

        write_fit_json(&path, &slide).unwrap();
        let loaded = read_fit_json(&path).unwrap();
        assert_eq!(loaded.signal, SignalKind::Eda);
        assert_eq!(loaded.line, slide.true_fit);
        assert_eq!(loaded.stats.n_points, 2);
        let _ = std::fs::remove_file(path);
    }
}
