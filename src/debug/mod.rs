//! Debug bundle writer for inspecting the loaded dataset and fitted lines.
//!
//! Triggered from the TUI (`d`); writes a timestamped markdown file so a
//! surprising-looking slide can be diffed against the raw numbers offline.

use std::fmt::Write as _;
use std::fs::create_dir_all;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::domain::StudyConfig;
use crate::error::AppError;
use crate::report;

pub fn write_debug_bundle(run: &RunOutput, config: &StudyConfig) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("scst_debug_seed{}_{ts}.md", config.sample_seed));

    let body = render_bundle(run, config);
    std::fs::write(&path, body)
        .map_err(|e| AppError::new(4, format!("Failed to write debug file: {e}")))?;

    Ok(path)
}

fn render_bundle(run: &RunOutput, config: &StudyConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# scst debug bundle");
    let _ = writeln!(out, "- generated: {}", Local::now().to_rfc3339());
    let _ = writeln!(out, "- source: {}", run.dataset.source.label());
    let _ = writeln!(out, "- students: {}", config.student_count);
    let _ = writeln!(out, "- sample_seed: {}", config.sample_seed);
    let _ = writeln!(out, "- skipped_rows: {}", run.dataset.row_errors.len());

    let _ = writeln!(out, "\n## Fits");
    let _ = writeln!(out, "| signal | n | slope | intercept | r |");
    let _ = writeln!(out, "| - | - | - | - | - |");
    for slide in &run.slides {
        let _ = writeln!(
            out,
            "| {} | {} | {:.6} | {:.6} | {:.4} |",
            slide.signal.display_name(),
            slide.stats.n_points,
            slide.true_fit.slope,
            slide.true_fit.intercept,
            report::pearson_r(&slide.samples),
        );
    }

    for slide in &run.slides {
        let _ = writeln!(out, "\n## {}", slide.signal.display_name());
        let _ = writeln!(
            out,
            "x=[{:.3}, {:.3}] y=[{:.2}, {:.2}]",
            slide.stats.x_min, slide.stats.x_max, slide.stats.y_min, slide.stats.y_max
        );
        let _ = writeln!(out, "| student | exam | signal_avg | score | fit | residual |");
        let _ = writeln!(out, "| - | - | - | - | - | - |");
        for o in run.dataset.observations_for(slide.signal) {
            let y_fit = slide.true_fit.y_at(o.signal_avg);
            let _ = writeln!(
                out,
                "| {} | {} | {:.3} | {:.2} | {:.2} | {:+.2} |",
                o.student_id(),
                o.exam.display_name(),
                o.signal_avg,
                o.score,
                y_fit,
                o.score - y_fit,
            );
        }
    }

    if !run.dataset.row_errors.is_empty() {
        let _ = writeln!(out, "\n## Skipped rows");
        for e in &run.dataset.row_errors {
            let _ = writeln!(out, "- {}:{}: {}", e.file, e.line, e.message);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_study;

    #[test]
    fn bundle_covers_every_signal() {
        let config = StudyConfig {
            data_dir: None,
            synthetic: true,
            student_count: 4,
            sample_seed: 1,
            accuracy_threshold: 70.0,
            scroll_debounce_ms: 500,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_fit: None,
        };
        let run = run_study(&config).unwrap();
        let body = render_bundle(&run, &config);
        assert!(body.contains("## Heart Rate (HR)"));
        assert!(body.contains("## Acceleration (ACC)"));
        assert!(body.contains("| S01 |"));
    }
}
