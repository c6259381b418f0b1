//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset load -> per-signal observations -> OLS fit -> stats
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::{self, StudyDataset};
use crate::domain::{DatasetStats, LineParams, Sample, SignalKind, StudyConfig};
use crate::error::AppError;
use crate::regress;

/// Everything one scatter slide needs: observations, samples, stats, and the
/// true best-fit line (kept hidden by the UI until the user draws).
#[derive(Debug, Clone)]
pub struct SlideRun {
    pub signal: SignalKind,
    pub samples: Vec<Sample>,
    pub stats: DatasetStats,
    pub true_fit: LineParams,
}

/// All computed outputs of a study run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: StudyDataset,
    /// One entry per signal, in slide order.
    pub slides: Vec<SlideRun>,
}

impl RunOutput {
    pub fn slide(&self, signal: SignalKind) -> Option<&SlideRun> {
        self.slides.iter().find(|s| s.signal == signal)
    }
}

/// Load the dataset and fit every signal slide.
pub fn run_study(config: &StudyConfig) -> Result<RunOutput, AppError> {
    let dataset = data::load_dataset(config)?;
    run_study_with_dataset(config, dataset)
}

/// Fit every signal slide over a pre-loaded dataset.
///
/// Useful for the TUI, which reloads on demand but refits in place.
pub fn run_study_with_dataset(
    _config: &StudyConfig,
    dataset: StudyDataset,
) -> Result<RunOutput, AppError> {
    let mut slides = Vec::with_capacity(SignalKind::ALL.len());

    for signal in SignalKind::ALL {
        let observations = dataset.observations_for(signal);
        let stats = DatasetStats::from_observations(observations).ok_or_else(|| {
            AppError::new(
                3,
                format!("No usable observations for {}.", signal.display_name()),
            )
        })?;

        let samples: Vec<Sample> = observations.iter().map(|o| o.sample()).collect();
        let true_fit = regress::fit(&samples).map_err(|e| {
            AppError::new(3, format!("{}: {e}", signal.display_name()))
        })?;

        slides.push(SlideRun {
            signal,
            samples,
            stats,
            true_fit,
        });
    }

    Ok(RunOutput { dataset, slides })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_config() -> StudyConfig {
        StudyConfig {
            data_dir: None,
            synthetic: true,
            student_count: 10,
            sample_seed: 7,
            accuracy_threshold: 70.0,
            scroll_debounce_ms: 500,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_fit: None,
        }
    }

    #[test]
    fn run_study_fits_all_signals() {
        let run = run_study(&synthetic_config()).unwrap();
        assert_eq!(run.slides.len(), 4);
        for slide in &run.slides {
            assert_eq!(slide.stats.n_points, 30);
            assert!(slide.true_fit.slope.is_finite());
            assert!(slide.true_fit.intercept.is_finite());
        }
        assert!(run.slide(SignalKind::Hr).is_some());
    }
}
