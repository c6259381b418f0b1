//! Dataset loading and normalization.
//!
//! The study dataset is either read from disk (`grades.csv` plus per-student
//! signal series, the layout produced by the recording pipeline) or generated
//! synthetically from a seed when no dataset directory is available.
//!
//! Either way the output is the same: per-signal observation lists (one point
//! per student/exam pair) plus the raw series kept around for the drilldown
//! chart.

use std::collections::HashMap;
use std::path::PathBuf;

use rayon::prelude::*;

use crate::domain::{ExamKind, Observation, SignalKind, StudyConfig};
use crate::error::AppError;

pub mod grades;
pub mod signals;
pub mod synthetic;

pub use grades::*;
pub use signals::*;
pub use synthetic::*;

/// Environment variable naming the dataset root (loaded via dotenvy).
pub const DATA_DIR_ENV: &str = "SCORESTRESS_DATA_DIR";

/// A row-level error encountered while reading dataset CSVs.
///
/// Bad rows are skipped, not fatal; they are reported so data problems stay
/// visible without killing a whole run.
#[derive(Debug, Clone)]
pub struct RowError {
    pub file: String,
    pub line: usize,
    pub message: String,
}

/// Where the observations came from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Disk(PathBuf),
    Synthetic { seed: u64 },
}

impl DataSource {
    pub fn label(&self) -> String {
        match self {
            DataSource::Disk(path) => path.display().to_string(),
            DataSource::Synthetic { seed } => format!("synthetic (seed {seed})"),
        }
    }
}

/// The fully loaded study dataset.
#[derive(Debug, Clone)]
pub struct StudyDataset {
    /// One observation list per signal, ordered by (student, exam).
    pub observations: HashMap<SignalKind, Vec<Observation>>,
    /// Raw per-(student, exam, signal) series for the drilldown chart.
    pub series: HashMap<(u32, ExamKind, SignalKind), SignalSeries>,
    pub row_errors: Vec<RowError>,
    pub source: DataSource,
}

impl StudyDataset {
    pub fn observations_for(&self, signal: SignalKind) -> &[Observation] {
        self.observations
            .get(&signal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn series_for(
        &self,
        student: u32,
        exam: ExamKind,
        signal: SignalKind,
    ) -> Option<&SignalSeries> {
        self.series.get(&(student, exam, signal))
    }
}

/// Resolve the dataset directory: explicit flag wins, then the environment.
pub fn resolve_data_dir(config: &StudyConfig) -> Option<PathBuf> {
    if let Some(dir) = &config.data_dir {
        return Some(dir.clone());
    }
    dotenvy::dotenv().ok();
    std::env::var(DATA_DIR_ENV).ok().map(PathBuf::from)
}

/// Load the dataset per config: from disk when a directory is resolved and
/// not overridden, otherwise synthetic.
pub fn load_dataset(config: &StudyConfig) -> Result<StudyDataset, AppError> {
    if !config.synthetic {
        if let Some(dir) = resolve_data_dir(config) {
            return load_disk_dataset(&dir, config);
        }
    }
    Ok(synthetic::generate_dataset(config))
}

fn load_disk_dataset(dir: &PathBuf, config: &StudyConfig) -> Result<StudyDataset, AppError> {
    let grade_book = grades::load_grade_book(&dir.join("grades.csv"))?;

    // Each (student, exam, signal) series lives in its own file; load them in
    // parallel per student.
    let students: Vec<u32> = (1..=config.student_count).collect();
    let per_student: Vec<_> = students
        .par_iter()
        .map(|&student| signals::load_student_series(dir, student))
        .collect();

    let mut series = HashMap::new();
    let mut row_errors = grade_book.row_errors.clone();
    for loaded in per_student {
        let loaded = loaded?;
        row_errors.extend(loaded.row_errors);
        for s in loaded.series {
            series.insert((s.student, s.exam, s.signal), s);
        }
    }

    let mut observations: HashMap<SignalKind, Vec<Observation>> = HashMap::new();
    for signal in SignalKind::ALL {
        let mut points = Vec::new();
        for &student in &students {
            for exam in ExamKind::ALL {
                let Some(s) = series.get(&(student, exam, signal)) else {
                    continue;
                };
                let Some(avg) = s.in_test_average() else {
                    row_errors.push(RowError {
                        file: format!("{}/{}", exam.dir_name(), signal.file_name()),
                        line: 0,
                        message: format!("S{student:02}: no in-test rows; observation skipped."),
                    });
                    continue;
                };
                let Some(score) = grade_book.weighted_score(student, exam) else {
                    continue;
                };
                points.push(Observation {
                    student,
                    exam,
                    signal_avg: avg,
                    score,
                });
            }
        }
        observations.insert(signal, points);
    }

    Ok(StudyDataset {
        observations,
        series,
        row_errors,
        source: DataSource::Disk(dir.clone()),
    })
}
