//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and scoring
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Physiological signal recorded during an exam.
///
/// Each signal drives one scatter slide: x is the in-test average of the
/// signal, y is the weighted exam score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Heart rate (beats per minute).
    Hr,
    /// Electrodermal activity (microsiemens).
    Eda,
    /// Skin temperature (degrees Celsius).
    Temp,
    /// Accelerometer magnitude (1/64 g units).
    Acc,
}

impl SignalKind {
    pub const ALL: [SignalKind; 4] = [
        SignalKind::Hr,
        SignalKind::Eda,
        SignalKind::Temp,
        SignalKind::Acc,
    ];

    /// Human-readable label for headers and slide titles.
    pub fn display_name(self) -> &'static str {
        match self {
            SignalKind::Hr => "Heart Rate (HR)",
            SignalKind::Eda => "Electrodermal Activity (EDA)",
            SignalKind::Temp => "Temperature",
            SignalKind::Acc => "Acceleration (ACC)",
        }
    }

    /// X-axis label for the signal's scatter chart.
    pub fn axis_label(self) -> &'static str {
        match self {
            SignalKind::Hr => "Average HR (BPM)",
            SignalKind::Eda => "Average EDA (uS)",
            SignalKind::Temp => "Average TEMP (C)",
            SignalKind::Acc => "Average ACC (1/64 g)",
        }
    }

    /// File name of the per-exam series CSV inside a student directory.
    pub fn file_name(self) -> &'static str {
        match self {
            SignalKind::Hr => "HR.csv",
            SignalKind::Eda => "EDA.csv",
            SignalKind::Temp => "TEMP.csv",
            SignalKind::Acc => "ACC.csv",
        }
    }

    /// Name of the value column in the series CSV.
    ///
    /// ACC has no single value column; its rows carry x/y/z components that
    /// are combined into a magnitude at ingest time.
    pub fn value_column(self) -> Option<&'static str> {
        match self {
            SignalKind::Hr => Some("HR"),
            SignalKind::Eda => Some("EDA"),
            SignalKind::Temp => Some("TEMP"),
            SignalKind::Acc => None,
        }
    }
}

/// One of the three graded exams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExamKind {
    Midterm1,
    Midterm2,
    Final,
}

impl ExamKind {
    pub const ALL: [ExamKind; 3] = [ExamKind::Midterm1, ExamKind::Midterm2, ExamKind::Final];

    pub fn display_name(self) -> &'static str {
        match self {
            ExamKind::Midterm1 => "Midterm 1",
            ExamKind::Midterm2 => "Midterm 2",
            ExamKind::Final => "Final",
        }
    }

    /// Directory component used by the dataset layout
    /// (`dataset/S01_processed/Midterm 1/HR.csv`).
    pub fn dir_name(self) -> &'static str {
        self.display_name()
    }
}

/// Phase of the recording session a series row belongs to.
///
/// Only `in-test` rows contribute to the per-exam signal average; the pre/post
/// windows are kept for the drilldown chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPeriod {
    #[serde(rename = "pre-test")]
    PreTest,
    #[serde(rename = "in-test")]
    InTest,
    #[serde(rename = "post-test")]
    PostTest,
}

impl TestPeriod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "pre-test" => Some(TestPeriod::PreTest),
            "in-test" => Some(TestPeriod::InTest),
            "post-test" => Some(TestPeriod::PostTest),
            _ => None,
        }
    }
}

/// One (predictor, response) pair fed to the regression core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A line `y = slope * x + intercept`.
///
/// Two instances exist per chart: the true OLS fit (computed once from all
/// observations) and the user fit (computed from a completed drag gesture).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineParams {
    pub slope: f64,
    pub intercept: f64,
}

impl LineParams {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Predicted y at the given x.
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// How closely a user-drawn line matches the true fit.
///
/// `normalized` is always in `[0, 100]`; `mse` is the raw mean squared
/// difference between the two lines' predictions over the observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyScore {
    pub mse: f64,
    pub normalized: f64,
}

/// A normalized observation: one (student, exam) pair on one signal slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// 1-based student number (rendered as `S01`, `S02`, ...).
    pub student: u32,
    pub exam: ExamKind,
    /// In-test average of the signal (the x value).
    pub signal_avg: f64,
    /// Weighted exam score (the y value; final exams are halved).
    pub score: f64,
}

impl Observation {
    pub fn student_id(&self) -> String {
        format!("S{:02}", self.student)
    }

    pub fn sample(&self) -> Sample {
        Sample::new(self.signal_avg, self.score)
    }
}

/// Summary stats about the observations behind one scatter slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    /// Compute min/max stats, or `None` when the set is empty or non-finite.
    pub fn from_observations(observations: &[Observation]) -> Option<Self> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for o in observations {
            x_min = x_min.min(o.signal_avg);
            x_max = x_max.max(o.signal_avg);
            y_min = y_min.min(o.score);
            y_max = y_max.max(o.score);
        }

        if !x_min.is_finite() || !x_max.is_finite() || !y_min.is_finite() || !y_max.is_finite() {
            return None;
        }

        Some(Self {
            n_points: observations.len(),
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct StudyConfig {
    /// Dataset root containing `grades.csv` and `S{nn}_processed/` directories.
    ///
    /// `None` means: use the env-configured directory if present, otherwise
    /// fall back to the seeded synthetic dataset.
    pub data_dir: Option<PathBuf>,
    /// Force the synthetic dataset even when a data directory exists.
    pub synthetic: bool,
    /// Number of students to load/generate.
    pub student_count: u32,
    /// Seed for synthetic data generation.
    pub sample_seed: u64,

    /// Accuracy (0..100) at or above which the feedback message congratulates.
    pub accuracy_threshold: f64,
    /// Scroll debounce window in milliseconds (one slide per physical scroll).
    pub scroll_debounce_ms: u64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_fit: Option<PathBuf>,
}

/// A saved fit file (JSON): enough to re-plot a slide's best-fit line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated: chrono::NaiveDateTime,
    pub signal: SignalKind,
    pub x_label: String,
    pub y_label: String,
    pub line: LineParams,
    pub stats: DatasetStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_params_predicts() {
        let line = LineParams::new(2.0, 1.0);
        assert!((line.y_at(3.0) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn student_ids_are_zero_padded() {
        let obs = Observation {
            student: 3,
            exam: ExamKind::Final,
            signal_avg: 80.0,
            score: 90.0,
        };
        assert_eq!(obs.student_id(), "S03");
    }

    #[test]
    fn stats_reject_non_finite() {
        let obs = vec![Observation {
            student: 1,
            exam: ExamKind::Midterm1,
            signal_avg: f64::NAN,
            score: 50.0,
        }];
        assert!(DatasetStats::from_observations(&obs).is_none());
    }

    #[test]
    fn period_parse_trims() {
        assert_eq!(TestPeriod::parse(" in-test "), Some(TestPeriod::InTest));
        assert_eq!(TestPeriod::parse("nap"), None);
    }
}
