//! Command-line parsing for the Score & Stress explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the regression/scoring code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::SignalKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "scst", version, about = "Score & Stress - exam-signal regression explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit best-fit lines for every signal, print diagnostics, and optionally plot/export.
    Fit(StudyArgs),
    /// Score a hypothesis line against the true fit (the scripting version of
    /// the draw-your-own-line exercise).
    Score(ScoreArgs),
    /// Plot a previously exported fit JSON.
    Plot(PlotArgs),
    /// Launch the interactive scrollytelling TUI.
    ///
    /// This uses the same underlying pipeline as `scst fit`, but renders the
    /// slides in a terminal UI using Ratatui.
    Tui(StudyArgs),
}

/// Common options for loading the dataset and fitting.
#[derive(Debug, Parser, Clone)]
pub struct StudyArgs {
    /// Dataset root (contains grades.csv and S{nn}_processed/ directories).
    /// Falls back to $SCORESTRESS_DATA_DIR, then to synthetic data.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Use the seeded synthetic cohort even when a dataset directory exists.
    #[arg(long)]
    pub synthetic: bool,

    /// Number of students to load/generate.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub students: u32,

    /// Random seed for synthetic data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Signal whose slide is plotted/exported by the non-interactive commands.
    #[arg(short = 's', long, value_enum, default_value_t = SignalKind::Hr)]
    pub signal: SignalKind,

    /// Accuracy (0..100) at or above which the feedback congratulates.
    #[arg(long, default_value_t = 70.0)]
    pub threshold: f64,

    /// Scroll debounce window in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub debounce_ms: u64,

    /// Show top-N over/under-performers.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-observation results for the selected signal to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the selected signal's fit (line + stats) to JSON.
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,
}

/// Options for scoring a hypothesis line non-interactively.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub study: StudyArgs,

    /// Hypothesis slope (data space: score per signal unit).
    #[arg(long)]
    pub slope: f64,

    /// Hypothesis intercept (data space).
    #[arg(long)]
    pub intercept: f64,
}

/// Options for plotting a saved fit.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Fit JSON file produced by `scst fit --export-fit`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
