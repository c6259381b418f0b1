//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the dataset (disk or synthetic)
//! - fits the per-signal best-fit lines
//! - prints reports/plots or launches the TUI
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, PlotArgs, ScoreArgs, StudyArgs};
use crate::domain::{LineParams, StudyConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `scst` binary.
pub fn run() -> Result<(), AppError> {
    // We want `scst` and `scst -n 12` to behave like `scst tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Score(args) => handle_score(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_fit(args: StudyArgs) -> Result<(), AppError> {
    let config = study_config_from_args(&args);
    let run = pipeline::run_study(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));

    let slide = run.slide(args.signal).ok_or_else(|| {
        AppError::new(3, format!("No slide for signal {:?}.", args.signal))
    })?;

    let observations = run.dataset.observations_for(args.signal);
    let residuals = crate::report::compute_residuals(observations, slide.true_fit)?;
    let outliers = crate::report::rank_outliers(&residuals, args.top);
    println!("{}", crate::report::format_outliers(slide, &outliers));

    if config.plot {
        let plot =
            crate::plot::render_ascii_scatter(slide, None, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if let Some(path) = &config.export_results {
        crate::io::write_results_csv(path, slide, &residuals)?;
    }
    if let Some(path) = &config.export_fit {
        crate::io::write_fit_json(path, slide)?;
    }

    Ok(())
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = study_config_from_args(&args.study);
    let run = pipeline::run_study(&config)?;

    let slide = run.slide(args.study.signal).ok_or_else(|| {
        AppError::new(3, format!("No slide for signal {:?}.", args.study.signal))
    })?;

    let user_fit = LineParams::new(args.slope, args.intercept);
    let accuracy = crate::regress::score(&slide.samples, slide.true_fit, user_fit)?;

    println!(
        "{}",
        crate::report::format_feedback(accuracy, config.accuracy_threshold)
    );
    println!(
        "mse={:.4} | true fit: slope={:.4} intercept={:.2}",
        accuracy.mse, slide.true_fit.slope, slide.true_fit.intercept
    );

    if config.plot {
        let plot = crate::plot::render_ascii_scatter(
            slide,
            Some(user_fit),
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let fit = crate::io::read_fit_json(&args.fit)?;
    let plot = crate::plot::render_ascii_from_fit_file(&fit, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn study_config_from_args(args: &StudyArgs) -> StudyConfig {
    StudyConfig {
        data_dir: args.data_dir.clone(),
        synthetic: args.synthetic,
        student_count: args.students,
        sample_seed: args.seed,
        accuracy_threshold: args.threshold,
        scroll_debounce_ms: args.debounce_ms,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_fit: args.export_fit.clone(),
    }
}

/// Rewrite argv so `scst` defaults to `scst tui`.
///
/// Rules:
/// - `scst`                      -> `scst tui`
/// - `scst -n 12 ...`            -> `scst tui -n 12 ...`
/// - `scst --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "--help" | "-h" | "--version" | "-V"
    );
    let is_subcommand = matches!(arg1.as_str(), "fit" | "score" | "plot" | "tui");

    if !is_subcommand && !is_top_level_help_or_version {
        argv.insert(1, "tui".to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["scst"])), args(&["scst", "tui"]));
        assert_eq!(
            rewrite_args(args(&["scst", "-n", "12"])),
            args(&["scst", "tui", "-n", "12"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["scst", "fit", "--no-plot"])),
            args(&["scst", "fit", "--no-plot"])
        );
        assert_eq!(rewrite_args(args(&["scst", "--help"])), args(&["scst", "--help"]));
    }
}
