//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observations: `o`
//! - best-fit line: `*`
//! - user-drawn line: `+`

use crate::app::pipeline::SlideRun;
use crate::domain::{FitFile, LineParams};

/// Render a scatter plot for one signal slide, with the best-fit line and an
/// optional user line.
pub fn render_ascii_scatter(
    slide: &SlideRun,
    user_line: Option<LineParams>,
    width: usize,
    height: usize,
) -> String {
    let points: Vec<(f64, f64)> = slide.samples.iter().map(|s| (s.x, s.y)).collect();
    render_plot(
        &points,
        Some(slide.true_fit),
        user_line,
        (slide.stats.x_min, slide.stats.x_max),
        slide.signal.axis_label(),
        "Weighted score",
        width,
        height,
    )
}

/// Render a previously saved fit (line only, no observations).
pub fn render_ascii_from_fit_file(fit: &FitFile, width: usize, height: usize) -> String {
    render_plot(
        &[],
        Some(fit.line),
        None,
        (fit.stats.x_min, fit.stats.x_max),
        &fit.x_label,
        &fit.y_label,
        width,
        height,
    )
}

#[allow(clippy::too_many_arguments)]
fn render_plot(
    points: &[(f64, f64)],
    fit: Option<LineParams>,
    user_line: Option<LineParams>,
    x_range: (f64, f64),
    x_label: &str,
    y_label: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(20);
    let height = height.max(8);

    let (x_min, x_max) = pad_range(x_range.0, x_range.1);
    let (y_min, y_max) = y_bounds(points, fit, user_line, x_min, x_max);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so observations draw over them.
    if let Some(line) = user_line {
        draw_line(&mut grid, line, x_min, x_max, y_min, y_max, '+');
    }
    if let Some(line) = fit {
        draw_line(&mut grid, line, x_min, x_max, y_min, y_max, '*');
    }
    for &(x, y) in points {
        if let Some((col, row)) = to_cell(x, y, x_min, x_max, y_min, y_max, width, height) {
            grid[row][col] = 'o';
        }
    }

    let mut out = String::new();
    out.push_str(&format!("{y_label}\n"));
    out.push_str(&format!("{y_max:>9.1} +{}+\n", "-".repeat(width)));
    for row in &grid {
        out.push_str("          |");
        out.extend(row.iter());
        out.push_str("|\n");
    }
    out.push_str(&format!("{y_min:>9.1} +{}+\n", "-".repeat(width)));
    out.push_str(&format!(
        "          {:<12.1}{:>width$.1}  ({x_label})\n",
        x_min,
        x_max,
        width = width.saturating_sub(12)
    ));
    out.push_str("          o observation   * best fit   + your line\n");

    out
}

/// Widen a possibly-degenerate range by 5% on both sides.
fn pad_range(min: f64, max: f64) -> (f64, f64) {
    let (mut min, mut max) = if min <= max { (min, max) } else { (max, min) };
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min).abs() * 0.05).max(1e-9);
    min -= pad;
    max += pad;
    (min, max)
}

fn y_bounds(
    points: &[(f64, f64)],
    fit: Option<LineParams>,
    user_line: Option<LineParams>,
    x_min: f64,
    x_max: f64,
) -> (f64, f64) {
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(_, y) in points {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    for line in [fit, user_line].into_iter().flatten() {
        for x in [x_min, x_max] {
            let y = line.y_at(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        return (0.0, 1.0);
    }
    pad_range(y_min, y_max)
}

fn draw_line(
    grid: &mut [Vec<char>],
    line: LineParams,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    glyph: char,
) {
    let height = grid.len();
    let width = grid[0].len();
    // One sample per column keeps the line continuous without gaps.
    for col in 0..width {
        let u = col as f64 / (width - 1) as f64;
        let x = x_min + u * (x_max - x_min);
        let y = line.y_at(x);
        if let Some((c, row)) = to_cell(x, y, x_min, x_max, y_min, y_max, width, height) {
            grid[row][c] = glyph;
        }
    }
}

fn to_cell(
    x: f64,
    y: f64,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
) -> Option<(usize, usize)> {
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    let u = (x - x_min) / (x_max - x_min);
    let v = (y - y_min) / (y_max - y_min);
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return None;
    }
    let col = (u * (width - 1) as f64).round() as usize;
    // Row 0 is the top of the grid.
    let row = ((1.0 - v) * (height - 1) as f64).round() as usize;
    Some((col.min(width - 1), row.min(height - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DatasetStats, Sample, SignalKind};

    fn slide() -> SlideRun {
        let samples = vec![
            Sample::new(60.0, 50.0),
            Sample::new(80.0, 70.0),
            Sample::new(100.0, 90.0),
        ];
        let true_fit = crate::regress::fit(&samples).unwrap();
        SlideRun {
            signal: SignalKind::Hr,
            stats: DatasetStats {
                n_points: samples.len(),
                x_min: 60.0,
                x_max: 100.0,
                y_min: 50.0,
                y_max: 90.0,
            },
            samples,
            true_fit,
        }
    }

    #[test]
    fn plot_contains_points_line_and_labels() {
        let out = render_ascii_scatter(&slide(), None, 60, 15);
        assert!(out.contains('o'));
        assert!(out.contains('*'));
        assert!(out.contains("Average HR (BPM)"));
        assert!(out.contains("Weighted score"));
    }

    #[test]
    fn user_line_gets_its_own_glyph() {
        let out = render_ascii_scatter(&slide(), Some(LineParams::new(-1.0, 160.0)), 60, 15);
        assert!(out.contains('+'));
    }

    #[test]
    fn output_is_deterministic() {
        let a = render_ascii_scatter(&slide(), None, 60, 15);
        let b = render_ascii_scatter(&slide(), None, 60, 15);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_range_does_not_panic() {
        let (lo, hi) = pad_range(5.0, 5.0);
        assert!(lo < hi);
    }
}
