//! Plotters-powered chart widgets for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only description of one scatter slide.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. Lines are passed as two-point segments already
/// clipped to the x bounds.
pub struct ScatterChart<'a> {
    /// Scatter series: one point per (student, exam) observation.
    pub points: &'a [(f64, f64)],
    /// The observation currently selected for the drilldown panel.
    pub selected: Option<(f64, f64)>,
    /// Best-fit line segment; `None` until the user has drawn their line.
    pub best_fit: Option<[(f64, f64); 2]>,
    /// The user's line: the in-progress drag or the completed drawing.
    pub user_line: Option<[(f64, f64); 2]>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for ScatterChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels. Mesh lines are disabled: in low-resolution
            // terminal rendering they clutter more than they help.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // High-contrast palette for terminal readability. User line in
            // blue and best fit in red, matching the exported plot legend.
            let points_color = WHITE;
            let selected_color = RGBColor(255, 255, 0);
            let user_color = RGBColor(0, 128, 255);
            let fit_color = RGBColor(255, 0, 0);

            // 1) The user's line first, so the revealed fit wins overlaps.
            if let Some(seg) = self.user_line {
                chart.draw_series(LineSeries::new(seg.iter().copied(), &user_color))?;
            }

            // 2) The revealed best-fit line.
            if let Some(seg) = self.best_fit {
                chart.draw_series(LineSeries::new(seg.iter().copied(), &fit_color))?;
            }

            // 3) Observations.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), points_color)),
            )?;

            // 4) Selection highlight.
            //
            // We intentionally avoid `Circle` markers here. The underlying
            // `plotters-ratatui-backend` currently maps circle radii incorrectly
            // (pixel radius -> normalized canvas units), producing huge circles.
            // A colored `Pixel` reliably overrides the base white point.
            if let Some((x, y)) = self.selected {
                chart.draw_series(std::iter::once(Pixel::new((x, y), selected_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// The drilldown chart: one student's raw signal trace for one exam session.
pub struct SeriesChart<'a> {
    /// (seconds into session, value) in time order.
    pub series: &'a [(f64, f64)],
    /// In-test window boundaries (seconds), drawn as vertical markers.
    pub in_test: Option<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
}

impl<'a> Widget for SeriesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 6 {
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("time (s)")
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(4)
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            // In-test window markers go first so the trace draws over them.
            if let Some((start, end)) = self.in_test {
                let marker = RGBColor(128, 128, 128);
                for x in [start, end] {
                    chart.draw_series(LineSeries::new(
                        [(x, y0), (x, y1)].iter().copied(),
                        &marker,
                    ))?;
                }
            }

            let trace_color = RGBColor(220, 20, 60);
            chart.draw_series(LineSeries::new(self.series.iter().copied(), &trace_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
