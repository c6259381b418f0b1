//! Ratatui-based terminal UI.
//!
//! The TUI renders the presentation as a scroll-driven slide deck: title and
//! intro slides, one scatter slide per signal with the draw-your-own-line
//! exercise, and a conclusion. Mouse wheel (or keys) moves between slides;
//! click-and-drag on a scatter slide draws the hypothesis line.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Terminal,
};

use crate::app::pipeline::{run_study, RunOutput, SlideRun};
use crate::cli::StudyArgs;
use crate::deck::{Deck, DrawState, Exercise, Scroll, Slide};
use crate::domain::{LineParams, SignalKind, StudyConfig, TestPeriod};
use crate::error::AppError;
use crate::regress::ScreenPoint;

mod plotters_chart;

use plotters_chart::{ScatterChart, SeriesChart};

/// Start the TUI.
pub fn run(args: StudyArgs) -> Result<(), AppError> {
    let config = crate::app::study_config_from_args(&args);
    let run = run_study(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, run);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen, mouse capture)
/// on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

/// Terminal-cell to data-space mapping for the scatter chart.
///
/// The Plotters widget reserves a 1-cell margin plus a 6-column left and
/// 3-row bottom label area inside its render rect; the remainder is the plot
/// area mouse gestures are mapped through.
#[derive(Debug, Clone, Copy)]
struct ChartGeometry {
    plot: Rect,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl ChartGeometry {
    fn new(widget_rect: Rect, x_bounds: [f64; 2], y_bounds: [f64; 2]) -> Self {
        let plot = Rect {
            x: widget_rect.x + 7,
            y: widget_rect.y + 1,
            width: widget_rect.width.saturating_sub(8),
            height: widget_rect.height.saturating_sub(5),
        };
        Self {
            plot,
            x_bounds,
            y_bounds,
        }
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.plot.x
            && column < self.plot.x + self.plot.width
            && row >= self.plot.y
            && row < self.plot.y + self.plot.height
    }

    /// Screen column -> data x.
    fn invert_x(&self, column: f64) -> f64 {
        let span = (self.plot.width.saturating_sub(1)).max(1) as f64;
        let u = (column - self.plot.x as f64) / span;
        self.x_bounds[0] + u * (self.x_bounds[1] - self.x_bounds[0])
    }

    /// Screen row -> data y. Terminal rows grow downward, data y grows upward.
    fn invert_y(&self, row: f64) -> f64 {
        let span = (self.plot.height.saturating_sub(1)).max(1) as f64;
        let u = (row - self.plot.y as f64) / span;
        self.y_bounds[1] - u * (self.y_bounds[1] - self.y_bounds[0])
    }
}

struct App {
    config: StudyConfig,
    run: RunOutput,
    deck: Deck,
    /// One drawing exercise per scatter slide.
    exercises: HashMap<SignalKind, Exercise>,
    /// Feedback message from the last scored drawing, per slide.
    feedback: HashMap<SignalKind, String>,
    /// Drilldown selection (index into the signal's observation list).
    selected: HashMap<SignalKind, usize>,
    /// Geometry of the scatter chart from the last draw; needed to map mouse
    /// coordinates back into data space.
    geometry: Option<ChartGeometry>,
    status: String,
}

impl App {
    fn new(config: StudyConfig, run: RunOutput) -> Self {
        let deck = Deck::new(Duration::from_millis(config.scroll_debounce_ms));
        let status = format!("Loaded {}.", run.dataset.source.label());
        Self {
            config,
            run,
            deck,
            exercises: HashMap::new(),
            feedback: HashMap::new(),
            selected: HashMap::new(),
            geometry: None,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    self.handle_mouse(mouse);
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Down | KeyCode::PageDown | KeyCode::Char('j') | KeyCode::Char(' ') => {
                self.scroll(Scroll::Down);
            }
            KeyCode::Up | KeyCode::PageUp | KeyCode::Char('k') => {
                self.scroll(Scroll::Up);
            }
            KeyCode::Home => self.deck.jump(0),
            KeyCode::End => self.deck.jump(self.deck.len() - 1),
            KeyCode::Left => self.cycle_selection(-1),
            KeyCode::Right => self.cycle_selection(1),
            KeyCode::Char('x') => {
                if let Slide::Signal(signal) = self.deck.current() {
                    self.exercises.entry(signal).or_default().reset();
                    self.feedback.remove(&signal);
                    self.status = "Drawing cleared. Drag a new line.".to_string();
                }
            }
            KeyCode::Char('r') => {
                self.config.sample_seed = self.config.sample_seed.wrapping_add(1);
                self.run = run_study(&self.config)?;
                self.exercises.clear();
                self.feedback.clear();
                self.selected.clear();
                self.status = format!("Reloaded {}.", self.run.dataset.source.label());
            }
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(&self.run, &self.config) {
                    Ok(path) => {
                        self.status = format!("Wrote debug bundle: {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Debug write failed: {err}");
                    }
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll(Scroll::Down),
            MouseEventKind::ScrollUp => self.scroll(Scroll::Up),
            MouseEventKind::Down(MouseButton::Left) => {
                let Slide::Signal(signal) = self.deck.current() else {
                    return;
                };
                let Some(geom) = self.geometry else {
                    return;
                };
                if geom.contains(mouse.column, mouse.row) {
                    self.exercises
                        .entry(signal)
                        .or_default()
                        .begin(ScreenPoint::new(mouse.column as f64, mouse.row as f64));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Slide::Signal(signal) = self.deck.current() {
                    self.exercises
                        .entry(signal)
                        .or_default()
                        .update(ScreenPoint::new(mouse.column as f64, mouse.row as f64));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Slide::Signal(signal) = self.deck.current() {
                    self.finish_gesture(
                        signal,
                        ScreenPoint::new(mouse.column as f64, mouse.row as f64),
                    );
                }
            }
            _ => {}
        }
    }

    fn scroll(&mut self, direction: Scroll) {
        if self.deck.scroll(direction, Instant::now()) {
            self.status = format!(
                "Slide {}/{}: {}",
                self.deck.index() + 1,
                self.deck.len(),
                self.deck.current().title()
            );
        }
    }

    /// Move the drilldown selection left/right through the observation list.
    fn cycle_selection(&mut self, delta: isize) {
        let Slide::Signal(signal) = self.deck.current() else {
            return;
        };
        let n = self.run.dataset.observations_for(signal).len();
        if n == 0 {
            return;
        }
        let current = *self.selected.get(&signal).unwrap_or(&0) as isize;
        let next = (current + delta).rem_euclid(n as isize) as usize;
        self.selected.insert(signal, next);
    }

    /// Score the finished drag against the slide's best fit.
    fn finish_gesture(&mut self, signal: SignalKind, at: ScreenPoint) {
        let Some(geom) = self.geometry else {
            return;
        };
        let Some(slide) = self.run.slide(signal) else {
            return;
        };

        let outcome = self.exercises.entry(signal).or_default().finish(
            at,
            &slide.samples,
            slide.true_fit,
            |sx| geom.invert_x(sx),
            |sy| geom.invert_y(sy),
        );

        match outcome {
            None => {}
            Some(Ok(accuracy)) => {
                let message =
                    crate::report::format_feedback(accuracy, self.config.accuracy_threshold);
                self.feedback.insert(signal, message);
                self.status = format!("Scored your line: {:.1}%.", accuracy.normalized);
            }
            Some(Err(err)) => {
                self.status = format!("{err} Drag again with some horizontal extent.");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("scst", Style::default().fg(Color::Cyan)),
            Span::raw(" - Score and Stress"),
        ]));

        let slide = self.deck.current();
        lines.push(Line::from(Span::styled(
            format!(
                "slide {}/{}: {} | source: {} | students: {}",
                self.deck.index() + 1,
                self.deck.len(),
                slide.title(),
                self.run.dataset.source.label(),
                self.config.student_count,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match self.deck.current() {
            Slide::Signal(signal) => self.draw_signal_slide(frame, area, signal),
            slide => {
                // Prose-only slides; no chart to map gestures through.
                self.geometry = None;
                let p = Paragraph::new(slide.body())
                    .wrap(Wrap { trim: true })
                    .block(Block::default().title(slide.title()).borders(Borders::ALL));
                frame.render_widget(p, area);
            }
        }
    }

    fn draw_signal_slide(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect, signal: SignalKind) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let narrative = Paragraph::new(Slide::Signal(signal).body())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(narrative, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(rows[1]);

        self.draw_scatter(frame, columns[0], signal);
        self.draw_drilldown(frame, columns[1], signal);
        self.draw_feedback(frame, rows[2], signal);
    }

    fn draw_scatter(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect, signal: SignalKind) {
        let block = Block::default()
            .title(format!("{} vs weighted score", signal.axis_label()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(slide) = self.run.slide(signal) else {
            self.geometry = None;
            let msg = Paragraph::new("No data for this signal.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (x_bounds, y_bounds) = scatter_bounds(slide);
        let geom = ChartGeometry::new(inner, x_bounds, y_bounds);
        self.geometry = Some(geom);

        let points: Vec<(f64, f64)> = slide.samples.iter().map(|s| (s.x, s.y)).collect();

        let exercise = self.exercises.get(&signal).copied().unwrap_or_default();
        // The best fit stays hidden until the user has committed a drawing.
        let best_fit = exercise
            .is_drawn()
            .then(|| line_segment(slide.true_fit, x_bounds));
        let user_line = match exercise.state {
            DrawState::Idle => None,
            DrawState::Drawing { start, current } => Some([
                (geom.invert_x(start.x), geom.invert_y(start.y)),
                (geom.invert_x(current.x), geom.invert_y(current.y)),
            ]),
            DrawState::Drawn { user_line, .. } => Some(line_segment(user_line, x_bounds)),
        };

        let selected = {
            let observations = self.run.dataset.observations_for(signal);
            let index = *self.selected.get(&signal).unwrap_or(&0);
            observations.get(index).map(|o| (o.signal_avg, o.score))
        };

        let widget = ScatterChart {
            points: &points,
            selected,
            best_fit,
            user_line,
            x_bounds,
            y_bounds,
            x_label: signal.axis_label(),
            y_label: "score",
            fmt_x: fmt_axis,
            fmt_y: fmt_axis,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_drilldown(&self, frame: &mut ratatui::Frame<'_>, area: Rect, signal: SignalKind) {
        let block = Block::default().title("Session drilldown").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let observations = self.run.dataset.observations_for(signal);
        let index = *self.selected.get(&signal).unwrap_or(&0);
        let Some(observation) = observations.get(index) else {
            let msg = Paragraph::new("No observations.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let info = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(
                format!(
                    "{} - {}: avg {:.1}, score {:.1}",
                    observation.student_id(),
                    observation.exam.display_name(),
                    observation.signal_avg,
                    observation.score,
                ),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(Span::styled(
                format!("session {}/{} (use Left/Right)", index + 1, observations.len()),
                Style::default().fg(Color::Gray),
            )),
        ]));
        frame.render_widget(info, chunks[0]);

        let Some(series) =
            self.run
                .dataset
                .series_for(observation.student, observation.exam, signal)
        else {
            let msg = Paragraph::new("No raw series recorded for this session.")
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, chunks[1]);
            return;
        };

        let trace: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|p| (p.time_seconds, p.value))
            .collect();
        let Some((y_min, y_max)) = series.value_range() else {
            return;
        };
        let x_max = trace.last().map(|&(t, _)| t).unwrap_or(1.0).max(1.0);

        let in_test = in_test_window(series);
        let pad = ((y_max - y_min).abs() * 0.05).max(1e-9);

        let widget = SeriesChart {
            series: &trace,
            in_test,
            x_bounds: [0.0, x_max],
            y_bounds: [y_min - pad, y_max + pad],
            y_label: signal.axis_label(),
        };
        frame.render_widget(widget, chunks[1]);
    }

    fn draw_feedback(&self, frame: &mut ratatui::Frame<'_>, area: Rect, signal: SignalKind) {
        let exercise = self.exercises.get(&signal).copied().unwrap_or_default();
        let (text, style) = if let Some(message) = self.feedback.get(&signal) {
            (message.clone(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else if exercise.is_drawing() {
            (
                "Release the mouse button to score your line.".to_string(),
                Style::default().fg(Color::Yellow),
            )
        } else {
            (
                "Click and drag across the chart to draw your hypothesis line.".to_string(),
                Style::default().fg(Color::Gray),
            )
        };

        let p = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "scroll/↑↓ slides  drag draw line  x redraw  ←/→ session  r resample  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Padded chart bounds for one scatter slide.
fn scatter_bounds(slide: &SlideRun) -> ([f64; 2], [f64; 2]) {
    let stats = &slide.stats;
    let x_pad = ((stats.x_max - stats.x_min).abs() * 0.05).max(1e-9);
    let y_pad = ((stats.y_max - stats.y_min).abs() * 0.05).max(1e-9);
    (
        [stats.x_min - x_pad, stats.x_max + x_pad],
        [stats.y_min - y_pad, stats.y_max + y_pad],
    )
}

/// A line evaluated at the chart's x bounds.
fn line_segment(line: LineParams, x_bounds: [f64; 2]) -> [(f64, f64); 2] {
    [
        (x_bounds[0], line.y_at(x_bounds[0])),
        (x_bounds[1], line.y_at(x_bounds[1])),
    ]
}

/// First/last in-test timestamps, for the window markers.
fn in_test_window(series: &crate::data::SignalSeries) -> Option<(f64, f64)> {
    let mut start = None;
    let mut end = None;
    for p in &series.points {
        if p.period == TestPeriod::InTest {
            if start.is_none() {
                start = Some(p.time_seconds);
            }
            end = Some(p.time_seconds);
        }
    }
    Some((start?, end?))
}

fn fmt_axis(v: f64) -> String {
    format!("{v:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_roundtrips_plot_corners() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 60,
            height: 20,
        };
        let geom = ChartGeometry::new(rect, [50.0, 150.0], [0.0, 100.0]);

        // Left edge of the plot area maps to x_min, top edge to y_max.
        let left = geom.plot.x as f64;
        let top = geom.plot.y as f64;
        let right = (geom.plot.x + geom.plot.width - 1) as f64;
        let bottom = (geom.plot.y + geom.plot.height - 1) as f64;

        assert!((geom.invert_x(left) - 50.0).abs() < 1e-9);
        assert!((geom.invert_x(right) - 150.0).abs() < 1e-9);
        assert!((geom.invert_y(top) - 100.0).abs() < 1e-9);
        assert!((geom.invert_y(bottom) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn geometry_contains_excludes_label_areas() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 60,
            height: 20,
        };
        let geom = ChartGeometry::new(rect, [0.0, 1.0], [0.0, 1.0]);
        assert!(geom.contains(geom.plot.x, geom.plot.y));
        // The y-axis label column is outside the gesture area.
        assert!(!geom.contains(0, geom.plot.y));
        // Below the plot is the x-axis label area.
        assert!(!geom.contains(geom.plot.x, rect.height - 1));
    }
}
