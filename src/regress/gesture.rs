//! User-hypothesis line extraction.
//!
//! The TUI records a drag gesture as two screen-space points. The chart owns
//! the screen→data mapping, so it passes the inverse scale functions in; this
//! module stays free of any rendering knowledge.

use crate::domain::LineParams;
use crate::regress::DegenerateInput;

/// A point in screen space (terminal cells or pixels; units don't matter here,
/// only the inverse mappings do).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Convert a completed drag gesture into line parameters in data space.
///
/// `invert_x`/`invert_y` map screen coordinates back into data coordinates
/// (the inverse of the chart's active scales). A drag that is vertical in
/// data space has no defined slope and is rejected so the caller can ask for
/// a redraw instead of dividing by zero.
pub fn extract_user_line(
    p1: ScreenPoint,
    p2: ScreenPoint,
    invert_x: impl Fn(f64) -> f64,
    invert_y: impl Fn(f64) -> f64,
) -> Result<LineParams, DegenerateInput> {
    let x1 = invert_x(p1.x);
    let y1 = invert_y(p1.y);
    let x2 = invert_x(p2.x);
    let y2 = invert_y(p2.y);

    let dx = x2 - x1;
    if dx == 0.0 || !dx.is_finite() {
        return Err(DegenerateInput::VerticalGesture);
    }

    let slope = (y2 - y1) / dx;
    let intercept = y1 - slope * x1;

    Ok(LineParams::new(slope, intercept))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mapping_diagonal() {
        let line = extract_user_line(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(10.0, 10.0),
            |x| x,
            |y| y,
        )
        .unwrap();
        assert!((line.slope - 1.0).abs() < 1e-12);
        assert!(line.intercept.abs() < 1e-12);
    }

    #[test]
    fn inverse_mappings_are_applied() {
        // Screen y grows downward; a typical chart inverts and offsets it.
        let invert_x = |sx: f64| 60.0 + sx * 0.5;
        let invert_y = |sy: f64| 100.0 - sy;

        let line = extract_user_line(
            ScreenPoint::new(0.0, 40.0),
            ScreenPoint::new(20.0, 20.0),
            invert_x,
            invert_y,
        )
        .unwrap();

        // Data points: (60, 60) and (70, 80) -> slope 2, intercept -60.
        assert!((line.slope - 2.0).abs() < 1e-12);
        assert!((line.intercept + 60.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_drag_is_degenerate() {
        let err = extract_user_line(
            ScreenPoint::new(5.0, 0.0),
            ScreenPoint::new(5.0, 30.0),
            |x| x,
            |y| y,
        )
        .unwrap_err();
        assert_eq!(err, DegenerateInput::VerticalGesture);
    }

    #[test]
    fn vertical_after_inversion_is_degenerate() {
        // Distinct on screen, identical once snapped into data space.
        let err = extract_user_line(
            ScreenPoint::new(4.9, 0.0),
            ScreenPoint::new(5.1, 30.0),
            |x| x.round(),
            |y| y,
        )
        .unwrap_err();
        assert_eq!(err, DegenerateInput::VerticalGesture);
    }
}
