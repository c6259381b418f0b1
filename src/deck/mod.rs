//! Slide deck and drawing-exercise state.
//!
//! The presentation is a fixed sequence of slides navigated by scroll wheel
//! (or keys). Slide index and scroll debouncing live in an explicit [`Deck`]
//! value owned by the event loop, not in globals; the debounce window takes
//! the current instant as a parameter so transitions are testable.
//!
//! Each scatter slide owns an [`Exercise`]: the Idle -> Drawing -> Drawn
//! machine behind the draw-your-own-line interaction.

use std::time::{Duration, Instant};

use crate::domain::{AccuracyScore, LineParams, Sample, SignalKind};
use crate::regress::{self, DegenerateInput, ScreenPoint};

/// One slide of the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Title,
    Intro,
    Signal(SignalKind),
    Conclusion,
}

impl Slide {
    /// The fixed slide order of the presentation.
    pub const ALL: [Slide; 7] = [
        Slide::Title,
        Slide::Intro,
        Slide::Signal(SignalKind::Hr),
        Slide::Signal(SignalKind::Eda),
        Slide::Signal(SignalKind::Temp),
        Slide::Signal(SignalKind::Acc),
        Slide::Conclusion,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Slide::Title => "Score and Stress",
            Slide::Intro => "Introduction",
            Slide::Signal(signal) => signal.display_name(),
            Slide::Conclusion => "Conclusion",
        }
    }

    /// Narrative copy for the slide.
    pub fn body(self) -> &'static str {
        match self {
            Slide::Title => {
                "How is stress related to score? How does stress change during the test?\n\n\
                 Scroll down to begin."
            }
            Slide::Intro => {
                "Stress plays a significant role in academic performance, but to what \
                 extent does it actually affect exam outcomes? Some theories suggest \
                 moderate stress helps students focus; others argue excessive stress \
                 impairs concentration and lowers scores.\n\n\
                 We examine the relationship between stress and exam performance through \
                 four physiological signals recorded during exams: heart rate (HR), \
                 electrodermal activity (EDA), skin temperature, and accelerometer (ACC) \
                 data, correlated against students' weighted test scores."
            }
            Slide::Signal(SignalKind::Hr) => {
                "Heart rate is measured in beats per minute (BPM). A typical resting \
                 heart rate is 60-100 BPM; values above 100 BPM may indicate stress.\n\n\
                 What do you think the relationship is between heart rate and academic \
                 performance? Drag a line across the scatter plot to test your \
                 hypothesis: x is the average heart rate during the test, y is the \
                 weighted test score."
            }
            Slide::Signal(SignalKind::Eda) => {
                "EDA measures skin conductance, which rises with emotional or \
                 sympathetic arousal: stress, anxiety, or perceived danger all push it \
                 up.\n\n\
                 As with heart rate, drag a line across the plot to explore how EDA \
                 levels might correlate with academic performance."
            }
            Slide::Signal(SignalKind::Temp) => {
                "Skin temperature (degrees Celsius) also responds to stress. A common \
                 pattern is a rise at the beginning of the exam, sometimes with a \
                 decline towards the end; select a point to see one student's session.\n\n\
                 Draw your hypothesis line to see how temperature relates to scores."
            }
            Slide::Signal(SignalKind::Acc) => {
                "The accelerometer reports acceleration along x, y and z; we use the \
                 magnitude across all three axes, in units of 1/64 g (0.153 m/s^2).\n\n\
                 Draw your hypothesis line to see how movement relates to scores."
            }
            Slide::Conclusion => {
                "Based on this dataset we find a positive correlation between heart \
                 rate and academic performance: students with a higher average heart \
                 rate during the test tend to score higher. The other signals show \
                 weaker relationships; their best-fit slopes are close to flat.\n\n\
                 Moderate stress, it seems, is not the enemy."
            }
        }
    }
}

/// Scroll direction as seen by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Down,
    Up,
}

/// Slide index plus scroll debounce state.
pub struct Deck {
    current: usize,
    debounce: Duration,
    last_change: Option<Instant>,
}

impl Deck {
    pub fn new(debounce: Duration) -> Self {
        Self {
            current: 0,
            debounce,
            last_change: None,
        }
    }

    pub fn current(&self) -> Slide {
        Slide::ALL[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        Slide::ALL.len()
    }

    /// Handle a scroll event; returns whether the slide changed.
    ///
    /// Rapid repeated events inside the debounce window are dropped so one
    /// physical scroll moves one slide.
    pub fn scroll(&mut self, direction: Scroll, now: Instant) -> bool {
        if let Some(last) = self.last_change {
            if now.duration_since(last) < self.debounce {
                return false;
            }
        }

        let next = match direction {
            Scroll::Down if self.current + 1 < Slide::ALL.len() => self.current + 1,
            Scroll::Up if self.current > 0 => self.current - 1,
            _ => return false,
        };

        self.current = next;
        self.last_change = Some(now);
        true
    }

    /// Jump directly to a slide (keyboard navigation ignores the debounce).
    pub fn jump(&mut self, index: usize) {
        self.current = index.min(Slide::ALL.len() - 1);
    }
}

/// The line-drawing interaction on one scatter slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawState {
    Idle,
    Drawing {
        start: ScreenPoint,
        current: ScreenPoint,
    },
    Drawn {
        user_line: LineParams,
        accuracy: AccuracyScore,
    },
}

/// Owns the draw state machine for one slide.
#[derive(Debug, Clone, Copy)]
pub struct Exercise {
    pub state: DrawState,
}

impl Exercise {
    pub fn new() -> Self {
        Self {
            state: DrawState::Idle,
        }
    }

    /// Gesture start. Ignored unless idle (a completed drawing stays until
    /// explicitly reset).
    pub fn begin(&mut self, at: ScreenPoint) {
        if let DrawState::Idle = self.state {
            self.state = DrawState::Drawing {
                start: at,
                current: at,
            };
        }
    }

    /// Gesture motion while the button is held.
    pub fn update(&mut self, at: ScreenPoint) {
        if let DrawState::Drawing { start, .. } = self.state {
            self.state = DrawState::Drawing {
                start,
                current: at,
            };
        }
    }

    /// Gesture end: extract the user line and score it against the true fit.
    ///
    /// Returns `None` when no gesture is in flight. On a degenerate gesture
    /// (vertical in data space) the state returns to idle and the error is
    /// surfaced so the UI can prompt for a redraw.
    pub fn finish(
        &mut self,
        at: ScreenPoint,
        samples: &[Sample],
        true_fit: LineParams,
        invert_x: impl Fn(f64) -> f64,
        invert_y: impl Fn(f64) -> f64,
    ) -> Option<Result<AccuracyScore, DegenerateInput>> {
        let DrawState::Drawing { start, .. } = self.state else {
            return None;
        };

        let result = regress::extract_user_line(start, at, invert_x, invert_y)
            .and_then(|user_line| {
                regress::score(samples, true_fit, user_line).map(|accuracy| (user_line, accuracy))
            });

        Some(match result {
            Ok((user_line, accuracy)) => {
                self.state = DrawState::Drawn {
                    user_line,
                    accuracy,
                };
                Ok(accuracy)
            }
            Err(err) => {
                self.state = DrawState::Idle;
                Err(err)
            }
        })
    }

    /// Discard a completed (or in-flight) drawing and allow a redraw.
    pub fn reset(&mut self) {
        self.state = DrawState::Idle;
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    pub fn is_drawn(&self) -> bool {
        matches!(self.state, DrawState::Drawn { .. })
    }
}

impl Default for Exercise {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(1.0, 3.0),
            Sample::new(2.0, 5.0),
            Sample::new(3.0, 7.0),
        ]
    }

    #[test]
    fn deck_debounces_rapid_scrolls() {
        let mut deck = Deck::new(Duration::from_millis(500));
        let t0 = Instant::now();
        assert!(deck.scroll(Scroll::Down, t0));
        // Inside the window: dropped.
        assert!(!deck.scroll(Scroll::Down, t0 + Duration::from_millis(100)));
        assert_eq!(deck.index(), 1);
        // Past the window: accepted.
        assert!(deck.scroll(Scroll::Down, t0 + Duration::from_millis(600)));
        assert_eq!(deck.index(), 2);
    }

    #[test]
    fn deck_clamps_at_both_ends() {
        let mut deck = Deck::new(Duration::ZERO);
        let t = Instant::now();
        assert!(!deck.scroll(Scroll::Up, t));
        deck.jump(Slide::ALL.len() + 5);
        assert_eq!(deck.index(), Slide::ALL.len() - 1);
        assert!(!deck.scroll(Scroll::Down, t));
    }

    #[test]
    fn exercise_happy_path() {
        let data = samples();
        let true_fit = crate::regress::fit(&data).unwrap();

        let mut ex = Exercise::new();
        assert!(!ex.is_drawing());
        ex.begin(ScreenPoint::new(0.0, 3.0));
        ex.update(ScreenPoint::new(1.0, 4.0));
        assert!(ex.is_drawing());

        // Identity scales; drag along the true line itself.
        let acc = ex
            .finish(ScreenPoint::new(3.0, 9.0), &data, true_fit, |x| x, |y| y)
            .unwrap()
            .unwrap();
        assert_eq!(acc.normalized, 100.0);
        assert!(ex.is_drawn());

        // A second gesture is ignored until reset.
        ex.begin(ScreenPoint::new(0.0, 0.0));
        assert!(ex.is_drawn());
        ex.reset();
        ex.begin(ScreenPoint::new(0.0, 0.0));
        assert!(ex.is_drawing());
    }

    #[test]
    fn vertical_gesture_resets_to_idle() {
        let data = samples();
        let true_fit = crate::regress::fit(&data).unwrap();

        let mut ex = Exercise::new();
        ex.begin(ScreenPoint::new(2.0, 0.0));
        let err = ex
            .finish(ScreenPoint::new(2.0, 9.0), &data, true_fit, |x| x, |y| y)
            .unwrap()
            .unwrap_err();
        assert_eq!(err, DegenerateInput::VerticalGesture);
        assert_eq!(ex.state, DrawState::Idle);
    }
}
