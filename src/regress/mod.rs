//! Regression & accuracy scoring core.
//!
//! Everything in this module is a pure function over in-memory samples:
//!
//! - `ols::fit` — closed-form ordinary least squares over a sample set
//! - `gesture::extract_user_line` — two-point line from a drag gesture,
//!   mapped from screen space into data space
//! - `score::score` — normalized accuracy of a user line vs. the true fit
//!
//! No I/O, no rendering, no shared state; safe to call from anywhere.

pub mod gesture;
pub mod ols;
pub mod score;

pub use gesture::*;
pub use ols::*;
pub use score::*;

/// Degenerate regression input.
///
/// All three core operations can hit a division by zero on pathological
/// inputs. Rather than letting IEEE semantics hand the caller a NaN to
/// format, each site surfaces this error and lets the caller decide
/// (typically: prompt the user to redraw, or skip the feedback message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateInput {
    /// Fewer than two samples; no line is identifiable.
    TooFewSamples,
    /// All x values identical; the OLS slope is undefined.
    ZeroXVariance,
    /// The gesture maps to a vertical line in data space.
    VerticalGesture,
    /// All y values identical; the accuracy normalizer is undefined.
    ZeroScoreVariance,
}

impl std::fmt::Display for DegenerateInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            DegenerateInput::TooFewSamples => "Need at least 2 samples to fit a line.",
            DegenerateInput::ZeroXVariance => {
                "All x values are identical; the best-fit slope is undefined."
            }
            DegenerateInput::VerticalGesture => {
                "The drawn line is vertical in data space; its slope is undefined."
            }
            DegenerateInput::ZeroScoreVariance => {
                "All scores are identical; accuracy cannot be normalized."
            }
        };
        write!(f, "{msg}")
    }
}

impl std::error::Error for DegenerateInput {}
