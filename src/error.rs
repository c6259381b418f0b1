//! Application-level error type.
//!
//! Every fallible path in the app funnels into [`AppError`], which carries the
//! process exit code alongside a user-facing message. Exit codes:
//!
//! - 2: bad input/config (missing dataset, malformed CSV, bad CLI values)
//! - 3: dataset unusable for the requested analysis
//! - 4: internal/terminal failures (draw errors, serialization, etc.)

use crate::regress::DegenerateInput;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Degenerate regression inputs are a data problem, not an internal bug.
impl From<DegenerateInput> for AppError {
    fn from(err: DegenerateInput) -> Self {
        AppError::new(3, err.to_string())
    }
}
