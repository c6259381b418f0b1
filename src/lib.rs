//! `score-stress` library crate.
//!
//! The binary (`scst`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI/notebook front-ends)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod deck;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod regress;
pub mod report;
pub mod tui;
