//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - signal/exam enums used for configuration and labeling
//! - normalized observation points (`Observation`, `Sample`)
//! - regression outputs (`LineParams`, `AccuracyScore`)

pub mod types;

pub use types::*;
