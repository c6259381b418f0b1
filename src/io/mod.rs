//! Output helpers.
//!
//! - per-observation result exports (CSV) (`export`)
//! - fit JSON read/write (`fit_file`)

pub mod export;
pub mod fit_file;

pub use export::*;
pub use fit_file::*;
