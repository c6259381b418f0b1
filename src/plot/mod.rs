//! Terminal plotting helpers for the non-interactive commands.

pub mod ascii;

pub use ascii::*;
