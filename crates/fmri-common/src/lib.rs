//! Shared utilities for the fMRI design crates.
//!
//! This crate provides common helpers used across the workspace: Polars
//! `AnyValue` conversions for reading event and confound tables, and the
//! numeric rounding/formatting conventions used when emitting designs.

pub mod numeric;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use numeric::{format_g, round_decimals};
pub use polars::{
    any_to_f64, any_to_i64, any_to_string, column_values, format_numeric, parse_f64, parse_i64,
};
