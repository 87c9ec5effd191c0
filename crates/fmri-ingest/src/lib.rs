//! Events and confounds table loading.
//!
//! Behavioral events files and fMRIPrep confound files arrive as either
//! tab- or comma-separated text. This crate sniffs the separator from a
//! bounded prefix of the file and loads the table into a Polars DataFrame.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use fmri_ingest::{Separator, read_table, read_table_with_separator};
//!
//! // Separator detected from the first 1024 characters
//! let events = read_table(Path::new("task-phase2_events.csv"))?;
//!
//! // Explicit override when the format is known
//! let confounds = read_table_with_separator(Path::new("confounds.tsv"), Separator::Tab)?;
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === Table Reading ===
pub use csv::{
    DEFAULT_SAMPLE_SIZE, NULL_TOKENS, Separator, detect_separator, detect_separator_with_sample,
    normalize_header, read_table, read_table_with_separator, sniff_separator,
};
