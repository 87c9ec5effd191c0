//! Error types for run design construction.

use std::path::PathBuf;

use thiserror::Error;

use fmri_ingest::IngestError;
use fmri_model::ModelError;

/// Errors raised while turning events and confounds into a run design.
///
/// Every variant stops the current (subject, run) unit; no partial design is
/// returned.
#[derive(Debug, Error)]
pub enum DesignError {
    // === Schema Errors ===
    /// No column of the events table can hold condition labels.
    #[error("could not find condition column in events file; available columns: {}", .available.join(", "))]
    ConditionColumnNotFound { available: Vec<String> },

    /// A required column is absent.
    #[error("required column '{column}' not found; available columns: {}", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A required cell is missing or not a finite number.
    #[error("invalid or missing value in column '{column}' at row {row}")]
    InvalidValue { column: String, row: usize },

    /// A raw label collides with a condition name derived by the CS- split.
    #[error("raw condition label '{label}' collides with a derived condition name")]
    ReservedLabel { label: String },

    // === Lookup Errors ===
    #[error("trial ID {trial_id} not found in events file")]
    TrialNotFound { trial_id: i64 },

    #[error("trial ID {trial_id} is not unique in events file ({count} rows)")]
    TrialNotUnique { trial_id: i64, count: usize },

    // === Availability Errors ===
    /// Motion columns needed for the motion file are absent.
    #[error("motion columns missing from regressors table: {}; available columns: {}", .missing.join(", "), .available.join(", "))]
    MissingMotionColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// The motion file needs at least one parameter column.
    #[error("no motion columns configured")]
    NoMotionColumns,

    /// Regressor columns differ in length.
    #[error("regressor column '{column}' has {actual} rows, expected {expected}")]
    RaggedRegressors {
        column: String,
        expected: usize,
        actual: usize,
    },

    // === Output Errors ===
    #[error("failed to write motion file {path}: {source}")]
    MotionWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // === Upstream Errors ===
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for DesignError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl DesignError {
    pub(crate) fn motion_write(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        Self::MotionWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result type for design operations.
pub type Result<T> = std::result::Result<T, DesignError>;
