use thiserror::Error;

/// Shape violations detected while assembling a [`crate::RunDesign`].
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("duplicate condition '{name}' in run design")]
    DuplicateCondition { name: String },

    #[error(
        "condition '{name}' has {onsets} onsets, {durations} durations and {amplitudes} amplitudes"
    )]
    MisalignedCondition {
        name: String,
        onsets: usize,
        durations: usize,
        amplitudes: usize,
    },

    #[error("{names} regressor names but {series} regressor series")]
    RegressorCountMismatch { names: usize, series: usize },

    #[error("regressor '{name}' has {actual} timepoints, expected {expected}")]
    RegressorLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
