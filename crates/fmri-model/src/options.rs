//! Configuration options for run design construction.

use std::ffi::OsStr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::labels::default_motion_columns;

/// Decimal places kept for onsets, durations and amplitudes.
pub const DEFAULT_DECIMALS: u32 = 3;

/// Amplitude assigned to events without an explicit amplitude.
pub const DEFAULT_AMPLITUDE: f64 = 1.0;

/// File name of the motion parameter file when none is configured.
pub const DEFAULT_MOTION_FILE: &str = "motion.par";

/// Options controlling how a run design is built.
///
/// Every builder call receives one of these explicitly; there is no
/// process-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignOptions {
    /// Motion parameter columns written to the motion file and excluded
    /// from the default nuisance regressor set.
    pub motion_columns: Vec<String>,

    /// Explicit nuisance regressor names.
    ///
    /// `None` selects every non-motion column of the regressors table.
    /// Names absent from the table are dropped.
    pub regressor_names: Option<Vec<String>>,

    /// Decimal places for onsets, durations and amplitudes.
    pub decimals: u32,

    /// Amplitude used when the events table carries none.
    pub amplitude: f64,

    /// Where the motion parameter file is written.
    pub motion_file: PathBuf,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            motion_columns: default_motion_columns(),
            regressor_names: None,
            decimals: DEFAULT_DECIMALS,
            amplitude: DEFAULT_AMPLITUDE,
            motion_file: PathBuf::from(DEFAULT_MOTION_FILE),
        }
    }
}

impl DesignOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_motion_columns(mut self, columns: Vec<String>) -> Self {
        self.motion_columns = columns;
        self
    }

    #[must_use]
    pub fn with_regressor_names(mut self, names: Option<Vec<String>>) -> Self {
        self.regressor_names = names;
        self
    }

    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    #[must_use]
    pub fn with_motion_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.motion_file = path.into();
        self
    }

    /// Motion file path for one trial of an LSS sweep.
    ///
    /// `motion.par` becomes `motion_trial-7.par` in the same directory.
    pub fn motion_file_for_trial(&self, trial_id: i64) -> PathBuf {
        let stem = self
            .motion_file
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("motion");
        let name = match self.motion_file.extension().and_then(OsStr::to_str) {
            Some(ext) => format!("{stem}_trial-{trial_id}.{ext}"),
            None => format!("{stem}_trial-{trial_id}"),
        };
        self.motion_file.with_file_name(name)
    }
}
