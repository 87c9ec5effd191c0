//! First-level run design construction.
//!
//! Turns a run's events table and confounds table into the design record a
//! GLM engine consumes, plus the motion parameter file written alongside it.
//!
//! - [`conditions`]: condition column resolution and the condition set,
//!   including the split of repeated `CS-_first_half` trials
//! - [`standard`]: one regressor per condition
//! - [`lss`]: one design per isolated trial
//! - [`regressors`]: nuisance regressor selection and the motion file
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use fmri_design::{EventsTable, RegressorsTable, build_run_design};
//! use fmri_model::DesignOptions;
//!
//! let events = EventsTable::load(Path::new("events.csv"), None)?;
//! let confounds = RegressorsTable::load(Path::new("confounds.tsv"), None)?;
//! let built = build_run_design("bold.nii.gz", &events, &confounds, &DesignOptions::default())?;
//! println!("{:?}", built.design.conditions());
//! ```

pub mod conditions;
pub mod error;
pub mod events;
pub mod lss;
pub mod regressors;
pub mod standard;

// === Error Types ===
pub use error::{DesignError, Result};

// === Tables ===
pub use events::{EventRecord, EventsTable};
pub use regressors::{
    RegressorSelection, RegressorsTable, select_motion, select_regressors, write_motion_file,
};

// === Conditions ===
pub use conditions::{
    ColumnSource, ConditionColumn, ConditionSet, resolve_condition_column,
    select_condition_column,
};

// === Builders ===
pub use lss::{build_lss_design, build_lss_designs, partition_trial, trial_ids};
pub use standard::build_run_design;
