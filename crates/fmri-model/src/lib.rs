pub mod design;
pub mod error;
pub mod inputs;
pub mod labels;
pub mod options;

pub use design::{BuiltDesign, ConditionEvents, RunDesign};
pub use error::{ModelError, Result};
pub use inputs::{RunInputs, repetition_time_from_sidecar};
pub use labels::default_motion_columns;
pub use options::{DEFAULT_AMPLITUDE, DEFAULT_DECIMALS, DEFAULT_MOTION_FILE, DesignOptions};
