//! Fixed column names and condition labels shared by the design builders.

/// Raw label of the CS- trials that are split when they repeat within a run.
pub const CS_MINUS_FIRST_HALF: &str = "CS-_first_half";

/// Condition holding the first `CS-_first_half` trial of a run.
pub const CS_MINUS_FIRST_HALF_FIRST: &str = "CS-_first_half_first";

/// Condition holding every later `CS-_first_half` trial of a run.
pub const CS_MINUS_FIRST_HALF_OTHERS: &str = "CS-_first_half_others";

/// LSS condition holding the isolated trial.
pub const LSS_TRIAL: &str = "trial";

/// LSS condition holding every other trial of the run.
pub const LSS_OTHERS: &str = "others";

/// Condition label columns, in lookup priority order.
pub const CONDITION_COLUMN_CANDIDATES: &[&str] = &[
    "trial_type",
    "condition",
    "event_type",
    "type",
    "stimulus",
    "trial",
];

pub const ONSET_COLUMN: &str = "onset";
pub const DURATION_COLUMN: &str = "duration";
pub const TRIAL_ID_COLUMN: &str = "trial_ID";

/// Per-event amplitude columns, in lookup priority order.
pub const AMPLITUDE_COLUMNS: &[&str] = &["amplitudes", "amplitude"];

/// The six rigid-body motion parameters (`{trans,rot}_{x,y,z}`).
pub fn default_motion_columns() -> Vec<String> {
    ["trans", "rot"]
        .iter()
        .flat_map(|kind| ["x", "y", "z"].iter().map(move |axis| format!("{kind}_{axis}")))
        .collect()
}
