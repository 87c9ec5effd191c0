//! Least-squares-separate (LSS) design construction.
//!
//! An LSS design isolates a single trial: the target trial is the `trial`
//! condition and every other row of the run, whatever its label, is
//! `others`. Fitting one such model per trial yields per-trial estimates.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info};

use fmri_model::labels::{LSS_OTHERS, LSS_TRIAL, TRIAL_ID_COLUMN};
use fmri_model::{BuiltDesign, DesignOptions};

use crate::error::{DesignError, Result};
use crate::events::EventsTable;
use crate::regressors::RegressorsTable;
use crate::standard::{Amplitudes, assemble, collect_condition};

/// Splits the rows of a run into the target trial and everything else.
///
/// Returns `(trial_rows, other_rows)`, which together cover every row once.
/// Rows without a trial ID always land in `others`.
pub fn partition_trial(events: &EventsTable, trial_id: i64) -> Result<(Vec<usize>, Vec<usize>)> {
    require_trial_ids(events)?;
    let (trial, others): (Vec<usize>, Vec<usize>) = (0..events.len())
        .partition(|row| events.records()[*row].trial_id == Some(trial_id));
    match trial.len() {
        0 => Err(DesignError::TrialNotFound { trial_id }),
        1 => Ok((trial, others)),
        count => Err(DesignError::TrialNotUnique { trial_id, count }),
    }
}

/// Distinct trial IDs of a run in table order.
pub fn trial_ids(events: &EventsTable) -> Result<Vec<i64>> {
    require_trial_ids(events)?;
    let mut seen = BTreeSet::new();
    Ok(events
        .records()
        .iter()
        .filter_map(|record| record.trial_id)
        .filter(|id| seen.insert(*id))
        .collect())
}

fn require_trial_ids(events: &EventsTable) -> Result<()> {
    if events.has_trial_ids() {
        Ok(())
    } else {
        Err(DesignError::MissingColumn {
            column: TRIAL_ID_COLUMN.to_string(),
            available: events.columns().to_vec(),
        })
    }
}

/// Builds the LSS design isolating `trial_id`.
///
/// Amplitudes are always the configured constant. The motion file goes to
/// `options.motion_file`.
pub fn build_lss_design(
    scans: &str,
    events: &EventsTable,
    regressors: &RegressorsTable,
    trial_id: i64,
    options: &DesignOptions,
) -> Result<BuiltDesign> {
    build_for_trial(scans, events, regressors, trial_id, options, &options.motion_file)
}

/// Builds one LSS design per distinct trial ID, in table order.
///
/// Each design gets its own motion file named after the trial (see
/// [`DesignOptions::motion_file_for_trial`]). Stops at the first failure.
pub fn build_lss_designs(
    scans: &str,
    events: &EventsTable,
    regressors: &RegressorsTable,
    options: &DesignOptions,
) -> Result<Vec<(i64, BuiltDesign)>> {
    let ids = trial_ids(events)?;
    debug!(trials = ids.len(), "building LSS designs for every trial");
    ids.into_iter()
        .map(|trial_id| {
            let motion_file = options.motion_file_for_trial(trial_id);
            build_for_trial(scans, events, regressors, trial_id, options, &motion_file)
                .map(|built| (trial_id, built))
        })
        .collect()
}

fn build_for_trial(
    scans: &str,
    events: &EventsTable,
    regressors: &RegressorsTable,
    trial_id: i64,
    options: &DesignOptions,
    motion_file: &Path,
) -> Result<BuiltDesign> {
    let (trial_rows, other_rows) = partition_trial(events, trial_id)?;
    let conditions = vec![
        collect_condition(LSS_TRIAL, events, &trial_rows, Amplitudes::Constant, options),
        collect_condition(LSS_OTHERS, events, &other_rows, Amplitudes::Constant, options),
    ];

    let built = assemble(scans, conditions, regressors, motion_file, options)?;
    info!(
        scans,
        trial_id,
        others = other_rows.len(),
        motion_file = %built.motion_file.display(),
        "built LSS design"
    );
    Ok(built)
}
