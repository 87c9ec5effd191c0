//! Standard (one regressor per condition) run design construction.

use std::path::Path;

use tracing::info;

use fmri_common::round_decimals;
use fmri_model::{BuiltDesign, ConditionEvents, DesignOptions, RunDesign};

use crate::conditions::ConditionSet;
use crate::error::Result;
use crate::events::EventsTable;
use crate::regressors::{RegressorsTable, select_motion, select_regressors, write_motion_file};

/// Where event amplitudes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Amplitudes {
    /// The events table's amplitude column, falling back to the configured
    /// constant for missing cells.
    FromEvents,
    /// The configured constant for every event, unrounded.
    Constant,
}

/// Gathers the rounded events of `rows` into one condition.
///
/// Onsets and durations are rounded to `options.decimals`; amplitudes only
/// when read from the events table.
pub(crate) fn collect_condition(
    name: &str,
    events: &EventsTable,
    rows: &[usize],
    amplitudes: Amplitudes,
    options: &DesignOptions,
) -> ConditionEvents {
    let mut condition = ConditionEvents::new(name);
    for record in rows.iter().filter_map(|row| events.records().get(*row)) {
        let amplitude = match amplitudes {
            Amplitudes::FromEvents => round_decimals(
                record.amplitude.unwrap_or(options.amplitude),
                options.decimals,
            ),
            Amplitudes::Constant => options.amplitude,
        };
        condition
            .onsets
            .push(round_decimals(record.onset, options.decimals));
        condition
            .durations
            .push(round_decimals(record.duration, options.decimals));
        condition.amplitudes.push(amplitude);
    }
    condition
}

/// Attaches regressors, validates the record and writes the motion file.
///
/// The motion file is only written once everything else has succeeded.
pub(crate) fn assemble(
    scans: &str,
    conditions: Vec<ConditionEvents>,
    regressors: &RegressorsTable,
    motion_file: &Path,
    options: &DesignOptions,
) -> Result<BuiltDesign> {
    let motion = select_motion(regressors, &options.motion_columns)?;
    let selection = select_regressors(
        regressors,
        &options.motion_columns,
        options.regressor_names.as_deref(),
    );
    let design = RunDesign::new(scans, conditions, selection.names, selection.values)?;
    let motion_file = write_motion_file(motion_file, &motion)?;
    Ok(BuiltDesign {
        design,
        motion_file,
    })
}

/// Builds the standard design of one run.
///
/// Conditions follow [`ConditionSet::derive`], including the split of
/// repeated `CS-_first_half` trials. Conditions whose row subset is empty
/// are kept with empty lists.
pub fn build_run_design(
    scans: &str,
    events: &EventsTable,
    regressors: &RegressorsTable,
    options: &DesignOptions,
) -> Result<BuiltDesign> {
    let labels = events.labels();
    let set = ConditionSet::derive(&labels)?;

    let conditions: Vec<ConditionEvents> = set
        .conditions()
        .iter()
        .map(|name| {
            let rows = set.rows_for(name, &labels);
            collect_condition(name, events, &rows, Amplitudes::FromEvents, options)
        })
        .collect();

    let built = assemble(scans, conditions, regressors, &options.motion_file, options)?;
    info!(
        scans,
        conditions = built.design.conditions().len(),
        events = built.design.event_count(),
        regressors = built.design.regressor_names().len(),
        motion_file = %built.motion_file.display(),
        "built run design"
    );
    Ok(built)
}
