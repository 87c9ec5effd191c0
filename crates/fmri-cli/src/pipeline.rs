//! Run-level orchestration: resolve inputs, load tables, build designs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, info_span};

use fmri_design::{
    ConditionColumn, ConditionSet, EventsTable, RegressorsTable, build_lss_design,
    build_lss_designs, build_run_design,
};
use fmri_ingest::Separator;
use fmri_model::{BuiltDesign, DesignOptions, RunDesign, RunInputs};

/// Where run inputs come from.
#[derive(Debug, Clone, Default)]
pub struct InputSources {
    /// JSON bundle with every path.
    pub bundle: Option<PathBuf>,
    pub scan: Option<PathBuf>,
    pub events: Option<PathBuf>,
    pub regressors: Option<PathBuf>,
    /// BIDS JSON sidecar for the repetition time.
    pub sidecar: Option<PathBuf>,
}

/// Which LSS designs to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LssTarget {
    Trial(i64),
    All,
}

/// One built design and the trial it isolates, if any.
#[derive(Debug, Clone)]
pub struct DesignEntry {
    pub trial_id: Option<i64>,
    pub built: BuiltDesign,
}

/// Result of building the designs of one run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub inputs: RunInputs,
    pub entries: Vec<DesignEntry>,
}

/// Condition column and condition names of an events file.
#[derive(Debug, Clone)]
pub struct ConditionsReport {
    pub events: PathBuf,
    pub column: ConditionColumn,
    /// Final condition names with the number of trials each selects.
    pub conditions: Vec<(String, usize)>,
    pub split: bool,
}

#[derive(Serialize)]
struct DesignDocument<'a> {
    #[serde(rename = "trial_ID", skip_serializing_if = "Option::is_none")]
    trial_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repetition_time: Option<f64>,
    motion_file: &'a Path,
    design: &'a RunDesign,
}

/// Resolves the run inputs from a bundle file or individual paths.
pub fn resolve_inputs(sources: &InputSources) -> Result<RunInputs> {
    let inputs = match &sources.bundle {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read inputs {}", path.display()))?;
            serde_json::from_str::<RunInputs>(&text)
                .with_context(|| format!("parse inputs {}", path.display()))?
        }
        None => RunInputs {
            bold: required(sources.scan.as_deref(), "--scan")?,
            mask: None,
            events: required(sources.events.as_deref(), "--events")?,
            regressors: required(sources.regressors.as_deref(), "--regressors")?,
            repetition_time: None,
            trial_id: None,
        },
    };

    match &sources.sidecar {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read sidecar {}", path.display()))?;
            let sidecar: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parse sidecar {}", path.display()))?;
            Ok(inputs.with_sidecar(&sidecar))
        }
        None => Ok(inputs),
    }
}

fn required(value: Option<&Path>, flag: &str) -> Result<PathBuf> {
    value
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("{flag} is required without --inputs"))
}

fn load_tables(
    inputs: &RunInputs,
    separator: Option<Separator>,
) -> Result<(EventsTable, RegressorsTable)> {
    let events = EventsTable::load(&inputs.events, separator)
        .with_context(|| format!("load events {}", inputs.events.display()))?;
    let regressors = RegressorsTable::load(&inputs.regressors, separator)
        .with_context(|| format!("load regressors {}", inputs.regressors.display()))?;
    Ok((events, regressors))
}

fn scans(inputs: &RunInputs) -> String {
    inputs.bold.display().to_string()
}

/// Builds the standard design of a run.
pub fn run_standard(
    inputs: RunInputs,
    separator: Option<Separator>,
    options: &DesignOptions,
) -> Result<RunResult> {
    let span = info_span!("run", scans = %inputs.bold.display());
    let _guard = span.enter();

    let (events, regressors) = load_tables(&inputs, separator)?;
    let built = build_run_design(&scans(&inputs), &events, &regressors, options)
        .context("build run design")?;
    Ok(RunResult {
        inputs,
        entries: vec![DesignEntry {
            trial_id: None,
            built,
        }],
    })
}

/// Picks the LSS target from the command line and the inputs bundle.
///
/// An explicit `--trial-id` wins over `--all`, which wins over the bundle's
/// `trial_ID`.
pub fn resolve_lss_target(trial_id: Option<i64>, all: bool, inputs: &RunInputs) -> Result<LssTarget> {
    match (trial_id, all, inputs.trial_id) {
        (Some(id), _, _) => Ok(LssTarget::Trial(id)),
        (None, true, _) => Ok(LssTarget::All),
        (None, false, Some(id)) => Ok(LssTarget::Trial(id)),
        (None, false, None) => Err(anyhow!(
            "no trial selected; pass --trial-id, --all, or an inputs bundle with trial_ID"
        )),
    }
}

/// Builds LSS designs of a run.
pub fn run_lss(
    inputs: RunInputs,
    separator: Option<Separator>,
    options: &DesignOptions,
    target: LssTarget,
) -> Result<RunResult> {
    let span = info_span!("run", scans = %inputs.bold.display());
    let _guard = span.enter();

    let (events, regressors) = load_tables(&inputs, separator)?;
    let scans = scans(&inputs);
    let entries = match target {
        LssTarget::Trial(trial_id) => {
            let built = build_lss_design(&scans, &events, &regressors, trial_id, options)
                .with_context(|| format!("build LSS design for trial {trial_id}"))?;
            vec![DesignEntry {
                trial_id: Some(trial_id),
                built,
            }]
        }
        LssTarget::All => build_lss_designs(&scans, &events, &regressors, options)
            .context("build LSS designs")?
            .into_iter()
            .map(|(trial_id, built)| DesignEntry {
                trial_id: Some(trial_id),
                built,
            })
            .collect(),
    };
    info!(designs = entries.len(), "LSS designs built");
    Ok(RunResult { inputs, entries })
}

/// Reports the condition column and final conditions of an events file.
pub fn inspect_conditions(path: &Path, separator: Option<Separator>) -> Result<ConditionsReport> {
    let events = EventsTable::load(path, separator)
        .with_context(|| format!("load events {}", path.display()))?;
    let labels = events.labels();
    let set = ConditionSet::derive(&labels).context("derive conditions")?;
    let conditions = set
        .conditions()
        .iter()
        .map(|name| (name.clone(), set.rows_for(name, &labels).len()))
        .collect();
    Ok(ConditionsReport {
        events: path.to_path_buf(),
        column: events.condition_column().clone(),
        conditions,
        split: set.is_split(),
    })
}

/// Serializes the designs of a run as pretty JSON.
///
/// A single design is written as one object, several as an array.
pub fn render_json(result: &RunResult) -> Result<String> {
    let documents: Vec<DesignDocument<'_>> = result
        .entries
        .iter()
        .map(|entry| DesignDocument {
            trial_id: entry.trial_id,
            repetition_time: result.inputs.repetition_time,
            motion_file: &entry.built.motion_file,
            design: &entry.built.design,
        })
        .collect();
    let text = match documents.as_slice() {
        [single] => serde_json::to_string_pretty(single),
        many => serde_json::to_string_pretty(many),
    }
    .context("serialize design")?;
    Ok(text)
}

/// Writes the rendered designs to `output`, or stdout when `None`.
pub fn write_output(result: &RunResult, output: Option<&Path>) -> Result<()> {
    let text = render_json(result)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote design JSON");
        }
        None => println!("{text}"),
    }
    Ok(())
}
