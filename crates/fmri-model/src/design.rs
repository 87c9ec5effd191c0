//! The run design record handed to the modeling engine.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Events of one condition, aligned index-for-index.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionEvents {
    pub name: String,
    pub onsets: Vec<f64>,
    pub durations: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

impl ConditionEvents {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            onsets: Vec::new(),
            durations: Vec::new(),
            amplitudes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.onsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.onsets.is_empty()
    }
}

/// Per-run design information for one first-level model.
///
/// `onsets`, `durations` and `amplitudes` are aligned with `conditions`;
/// `regressors` holds one series per entry of `regressor_names`
/// (regressors x timepoints). The serialized field names are the interface
/// with the modeling engine. Values are fixed once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RunDesignRecord")]
pub struct RunDesign {
    scans: String,
    conditions: Vec<String>,
    onsets: Vec<Vec<f64>>,
    durations: Vec<Vec<f64>>,
    amplitudes: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    regressor_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    regressors: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RunDesignRecord {
    scans: String,
    conditions: Vec<String>,
    onsets: Vec<Vec<f64>>,
    durations: Vec<Vec<f64>>,
    amplitudes: Vec<Vec<f64>>,
    #[serde(default)]
    regressor_names: Vec<String>,
    #[serde(default)]
    regressors: Vec<Vec<f64>>,
}

impl TryFrom<RunDesignRecord> for RunDesign {
    type Error = ModelError;

    fn try_from(record: RunDesignRecord) -> Result<Self> {
        let lengths = [
            record.onsets.len(),
            record.durations.len(),
            record.amplitudes.len(),
        ];
        if lengths.iter().any(|len| *len != record.conditions.len()) {
            return Err(ModelError::MisalignedCondition {
                name: "<all>".to_string(),
                onsets: lengths[0],
                durations: lengths[1],
                amplitudes: lengths[2],
            });
        }
        let conditions = record
            .conditions
            .into_iter()
            .zip(record.onsets)
            .zip(record.durations)
            .zip(record.amplitudes)
            .map(|(((name, onsets), durations), amplitudes)| ConditionEvents {
                name,
                onsets,
                durations,
                amplitudes,
            })
            .collect();
        Self::new(
            record.scans,
            conditions,
            record.regressor_names,
            record.regressors,
        )
    }
}

impl RunDesign {
    /// Assembles a design, checking that every list lines up.
    pub fn new(
        scans: impl Into<String>,
        conditions: Vec<ConditionEvents>,
        regressor_names: Vec<String>,
        regressors: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for condition in &conditions {
            if !seen.insert(condition.name.as_str()) {
                return Err(ModelError::DuplicateCondition {
                    name: condition.name.clone(),
                });
            }
            if condition.durations.len() != condition.onsets.len()
                || condition.amplitudes.len() != condition.onsets.len()
            {
                return Err(ModelError::MisalignedCondition {
                    name: condition.name.clone(),
                    onsets: condition.onsets.len(),
                    durations: condition.durations.len(),
                    amplitudes: condition.amplitudes.len(),
                });
            }
        }

        if regressor_names.len() != regressors.len() {
            return Err(ModelError::RegressorCountMismatch {
                names: regressor_names.len(),
                series: regressors.len(),
            });
        }
        if let Some(expected) = regressors.first().map(Vec::len) {
            for (name, series) in regressor_names.iter().zip(&regressors) {
                if series.len() != expected {
                    return Err(ModelError::RegressorLengthMismatch {
                        name: name.clone(),
                        expected,
                        actual: series.len(),
                    });
                }
            }
        }

        let mut names = Vec::with_capacity(conditions.len());
        let mut onsets = Vec::with_capacity(conditions.len());
        let mut durations = Vec::with_capacity(conditions.len());
        let mut amplitudes = Vec::with_capacity(conditions.len());
        for condition in conditions {
            names.push(condition.name);
            onsets.push(condition.onsets);
            durations.push(condition.durations);
            amplitudes.push(condition.amplitudes);
        }

        Ok(Self {
            scans: scans.into(),
            conditions: names,
            onsets,
            durations,
            amplitudes,
            regressor_names,
            regressors,
        })
    }

    pub fn scans(&self) -> &str {
        &self.scans
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn onsets(&self) -> &[Vec<f64>] {
        &self.onsets
    }

    pub fn durations(&self) -> &[Vec<f64>] {
        &self.durations
    }

    pub fn amplitudes(&self) -> &[Vec<f64>] {
        &self.amplitudes
    }

    pub fn regressor_names(&self) -> &[String] {
        &self.regressor_names
    }

    /// Regressor values, one series per regressor name.
    pub fn regressors(&self) -> &[Vec<f64>] {
        &self.regressors
    }

    /// Events of a single condition, looked up by exact name.
    pub fn condition(&self, name: &str) -> Option<ConditionEvents> {
        let idx = self.conditions.iter().position(|c| c == name)?;
        Some(ConditionEvents {
            name: self.conditions[idx].clone(),
            onsets: self.onsets[idx].clone(),
            durations: self.durations[idx].clone(),
            amplitudes: self.amplitudes[idx].clone(),
        })
    }

    /// Total number of events across all conditions.
    pub fn event_count(&self) -> usize {
        self.onsets.iter().map(Vec::len).sum()
    }

    /// Number of timepoints covered by the regressors, if any were selected.
    pub fn timepoints(&self) -> Option<usize> {
        self.regressors.first().map(Vec::len)
    }
}

/// A run design together with the motion file written while building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltDesign {
    pub design: RunDesign,
    pub motion_file: PathBuf,
}
