//! Typed view of a behavioral events table.

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::info;

use fmri_common::{any_to_f64, any_to_i64, any_to_string, column_values};
use fmri_ingest::{Separator, read_table, read_table_with_separator};
use fmri_model::labels::{AMPLITUDE_COLUMNS, DURATION_COLUMN, ONSET_COLUMN, TRIAL_ID_COLUMN};

use crate::conditions::{ColumnSource, ConditionColumn, resolve_condition_column};
use crate::error::{DesignError, Result};

/// One trial of an events table.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub onset: f64,
    pub duration: f64,
    pub label: String,
    /// Per-event amplitude, when the table carries an amplitude column.
    pub amplitude: Option<f64>,
    pub trial_id: Option<i64>,
}

impl EventRecord {
    pub fn new(onset: f64, duration: f64, label: impl Into<String>) -> Self {
        Self {
            onset,
            duration,
            label: label.into(),
            amplitude: None,
            trial_id: None,
        }
    }

    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = Some(amplitude);
        self
    }

    #[must_use]
    pub fn with_trial_id(mut self, trial_id: i64) -> Self {
        self.trial_id = Some(trial_id);
        self
    }
}

/// Trial records of one run, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct EventsTable {
    condition_column: ConditionColumn,
    columns: Vec<String>,
    records: Vec<EventRecord>,
    has_trial_ids: bool,
}

impl EventsTable {
    /// Builds a table from records already in memory.
    ///
    /// The table reports a `trial_ID` column when any record carries an ID.
    pub fn new(records: Vec<EventRecord>) -> Self {
        let has_trial_ids = records.iter().any(|record| record.trial_id.is_some());
        let mut columns = vec![
            ONSET_COLUMN.to_string(),
            DURATION_COLUMN.to_string(),
            "trial_type".to_string(),
        ];
        if has_trial_ids {
            columns.push(TRIAL_ID_COLUMN.to_string());
        }
        Self {
            condition_column: ConditionColumn {
                name: "trial_type".to_string(),
                source: ColumnSource::Candidate,
            },
            columns,
            records,
            has_trial_ids,
        }
    }

    /// Extracts trial records from a loaded events DataFrame.
    ///
    /// Requires `onset` and `duration` columns with a finite value in every
    /// row. Null condition labels become empty strings.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.as_str().to_owned())
            .collect();
        let condition_column = resolve_condition_column(df)?;

        let onsets = required_numbers(df, ONSET_COLUMN, &columns)?;
        let durations = required_numbers(df, DURATION_COLUMN, &columns)?;
        let labels = column_values(df, &condition_column.name, any_to_string)?;

        let amplitudes = match AMPLITUDE_COLUMNS
            .iter()
            .find(|name| columns.iter().any(|c| c == *name))
        {
            Some(name) => column_values(df, name, any_to_f64)?,
            None => vec![None; df.height()],
        };
        let has_trial_ids = columns.iter().any(|c| c == TRIAL_ID_COLUMN);
        let trial_ids = if has_trial_ids {
            column_values(df, TRIAL_ID_COLUMN, any_to_i64)?
        } else {
            vec![None; df.height()]
        };

        let records = onsets
            .into_iter()
            .zip(durations)
            .zip(labels)
            .zip(amplitudes.into_iter().zip(trial_ids))
            .map(
                |(((onset, duration), label), (amplitude, trial_id))| EventRecord {
                    onset,
                    duration,
                    label,
                    amplitude,
                    trial_id,
                },
            )
            .collect();

        Ok(Self {
            condition_column,
            columns,
            records,
            has_trial_ids,
        })
    }

    /// Reads and parses an events file.
    ///
    /// `separator` overrides detection when given.
    pub fn load(path: &Path, separator: Option<Separator>) -> Result<Self> {
        let df = match separator {
            Some(separator) => read_table_with_separator(path, separator)?,
            None => read_table(path)?,
        };
        let table = Self::from_frame(&df)?;
        info!(
            path = %path.display(),
            condition_column = %table.condition_column.name,
            trials = table.len(),
            "loaded events table"
        );
        Ok(table)
    }

    pub fn condition_column(&self) -> &ConditionColumn {
        &self.condition_column
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Condition labels in table order.
    pub fn labels(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.label.as_str()).collect()
    }

    /// Whether the table has a `trial_ID` column.
    pub fn has_trial_ids(&self) -> bool {
        self.has_trial_ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn required_numbers(df: &DataFrame, column: &str, available: &[String]) -> Result<Vec<f64>> {
    if !available.iter().any(|c| c == column) {
        return Err(DesignError::MissingColumn {
            column: column.to_string(),
            available: available.to_vec(),
        });
    }
    column_values(df, column, any_to_f64)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .filter(|v| v.is_finite())
                .ok_or_else(|| DesignError::InvalidValue {
                    column: column.to_string(),
                    row,
                })
        })
        .collect()
}
