//! Condition column resolution and condition set derivation.
//!
//! The condition set of a run is the sorted list of distinct raw labels,
//! except when the label `CS-_first_half` occurs more than once: those trials
//! are then modeled as two conditions, the first presentation
//! (`CS-_first_half_first`) and every later one (`CS-_first_half_others`).
//! Labels are compared by exact string equality throughout.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use fmri_model::labels::{
    CONDITION_COLUMN_CANDIDATES, CS_MINUS_FIRST_HALF, CS_MINUS_FIRST_HALF_FIRST,
    CS_MINUS_FIRST_HALF_OTHERS,
};

use crate::error::{DesignError, Result};

/// How the condition column was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// One of the well-known label column names.
    Candidate,
    /// First column whose values are not numeric.
    FirstNonNumeric,
}

/// The events column holding per-trial condition labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionColumn {
    pub name: String,
    pub source: ColumnSource,
}

/// Picks the condition column of an events DataFrame.
pub fn resolve_condition_column(df: &DataFrame) -> Result<ConditionColumn> {
    let columns: Vec<(String, bool)> = df
        .get_columns()
        .iter()
        .map(|column| {
            let dtype = column.dtype();
            // An all-missing column carries no labels, whatever its dtype.
            let all_missing = !column.is_empty() && column.null_count() == column.len();
            (
                column.name().to_string(),
                dtype.is_primitive_numeric() || dtype.is_bool() || all_missing,
            )
        })
        .collect();
    select_condition_column(&columns)
}

/// Picks the condition column from `(name, is_numeric)` pairs in table order.
///
/// Well-known names win in priority order; otherwise the first non-numeric
/// column is used.
pub fn select_condition_column(columns: &[(String, bool)]) -> Result<ConditionColumn> {
    for candidate in CONDITION_COLUMN_CANDIDATES {
        if columns.iter().any(|(name, _)| name == candidate) {
            return Ok(ConditionColumn {
                name: (*candidate).to_string(),
                source: ColumnSource::Candidate,
            });
        }
    }

    if let Some((name, _)) = columns.iter().find(|(_, numeric)| !numeric) {
        debug!(column = %name, "no standard condition column, using first non-numeric column");
        return Ok(ConditionColumn {
            name: name.clone(),
            source: ColumnSource::FirstNonNumeric,
        });
    }

    Err(DesignError::ConditionColumnNotFound {
        available: columns.iter().map(|(name, _)| name.clone()).collect(),
    })
}

/// Final, ordered condition names of a run plus the rule mapping rows to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSet {
    conditions: Vec<String>,
    cs_minus_count: usize,
}

impl ConditionSet {
    /// Derives the condition set from the raw labels of a run, in table order.
    ///
    /// Fails only when the CS- split is active and a raw label already uses
    /// one of the derived names.
    pub fn derive<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let cs_minus_count = labels
            .iter()
            .filter(|label| label.as_ref() == CS_MINUS_FIRST_HALF)
            .count();
        let distinct: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();

        let conditions = if cs_minus_count > 1 {
            if let Some(label) = distinct
                .iter()
                .find(|label| **label == CS_MINUS_FIRST_HALF_FIRST || **label == CS_MINUS_FIRST_HALF_OTHERS)
            {
                return Err(DesignError::ReservedLabel {
                    label: (*label).to_string(),
                });
            }
            let mut conditions = vec![
                CS_MINUS_FIRST_HALF_FIRST.to_string(),
                CS_MINUS_FIRST_HALF_OTHERS.to_string(),
            ];
            conditions.extend(
                distinct
                    .iter()
                    .filter(|label| **label != CS_MINUS_FIRST_HALF)
                    .map(|label| (*label).to_string()),
            );
            info!(
                cs_minus_trials = cs_minus_count,
                conditions = conditions.len(),
                "split repeated CS-_first_half trials into first and others"
            );
            conditions
        } else {
            distinct.iter().map(|label| (*label).to_string()).collect()
        };

        Ok(Self {
            conditions,
            cs_minus_count,
        })
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Whether repeated `CS-_first_half` trials were split.
    pub fn is_split(&self) -> bool {
        self.cs_minus_count > 1
    }

    /// Row indices (table order) selected by `condition`.
    ///
    /// Unknown conditions select nothing.
    pub fn rows_for<S: AsRef<str>>(&self, condition: &str, labels: &[S]) -> Vec<usize> {
        if !self.conditions.iter().any(|c| c == condition) {
            return Vec::new();
        }
        if self.is_split() {
            if condition == CS_MINUS_FIRST_HALF_FIRST {
                return rows_labelled(labels, CS_MINUS_FIRST_HALF)
                    .into_iter()
                    .take(1)
                    .collect();
            }
            if condition == CS_MINUS_FIRST_HALF_OTHERS {
                return rows_labelled(labels, CS_MINUS_FIRST_HALF)
                    .into_iter()
                    .skip(1)
                    .collect();
            }
        }
        rows_labelled(labels, condition)
    }
}

fn rows_labelled<S: AsRef<str>>(labels: &[S], wanted: &str) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.as_ref() == wanted)
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(entries: &[(&str, bool)]) -> Vec<(String, bool)> {
        entries.iter()
            .map(|(name, numeric)| ((*name).to_string(), *numeric))
            .collect()
    }

    #[test]
    fn candidate_priority_order() {
        let resolved = select_condition_column(&columns(&[
            ("onset", true),
            ("stimulus", false),
            ("condition", false),
        ]))
        .unwrap();
        assert_eq!(resolved.name, "condition");
        assert_eq!(resolved.source, ColumnSource::Candidate);
    }

    #[test]
    fn falls_back_to_first_non_numeric_column() {
        let resolved = select_condition_column(&columns(&[
            ("onset", true),
            ("duration", true),
            ("label", false),
            ("notes", false),
        ]))
        .unwrap();
        assert_eq!(resolved.name, "label");
        assert_eq!(resolved.source, ColumnSource::FirstNonNumeric);
    }

    #[test]
    fn all_numeric_columns_fail_with_available_names() {
        let err =
            select_condition_column(&columns(&[("onset", true), ("duration", true)])).unwrap_err();
        match err {
            DesignError::ConditionColumnNotFound { available } => {
                assert_eq!(available, vec!["onset", "duration"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_cs_minus_is_split() {
        let labels = ["CS-_first_half", "CS+", "CS-_first_half", "CS-_first_half"];
        let set = ConditionSet::derive(&labels).unwrap();
        assert!(set.is_split());
        assert_eq!(
            set.conditions(),
            ["CS-_first_half_first", "CS-_first_half_others", "CS+"]
        );
        assert_eq!(set.rows_for("CS-_first_half_first", &labels), vec![0]);
        assert_eq!(set.rows_for("CS-_first_half_others", &labels), vec![2, 3]);
        assert_eq!(set.rows_for("CS+", &labels), vec![1]);
        assert!(set.rows_for("CS-_first_half", &labels).is_empty());
    }

    #[test]
    fn single_cs_minus_is_not_split() {
        let labels = ["FIXATION", "CS-_first_half", "CS+"];
        let set = ConditionSet::derive(&labels).unwrap();
        assert!(!set.is_split());
        assert_eq!(set.conditions(), ["CS+", "CS-_first_half", "FIXATION"]);
        assert_eq!(set.rows_for("CS-_first_half", &labels), vec![1]);
    }

    #[test]
    fn split_uses_exact_label_match() {
        // Prefix-sharing labels are distinct conditions and never counted.
        let labels = [
            "CS-_first_half",
            "CS-_first_half_extra",
            "cs-_first_half",
            "CS-",
        ];
        let set = ConditionSet::derive(&labels).unwrap();
        assert!(!set.is_split());
        assert_eq!(set.rows_for("CS-", &labels), vec![3]);
        assert_eq!(set.rows_for("CS-_first_half", &labels), vec![0]);
    }

    #[test]
    fn labels_with_pattern_characters_match_literally() {
        let labels = ["CS+", "CSS", "CS+", "US.*"];
        let set = ConditionSet::derive(&labels).unwrap();
        assert_eq!(set.rows_for("CS+", &labels), vec![0, 2]);
        assert_eq!(set.rows_for("US.*", &labels), vec![3]);
    }

    #[test]
    fn reserved_label_collision_is_rejected() {
        let labels = ["CS-_first_half", "CS-_first_half", "CS-_first_half_first"];
        let err = ConditionSet::derive(&labels).unwrap_err();
        assert!(matches!(err, DesignError::ReservedLabel { .. }));

        // Without a split the literal label is an ordinary condition.
        let set = ConditionSet::derive(&["CS-_first_half_first", "CS+"]).unwrap();
        assert_eq!(set.rows_for("CS-_first_half_first", &["CS-_first_half_first", "CS+"]), vec![0]);
    }

    #[test]
    fn empty_run_has_no_conditions() {
        let labels: [&str; 0] = [];
        let set = ConditionSet::derive(&labels).unwrap();
        assert!(set.conditions().is_empty());
    }
}
