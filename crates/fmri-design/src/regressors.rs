//! Confound table access, nuisance regressor selection and the motion file.
//!
//! The motion file holds the rigid-body motion parameters as plain text, one
//! line per volume and one space-separated `%g` value per parameter, which
//! is the layout FSL-style tools read. Nuisance regressors are returned
//! transposed (one series per regressor) for the design record.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use fmri_common::{any_to_f64, column_values, format_g};
use fmri_ingest::{Separator, read_table, read_table_with_separator};

use crate::error::{DesignError, Result};

/// Per-volume confound columns of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressorsTable {
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
    volumes: usize,
}

impl RegressorsTable {
    /// Builds a table from named columns in order.
    ///
    /// Every column must have the same number of volumes.
    pub fn new(columns: Vec<(String, Vec<Option<f64>>)>) -> Result<Self> {
        let volumes = columns.first().map_or(0, |(_, values)| values.len());
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != volumes) {
            return Err(DesignError::RaggedRegressors {
                column: name.clone(),
                expected: volumes,
                actual: values.len(),
            });
        }
        let (columns, values) = columns.into_iter().unzip();
        Ok(Self {
            columns,
            values,
            volumes,
        })
    }

    /// Reads every column of a confounds DataFrame as numbers.
    ///
    /// Cells that are null or not numeric are missing.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        for name in df.get_column_names() {
            let values = column_values(df, name.as_str(), any_to_f64)?;
            columns.push((name.to_string(), values));
        }
        Self::new(columns)
    }

    /// Reads and parses a confounds file.
    pub fn load(path: &Path, separator: Option<Separator>) -> Result<Self> {
        let df = match separator {
            Some(separator) => read_table_with_separator(path, separator)?,
            None => read_table(path)?,
        };
        let table = Self::from_frame(&df)?;
        info!(
            path = %path.display(),
            columns = table.columns.len(),
            volumes = table.volumes,
            "loaded regressors table"
        );
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(&self.values[idx])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of volumes (rows).
    pub fn volumes(&self) -> usize {
        self.volumes
    }

    /// Column values with missing cells read as zero.
    fn filled(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name)
            .map(|values| values.iter().map(|v| v.unwrap_or(0.0)).collect())
    }
}

/// Nuisance regressors chosen for a design, one series per name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegressorSelection {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl RegressorSelection {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Motion parameters as a volumes x parameters matrix.
///
/// At least one column is required and every requested column must exist.
/// Missing cells are zero.
pub fn select_motion(table: &RegressorsTable, motion_columns: &[String]) -> Result<Vec<Vec<f64>>> {
    if motion_columns.is_empty() {
        return Err(DesignError::NoMotionColumns);
    }
    let missing: Vec<String> = motion_columns
        .iter()
        .filter(|name| !table.has_column(name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(DesignError::MissingMotionColumns {
            missing,
            available: table.columns.clone(),
        });
    }

    let series: Vec<Vec<f64>> = motion_columns
        .iter()
        .filter_map(|name| table.filled(name))
        .collect();
    Ok((0..table.volumes)
        .map(|volume| series.iter().map(|column| column[volume]).collect())
        .collect())
}

/// Writes a motion matrix as space-delimited `%g` text, one line per volume.
///
/// Missing parent directories are created. Returns the absolute path of the
/// written file.
pub fn write_motion_file(path: &Path, rows: &[Vec<f64>]) -> Result<PathBuf> {
    let path = std::path::absolute(path).map_err(|e| DesignError::motion_write(path, e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DesignError::motion_write(&path, e))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .from_path(&path)
        .map_err(|e| DesignError::motion_write(&path, e))?;
    for row in rows {
        writer
            .write_record(row.iter().map(|value| format_g(*value)))
            .map_err(|e| DesignError::motion_write(&path, e))?;
    }
    writer
        .flush()
        .map_err(|e| DesignError::motion_write(&path, e))?;

    debug!(path = %path.display(), volumes = rows.len(), "wrote motion file");
    Ok(path)
}

/// Chooses the nuisance regressors of a design.
///
/// Without `requested`, every non-motion column is used in lexicographic
/// order. Requested names keep their order; duplicates and names absent from
/// the table are dropped.
pub fn select_regressors(
    table: &RegressorsTable,
    motion_columns: &[String],
    requested: Option<&[String]>,
) -> RegressorSelection {
    let names: Vec<String> = match requested {
        None => {
            let motion: BTreeSet<&str> = motion_columns.iter().map(String::as_str).collect();
            let mut names: Vec<String> = table
                .columns
                .iter()
                .filter(|name| !motion.contains(name.as_str()))
                .cloned()
                .collect();
            names.sort();
            names
        }
        Some(requested) => {
            let mut seen = BTreeSet::new();
            let mut names = Vec::with_capacity(requested.len());
            let mut dropped = Vec::new();
            for name in requested {
                if !seen.insert(name.as_str()) {
                    continue;
                }
                if table.has_column(name) {
                    names.push(name.clone());
                } else {
                    dropped.push(name.as_str());
                }
            }
            if !dropped.is_empty() {
                warn!(
                    dropped = %dropped.join(", "),
                    kept = names.len(),
                    "requested regressors not found in regressors table"
                );
            }
            names
        }
    };

    let values = names
        .iter()
        .filter_map(|name| table.filled(name))
        .collect();
    RegressorSelection { names, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[(&str, &[Option<f64>])]) -> RegressorsTable {
        RegressorsTable::new(
            columns
                .iter()
                .map(|(name, values)| ((*name).to_string(), values.to_vec()))
                .collect(),
        )
        .unwrap()
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = RegressorsTable::new(vec![
            ("csf".to_string(), vec![Some(1.0), Some(2.0)]),
            ("wm".to_string(), vec![Some(1.0)]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            DesignError::RaggedRegressors {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn default_selection_excludes_motion_and_sorts() {
        let table = table(&[
            ("wm", &[Some(0.2)]),
            ("trans_x", &[Some(0.0)]),
            ("csf", &[Some(0.1)]),
        ]);
        let selection = select_regressors(&table, &names(&["trans_x"]), None);
        assert_eq!(selection.names, vec!["csf", "wm"]);
        assert_eq!(selection.values, vec![vec![0.1], vec![0.2]]);
    }

    #[test]
    fn requested_names_fall_back_to_intersection() {
        let table = table(&[("wm", &[Some(0.2)]), ("csf", &[Some(0.1)])]);
        let requested = names(&["wm", "ghost_col", "csf", "wm"]);
        let selection = select_regressors(&table, &[], Some(&requested));
        assert_eq!(selection.names, vec!["wm", "csf"]);
    }

    #[test]
    fn missing_values_are_zero_filled() {
        let table = table(&[("framewise_displacement", &[None, Some(0.12)])]);
        let selection = select_regressors(&table, &[], None);
        assert_eq!(selection.values, vec![vec![0.0, 0.12]]);
    }

    #[test]
    fn motion_matrix_is_volumes_by_parameters() {
        let table = table(&[
            ("trans_x", &[Some(0.1), Some(0.2)]),
            ("rot_x", &[Some(0.01), None]),
        ]);
        let rows = select_motion(&table, &names(&["trans_x", "rot_x"])).unwrap();
        assert_eq!(rows, vec![vec![0.1, 0.01], vec![0.2, 0.0]]);
    }

    #[test]
    fn missing_motion_columns_are_fatal() {
        let table = table(&[("trans_x", &[Some(0.1)])]);
        let err = select_motion(&table, &names(&["trans_x", "rot_z"])).unwrap_err();
        match err {
            DesignError::MissingMotionColumns { missing, available } => {
                assert_eq!(missing, vec!["rot_z"]);
                assert_eq!(available, vec!["trans_x"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_motion_column_list_is_rejected() {
        let table = table(&[("trans_x", &[Some(0.1)])]);
        let err = select_motion(&table, &[]).unwrap_err();
        assert!(matches!(err, DesignError::NoMotionColumns));
    }

    #[test]
    fn motion_file_is_space_delimited_g_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("motion.par");
        let written = write_motion_file(
            &path,
            &[vec![0.0, 0.5, -0.25], vec![1234567.0, 0.00001, 2.0]],
        )
        .unwrap();
        assert!(written.is_absolute());
        let contents = fs::read_to_string(&written).unwrap();
        insta::assert_snapshot!(contents.trim_end(), @r"
        0 0.5 -0.25
        1.23457e+06 1e-05 2
        ");
    }
}
