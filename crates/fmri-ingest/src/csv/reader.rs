//! Delimited table reading into Polars DataFrames.

use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

use super::separator::{Separator, detect_separator};

/// Cell spellings read as missing values.
///
/// fMRIPrep confound files use `n/a` for the first row of derivative
/// columns; spreadsheet exports add the rest.
pub const NULL_TOKENS: &[&str] = &[
    "n/a", "N/A", "NA", "<NA>", "#N/A", "#N/A N/A", "#NA", "NaN", "-NaN", "nan", "-nan", "null",
    "NULL", "None", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// Normalizes a header value by trimming whitespace and a UTF-8 BOM.
pub fn normalize_header(value: &str) -> String {
    value.trim().trim_matches('\u{feff}').trim().to_string()
}

fn check_readable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if metadata.len() == 0 {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Reads a delimited table, detecting tab or comma separation from the
/// first characters of the file.
///
/// Detection never fails; a mis-detected separator typically shows up later
/// as a table with a single, unsplit column.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    read_table_with_separator(path, detect_separator(path))
}

/// Reads a delimited table with an explicit separator.
pub fn read_table_with_separator(path: &Path, separator: Separator) -> Result<DataFrame> {
    check_readable(path)?;

    let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|t| (*t).into()).collect());
    let parse_options = CsvParseOptions::default()
        .with_separator(separator.as_byte())
        .with_null_values(Some(null_values));

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let renames: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .filter_map(|name| {
            let normalized = normalize_header(name.as_str());
            (normalized != name.as_str()).then(|| (name.to_string(), normalized))
        })
        .collect();
    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }

    debug!(
        path = %path.display(),
        %separator,
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_table(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_tab_separated() {
        let file = create_temp_table("onset\tduration\ttrial_type\n0.0\t2.0\tCS+\n10.0\t2.0\tCS-\n");
        let df = read_table(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert!(df.column("trial_type").is_ok());
    }

    #[test]
    fn test_read_comma_separated() {
        let file = create_temp_table("onset,duration,trial_type\n0.0,2.0,CS+\n");
        let df = read_table(file.path()).unwrap();
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_wrong_separator_yields_single_column() {
        let file = create_temp_table("onset\tduration\n0.0\t2.0\n");
        let df = read_table_with_separator(file.path(), Separator::Comma).unwrap();
        assert_eq!(df.width(), 1);
    }

    #[test]
    fn test_null_tokens_are_missing() {
        let file = create_temp_table("csf\tframewise_displacement\n0.5\tn/a\n0.7\t0.12\n");
        let df = read_table(file.path()).unwrap();
        let fd = df.column("framewise_displacement").unwrap();
        assert_eq!(fd.null_count(), 1);
        assert!(fd.dtype().is_float());
    }

    #[test]
    fn test_header_bom_is_stripped() {
        let file = create_temp_table("\u{feff}onset,duration\n1,2\n");
        let df = read_table(file.path()).unwrap();
        assert!(df.column("onset").is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(&dir.path().join("events.tsv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_empty_file() {
        let file = create_temp_table("");
        let result = read_table(file.path());
        assert!(matches!(result, Err(IngestError::EmptyTable { .. })));
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  onset  "), "onset");
        assert_eq!(normalize_header("\u{feff}trial_type"), "trial_type");
    }
}
