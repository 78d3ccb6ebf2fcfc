use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, DataType}};

/// Read a CSV with a header row. Every column is read as a string so that
/// identifiers keep their leading zeros; numeric columns are converted on
/// demand by [`numeric_column`].
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[data::table] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[data::table] Failed to read CSV from {:?}", path))
}

/// Column values as trimmed strings; empty cells are `None`.
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)
        .with_context(|| format!("[data::table] Missing column {name:?}"))?
        .as_materialized_series()
        .cast(&DataType::String)?;

    Ok(column.str()?.into_iter()
        .map(|value| value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}

/// Column values as numbers. Cells that do not parse become `None` rather
/// than an error; they are classified as missing downstream.
pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(string_column(df, name)?.into_iter()
        .map(|value| value.and_then(|s| s.parse::<f64>().ok()))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn keeps_leading_zeros() {
        let file = write_csv("GEOID,value\n010010201001,1.5\n");
        let df = read_table(file.path()).unwrap();
        assert_eq!(string_column(&df, "GEOID").unwrap(), vec![Some("010010201001".to_string())]);
    }

    #[test]
    fn unparseable_numbers_are_missing() {
        let file = write_csv("id,RI_Black\na,0.25\nb,\nc,n/a\nd,-0.1\n");
        let df = read_table(file.path()).unwrap();
        assert_eq!(numeric_column(&df, "RI_Black").unwrap(), vec![Some(0.25), None, None, Some(-0.1)]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let file = write_csv("id\na\n");
        let df = read_table(file.path()).unwrap();
        let err = numeric_column(&df, "RI_Black").unwrap_err();
        assert!(err.to_string().contains("RI_Black"));
    }
}
