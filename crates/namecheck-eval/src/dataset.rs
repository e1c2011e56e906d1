//! Labeled dataset loading.
//!
//! The file is CSV with a `Name,Is_Valid` header. `Name` must be non-empty
//! and `Is_Valid` must be `0` or `1`. Extra columns are ignored.

use std::io::Read;
use std::path::Path;

use namecheck_core::{Label, NameRecord};
use serde::Deserialize;
use tracing::info;

use crate::error::EvalError;

const NAME_COLUMN: &str = "Name";
const LABEL_COLUMN: &str = "Is_Valid";

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Is_Valid")]
    is_valid: String,
}

/// Loads a dataset from a CSV file.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<NameRecord>, EvalError> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| EvalError::io(&source, e))?;
    let records = load_dataset_from_reader(file, &source)?;
    info!("Loaded dataset with {} names from {}", records.len(), source);
    Ok(records)
}

/// Loads a dataset from any reader; `source` names it in errors.
pub fn load_dataset_from_reader<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<NameRecord>, EvalError> {
    let dataset_err = |e: csv::Error| EvalError::Dataset {
        path: source.to_string(),
        source: e,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(dataset_err)?.clone();
    let has = |column: &str| headers.iter().any(|h| h == column);
    if !has(NAME_COLUMN) || !has(LABEL_COLUMN) {
        return Err(EvalError::invalid_row(
            source,
            1,
            format!("CSV must contain '{}' and '{}' columns", NAME_COLUMN, LABEL_COLUMN),
        ));
    }

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(dataset_err)?;
        // Line where the record starts; quoted fields may span several lines.
        let line = record.position().map_or(0, |p| p.line());
        let row: Row = record.deserialize(Some(&headers)).map_err(dataset_err)?;

        if row.name.is_empty() {
            return Err(EvalError::invalid_row(source, line, "empty Name"));
        }
        let expected = row
            .is_valid
            .parse::<u8>()
            .ok()
            .and_then(Label::from_bit)
            .ok_or_else(|| {
                EvalError::invalid_row(
                    source,
                    line,
                    format!("Is_Valid must be 0 or 1, got '{}'", row.is_valid),
                )
            })?;

        records.push(NameRecord::new(row.name, expected));
    }

    Ok(records)
}
