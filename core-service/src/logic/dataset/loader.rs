use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::logic::error::{EngineError, EngineResult};
use crate::logic::observation::{fields, Observation};
use super::Dataset;

/// Load a headered CSV file
pub fn load_csv(path: &Path) -> EngineResult<Dataset> {
    if !path.exists() {
        return Err(EngineError::Dataset(format!("dataset not found: {}", path.display())));
    }
    let reader = csv::Reader::from_path(path)?;
    let dataset = read_records(reader)?;
    log::info!(
        "Dataset loaded from {}: {} rows, {} numeric columns ({} skipped)",
        path.display(),
        dataset.len(),
        dataset.columns.len(),
        dataset.skipped_columns.len()
    );
    Ok(dataset)
}

/// Same as [`load_csv`] for any reader (tests, stdin)
pub fn from_reader<R: Read>(input: R) -> EngineResult<Dataset> {
    read_records(csv::Reader::from_reader(input))
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> EngineResult<Dataset> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let records: Vec<StringRecord> = reader.records().collect::<Result<_, _>>()?;

    if records.is_empty() {
        return Err(EngineError::Dataset("dataset has no rows".to_string()));
    }

    // A column is numeric when every non-empty cell parses
    let numeric: Vec<bool> = (0..headers.len())
        .map(|col| {
            records.iter().all(|record| {
                let cell = record.get(col).map(str::trim).unwrap_or("");
                cell.is_empty() || cell.parse::<f64>().is_ok()
            })
        })
        .collect();

    let columns: Vec<String> = headers
        .iter()
        .zip(&numeric)
        .filter(|(_, &is_numeric)| is_numeric)
        .map(|(name, _)| name.clone())
        .collect();
    let skipped_columns: Vec<String> = headers
        .iter()
        .zip(&numeric)
        .filter(|(_, &is_numeric)| !is_numeric)
        .map(|(name, _)| name.clone())
        .collect();

    if !columns.iter().any(|c| c == fields::HOUR) {
        return Err(EngineError::Dataset(format!(
            "dataset has no numeric '{}' column",
            fields::HOUR
        )));
    }

    let rows = records
        .iter()
        .map(|record| {
            let pairs = headers
                .iter()
                .zip(&numeric)
                .enumerate()
                .filter(|(_, (_, &is_numeric))| is_numeric)
                .filter_map(|(col, (name, _))| {
                    let cell = record.get(col)?.trim();
                    cell.parse::<f64>().ok().map(|v| (name.as_str(), v))
                });
            Observation::from_pairs(pairs)
        })
        .collect();

    if !skipped_columns.is_empty() {
        log::debug!("Skipping non-numeric columns: {:?}", skipped_columns);
    }

    Ok(Dataset { columns, rows, skipped_columns })
}
