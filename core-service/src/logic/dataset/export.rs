use std::fs;
use std::path::Path;

use crate::logic::error::{EngineError, EngineResult};
use crate::logic::features::LABEL_COLUMN;
use crate::logic::rules::Label;
use super::Dataset;

/// Write the numeric columns plus the rule label column as CSV.
/// Returns the number of rows written.
pub fn write_labeled_csv(dataset: &Dataset, labels: &[Label], path: &Path) -> EngineResult<usize> {
    if labels.len() != dataset.len() {
        return Err(EngineError::Dataset(format!(
            "{} labels for {} rows", labels.len(), dataset.len()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let columns: Vec<&str> = dataset
        .columns
        .iter()
        .map(String::as_str)
        .filter(|c| *c != LABEL_COLUMN)
        .collect();

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns.iter().copied().chain(std::iter::once(LABEL_COLUMN)))?;

    for (row, label) in dataset.rows.iter().zip(labels) {
        let mut record: Vec<String> = columns
            .iter()
            .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        record.push(label.as_u8().to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;

    log::info!("Exported {} labeled rows to {}", labels.len(), path.display());
    Ok(labels.len())
}
