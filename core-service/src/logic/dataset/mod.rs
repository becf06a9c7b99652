//! Dataset Module - Training data input
//!
//! Reads the streetlight CSV into observations (numeric columns only) and
//! exports the rule-labeled training set.

pub mod loader;
pub mod export;


use std::collections::BTreeMap;

use crate::logic::observation::Observation;

pub use loader::{from_reader, load_csv};
pub use export::write_labeled_csv;

/// Source columns known to hold stored targets from upstream processing
pub const STORED_TARGET_COLUMNS: &[&str] = &["should_light_be_on", "optimal_lighting_adjusted", "fault_type"];

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Numeric columns in file order
    pub columns: Vec<String>,
    /// One observation per CSV row; empty cells are absent fields
    pub rows: Vec<Observation>,
    /// Header names dropped because some cell was not a number
    pub skipped_columns: Vec<String>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Occurrences of each present value in a numeric column
    pub fn value_counts(&self, column: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for value in self.rows.iter().filter_map(|r| r.get(column)) {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        counts
    }
}
