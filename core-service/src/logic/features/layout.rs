//! Feature Layout - Training-time Feature Definition
//!
//! **CRITICAL: The layout recorded at training time is the only valid layout
//! at inference time.**
//!
//! ## Rules:
//! 1. Order follows the dataset's column order and never changes after fit
//! 2. Neither the label nor any identifier column is ever a feature
//! 3. Every vector carries the CRC32 of the layout it was built against

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};

// ============================================================================
// EXCLUDED COLUMNS
// ============================================================================

/// Column written by the rule engine
pub const LABEL_COLUMN: &str = "smart_lighting_target";

/// Columns that are never features: the label, stored targets from the
/// source dataset, and fixture/spatial identifiers
pub const EXCLUDED_COLUMNS: &[&str] = &[
    LABEL_COLUMN,
    "should_light_be_on",
    "optimal_lighting_adjusted",
    "fault_type",
    "bulb_number",
    "latitude",
    "longitude",
];

pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_COLUMNS.contains(&name)
}

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Ordered feature names fixed at training time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureLayout {
    names: Vec<String>,
}

impl FeatureLayout {
    /// Use `names` as-is (e.g. loaded from an artifact)
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Select features from numeric dataset columns, keeping their order
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .filter(|c| !is_excluded(c))
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// O(n) but layouts are small
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// CRC32 over the names in order, NUL-separated
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        for name in &self.names {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize()
    }

    /// Check a vector/model hash against this layout
    pub fn validate(&self, incoming_hash: u32) -> EngineResult<()> {
        let expected = self.layout_hash();
        if incoming_hash != expected {
            return Err(EngineError::LayoutMismatch { expected, actual: incoming_hash });
        }
        Ok(())
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout summary for logging / model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl From<&FeatureLayout> for LayoutInfo {
    fn from(layout: &FeatureLayout) -> Self {
        Self {
            hash: layout.layout_hash(),
            feature_count: layout.len(),
            feature_names: layout.names.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns_drops_excluded() {
        let layout = FeatureLayout::from_columns([
            "hour", "latitude", "cloud", "smart_lighting_target", "fault_type", "bulb_number",
        ]);
        assert_eq!(layout.names(), &["hour".to_string(), "cloud".to_string()]);
    }

    #[test]
    fn test_index_lookup() {
        let layout = FeatureLayout::from_columns(["hour", "month", "cloud"]);
        assert_eq!(layout.index_of("month"), Some(1));
        assert_eq!(layout.index_of("nonexistent"), None);
        assert_eq!(layout.name_at(2), Some("cloud"));
        assert_eq!(layout.name_at(3), None);
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let a = FeatureLayout::from_columns(["hour", "month"]);
        let b = FeatureLayout::from_columns(["month", "hour"]);
        assert_eq!(a.layout_hash(), a.clone().layout_hash());
        assert_ne!(a.layout_hash(), b.layout_hash());
    }

    #[test]
    fn test_validate() {
        let layout = FeatureLayout::from_columns(["hour", "month"]);
        assert!(layout.validate(layout.layout_hash()).is_ok());
        let err = layout.validate(layout.layout_hash().wrapping_add(1)).unwrap_err();
        assert!(matches!(err, EngineError::LayoutMismatch { .. }));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let layout = FeatureLayout::from_columns(["hour", "month"]);
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(json, r#"["hour","month"]"#);
    }
}
