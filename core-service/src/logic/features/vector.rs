//! Feature Vector - Classifier input
//!
//! Values in the order of a `FeatureLayout`, tagged with that layout's hash.

use serde::{Deserialize, Serialize};

use crate::logic::observation::Observation;
use super::layout::FeatureLayout;

/// Value used at inference for layout members the observation lacks
pub const MISSING_FEATURE_VALUE: f64 = 0.0;

// ============================================================================
// FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// CRC32 of the layout these values follow
    pub layout_hash: u32,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, layout: &FeatureLayout, name: &str) -> Option<f64> {
        layout.index_of(name).and_then(|i| self.get(i))
    }

    /// Named values for logging
    pub fn to_log_entry(&self, layout: &FeatureLayout) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash,
            "named_values": layout.names().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Project an observation onto `layout`.
///
/// Fields outside the layout are ignored; members the observation lacks
/// become `MISSING_FEATURE_VALUE`.
pub fn build(observation: &Observation, layout: &FeatureLayout) -> FeatureVector {
    let values = layout
        .names()
        .iter()
        .map(|name| observation.get(name).unwrap_or(MISSING_FEATURE_VALUE))
        .collect();

    FeatureVector {
        layout_hash: layout.layout_hash(),
        values,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FeatureLayout {
        FeatureLayout::from_columns(["hour", "month", "cloud", "humidity"])
    }

    #[test]
    fn test_build_follows_layout_order() {
        let obs = Observation::from_pairs(vec![("cloud", 40.0), ("hour", 9.0), ("month", 3.0), ("humidity", 70.0)]);
        let vector = build(&obs, &layout());
        assert_eq!(vector.values, vec![9.0, 3.0, 40.0, 70.0]);
        assert_eq!(vector.layout_hash, layout().layout_hash());
    }

    #[test]
    fn test_build_defaults_missing_to_zero() {
        let obs = Observation::from_pairs(vec![("hour", 9.0)]);
        let vector = build(&obs, &layout());
        assert_eq!(vector.values, vec![9.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_build_ignores_extra_fields() {
        let obs = Observation::from_pairs(vec![("hour", 9.0), ("latitude", 18.5), ("wind_speed_kph", 4.0)]);
        let vector = build(&obs, &layout());
        assert_eq!(vector.len(), 4);
        assert_eq!(vector.get_by_name(&layout(), "hour"), Some(9.0));
    }

    #[test]
    fn test_to_log_entry() {
        let obs = Observation::from_pairs(vec![("hour", 9.0)]);
        let l = layout();
        let log = build(&obs, &l).to_log_entry(&l);
        assert_eq!(log["named_values"]["hour"], 9.0);
        assert!(log["layout_hash"].as_u64().is_some());
    }
}
