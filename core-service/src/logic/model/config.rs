//! Forest Configuration
//!
//! Hyper-parameters cho random forest.
//! Defaults match the production training run.

use serde::{Deserialize, Serialize};

/// Features considered at each split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// floor(sqrt(n_features)), at least 1
    Sqrt,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(k) => *k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Per-class sample weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// n_samples / (n_classes * class_count)
    Balanced,
    Uniform,
}

/// Random forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,

    /// Maximum tree depth (None = unbounded)
    pub max_depth: Option<usize>,

    /// Minimum samples required to split a node
    pub min_samples_split: usize,

    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,

    pub max_features: MaxFeatures,

    /// Draw a bootstrap sample per tree
    pub bootstrap: bool,

    pub class_weight: ClassWeight,

    /// Base seed; tree `t` derives its own stream from (seed, t)
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 150,
            max_depth: Some(20),
            min_samples_split: 10,
            min_samples_leaf: 5,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            class_weight: ClassWeight::Balanced,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Small forest for smoke runs and tests
    pub fn quick() -> Self {
        Self {
            n_estimators: 25,
            max_depth: Some(8),
            min_samples_split: 4,
            min_samples_leaf: 2,
            ..Default::default()
        }
    }

    /// Seed for tree `index`
    pub fn tree_seed(&self, index: usize) -> u64 {
        self.seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_training_run() {
        let config = ForestConfig::default();
        assert_eq!(config.n_estimators, 150);
        assert_eq!(config.max_depth, Some(20));
        assert_eq!(config.min_samples_split, 10);
        assert_eq!(config.min_samples_leaf, 5);
        assert_eq!(config.class_weight, ClassWeight::Balanced);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Sqrt.resolve(17), 4);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
        assert_eq!(MaxFeatures::All.resolve(9), 9);
        assert_eq!(MaxFeatures::Fixed(40).resolve(9), 9);
        assert_eq!(MaxFeatures::Fixed(0).resolve(9), 1);
    }

    #[test]
    fn test_tree_seeds_differ() {
        let config = ForestConfig::default();
        assert_ne!(config.tree_seed(0), config.tree_seed(1));
        assert_eq!(config.tree_seed(3), ForestConfig::default().tree_seed(3));
    }
}
