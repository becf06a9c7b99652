//! Random Forest Classifier
//!
//! Ensemble of [`DecisionTree`]s. Prediction averages the leaf class
//! distributions of every tree (soft voting).
//!
//! Each tree is grown independently from its own seeded RNG stream, so
//! construction runs in parallel (rayon) and the result is identical to a
//! sequential fit.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};
use crate::logic::rules::Label;
use super::config::{ClassWeight, ForestConfig};
use super::tree::{ClassDistribution, DecisionTree, TreeParams, CLASS_COUNT};

// ============================================================================
// PREDICTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Probability of the predicted class, in [0.5, 1.0]
    pub confidence: f64,
    pub probabilities: ClassDistribution,
}

impl Prediction {
    /// Argmax; a tie resolves to OFF
    pub fn from_probabilities(probabilities: ClassDistribution) -> Self {
        let label = if probabilities[Label::On.index()] > probabilities[Label::Off.index()] {
            Label::On
        } else {
            Label::Off
        };
        Self {
            label,
            confidence: probabilities[label.index()],
            probabilities,
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit on every row of `data`
    pub fn fit(data: ArrayView2<'_, f64>, labels: &[Label], config: &ForestConfig) -> EngineResult<Self> {
        let n_samples = data.nrows();
        let n_features = data.ncols();

        if n_samples == 0 {
            return Err(EngineError::InsufficientData("cannot fit a forest on zero samples".to_string()));
        }
        if labels.len() != n_samples {
            return Err(EngineError::InsufficientData(format!(
                "{} labels for {} samples", labels.len(), n_samples
            )));
        }
        if n_features == 0 {
            return Err(EngineError::InsufficientData("no features selected".to_string()));
        }
        if config.n_estimators == 0 {
            return Err(EngineError::InsufficientData("n_estimators must be at least 1".to_string()));
        }

        let weights = sample_weights(labels, config.class_weight);
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
            min_samples_leaf: config.min_samples_leaf.max(1),
            max_features: config.max_features.resolve(n_features),
        };

        let trees: Vec<DecisionTree> = (0..config.n_estimators)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(config.tree_seed(t));
                let samples: Vec<usize> = if config.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                DecisionTree::fit(data, labels, &weights, samples, &params, &mut rng)
            })
            .collect();

        log::debug!(
            "Forest fitted: {} trees, {} samples, {} features, max_features={}",
            trees.len(), n_samples, n_features, params.max_features
        );

        Ok(Self { trees, n_features })
    }

    /// Mean class distribution over all trees
    pub fn predict_proba(&self, features: &[f64]) -> EngineResult<ClassDistribution> {
        if features.len() != self.n_features {
            return Err(EngineError::InvalidInput(format!(
                "expected {} features, got {}", self.n_features, features.len()
            )));
        }

        let mut sum = [0.0; CLASS_COUNT];
        for tree in &self.trees {
            let p = tree.predict_proba(features);
            sum[0] += p[0];
            sum[1] += p[1];
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }

    pub fn predict(&self, features: &[f64]) -> EngineResult<Prediction> {
        self.predict_proba(features).map(Prediction::from_probabilities)
    }

    /// Predicted labels for every row of `data`
    pub fn predict_rows(&self, data: ArrayView2<'_, f64>) -> EngineResult<Vec<Label>> {
        data.rows()
            .into_iter()
            .map(|row| {
                let values = row.to_vec();
                self.predict(&values).map(|p| p.label)
            })
            .collect()
    }

    /// Mean decrease in impurity, averaged over trees that split at least
    /// once, normalized to sum 1
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            if tree.importances().iter().sum::<f64>() <= 0.0 {
                continue;
            }
            for (acc, v) in total.iter_mut().zip(tree.importances()) {
                *acc += v;
            }
        }

        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            total.iter_mut().for_each(|v| *v /= sum);
        }
        total
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn avg_depth(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }

    /// Structural check after deserialization
    pub fn is_well_formed(&self) -> bool {
        !self.trees.is_empty()
            && self.trees.iter().all(|t| t.n_features() == self.n_features && t.is_well_formed())
    }
}

/// Per-sample weights from the class weighting scheme
pub fn sample_weights(labels: &[Label], scheme: ClassWeight) -> Vec<f64> {
    match scheme {
        ClassWeight::Uniform => vec![1.0; labels.len()],
        ClassWeight::Balanced => {
            let mut counts = [0usize; CLASS_COUNT];
            for label in labels {
                counts[label.index()] += 1;
            }
            let n = labels.len() as f64;
            let class_weight: Vec<f64> = counts
                .iter()
                .map(|&c| if c == 0 { 0.0 } else { n / (CLASS_COUNT as f64 * c as f64) })
                .collect();
            labels.iter().map(|l| class_weight[l.index()]).collect()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// ON when x0 >= 50, x1 is noise
    fn toy_data() -> (Array2<f64>, Vec<Label>) {
        let n = 120;
        let mut data = Array2::<f64>::zeros((n, 2));
        let mut labels = Vec::with_capacity(n);
        for i in 0..n {
            let x0 = (i * 37 % 100) as f64;
            data[[i, 0]] = x0;
            data[[i, 1]] = (i * 11 % 7) as f64;
            labels.push(if x0 >= 50.0 { Label::On } else { Label::Off });
        }
        (data, labels)
    }

    #[test]
    fn test_fit_learns_threshold() {
        let (data, labels) = toy_data();
        let forest = RandomForest::fit(data.view(), &labels, &ForestConfig::quick()).unwrap();

        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&[10.0, 3.0]).unwrap().label, Label::Off);
        assert_eq!(forest.predict(&[90.0, 3.0]).unwrap().label, Label::On);
    }

    #[test]
    fn test_confidence_bounds() {
        let (data, labels) = toy_data();
        let forest = RandomForest::fit(data.view(), &labels, &ForestConfig::quick()).unwrap();

        for x0 in (0..100).step_by(5) {
            let p = forest.predict(&[x0 as f64, 2.0]).unwrap();
            assert!(p.confidence >= 0.5 && p.confidence <= 1.0, "confidence {}", p.confidence);
            assert!((p.probabilities[0] + p.probabilities[1] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let (data, labels) = toy_data();
        let config = ForestConfig::quick();
        let a = RandomForest::fit(data.view(), &labels, &config).unwrap();
        let b = RandomForest::fit(data.view(), &labels, &config).unwrap();

        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        assert_eq!(a.feature_importances(), b.feature_importances());
    }

    #[test]
    fn test_importances_favor_signal() {
        let (data, labels) = toy_data();
        let forest = RandomForest::fit(data.view(), &labels, &ForestConfig::quick()).unwrap();
        let importances = forest.feature_importances();

        assert_eq!(importances.len(), 2);
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_tie_resolves_off() {
        let p = Prediction::from_probabilities([0.5, 0.5]);
        assert_eq!(p.label, Label::Off);
        assert_eq!(p.confidence, 0.5);
    }

    #[test]
    fn test_wrong_feature_count_rejected() {
        let (data, labels) = toy_data();
        let forest = RandomForest::fit(data.view(), &labels, &ForestConfig::quick()).unwrap();
        assert!(matches!(forest.predict(&[1.0]), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_balanced_weights() {
        let labels = vec![Label::On, Label::On, Label::On, Label::Off];
        let w = sample_weights(&labels, ClassWeight::Balanced);
        // 4 / (2 * 3) and 4 / (2 * 1)
        assert!((w[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((w[3] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_rejected() {
        let data = Array2::<f64>::zeros((0, 2));
        let err = RandomForest::fit(data.view(), &[], &ForestConfig::quick()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData(_)));
    }
}
