//! CART Decision Tree
//!
//! Array-based binary tree, Gini impurity, weighted samples.
//! Training and inference both live here; the forest only orchestrates.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::logic::rules::Label;

/// Binary classifier: OFF (0), ON (1)
pub const CLASS_COUNT: usize = 2;

pub type ClassDistribution = [f64; CLASS_COUNT];

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// `value <= threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Normalized weighted class distribution
    Leaf { distribution: ClassDistribution },
}

/// Growth limits resolved for one fit
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
    /// Impurity decrease per feature, normalized to sum 1 (all zero for a stump)
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Grow a tree on `samples` (row indices into `data`, duplicates allowed)
    pub fn fit(
        data: ArrayView2<'_, f64>,
        labels: &[Label],
        sample_weights: &[f64],
        samples: Vec<usize>,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = data.ncols();
        let mut builder = Builder {
            data: data.view(),
            labels,
            weights: sample_weights,
            params,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        builder.grow(samples, 0);

        let Builder { nodes, mut importances, .. } = builder;
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        Self { nodes, n_features, importances }
    }

    /// Leaf distribution reached by `features`
    pub fn predict_proba(&self, features: &[f64]) -> ClassDistribution {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { distribution } => return *distribution,
                TreeNode::Split { feature, threshold, left, right } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, TreeNode::Leaf { .. })).count()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        self.node_depth(0)
    }

    fn node_depth(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + self.node_depth(*left).max(self.node_depth(*right)),
        }
    }

    /// Structural check after deserialization
    pub fn is_well_formed(&self) -> bool {
        !self.nodes.is_empty()
            && self.importances.len() == self.n_features
            && self.nodes.iter().enumerate().all(|(i, node)| match node {
                TreeNode::Split { feature, left, right, .. } => {
                    *feature < self.n_features && *left > i && *right > i
                        && *left < self.nodes.len() && *right < self.nodes.len()
                }
                TreeNode::Leaf { .. } => true,
            })
    }
}

// ============================================================================
// BUILDER
// ============================================================================

struct Builder<'a, 'r> {
    data: ArrayView2<'a, f64>,
    labels: &'a [Label],
    weights: &'a [f64],
    params: &'a TreeParams,
    rng: &'r mut StdRng,
    nodes: Vec<TreeNode>,
    importances: Vec<f64>,
}

struct Split {
    feature: usize,
    threshold: f64,
    /// Weighted child impurity: w_left * gini_left + w_right * gini_right
    child_impurity: f64,
}

impl Builder<'_, '_> {
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let counts = self.weighted_counts(&samples);
        let node_weight: f64 = counts.iter().sum();
        let impurity = gini(&counts);

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        let too_small = samples.len() < self.params.min_samples_split
            || samples.len() < 2 * self.params.min_samples_leaf;

        if !depth_reached && !too_small && impurity > 0.0 {
            if let Some(split) = self.best_split(&samples) {
                let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
                    .iter()
                    .partition(|&&i| self.data[[i, split.feature]] <= split.threshold);

                self.importances[split.feature] += node_weight * impurity - split.child_impurity;

                // Reserve the slot so children always come after their parent
                let id = self.nodes.len();
                self.nodes.push(TreeNode::Leaf { distribution: [0.0; CLASS_COUNT] });
                let left = self.grow(left_samples, depth + 1);
                let right = self.grow(right_samples, depth + 1);
                self.nodes[id] = TreeNode::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
                return id;
            }
        }

        let distribution = normalize(counts);
        self.nodes.push(TreeNode::Leaf { distribution });
        self.nodes.len() - 1
    }

    /// Best split over a random feature subset. Constant features do not
    /// count toward `max_features`.
    fn best_split(&mut self, samples: &[usize]) -> Option<Split> {
        let mut features: Vec<usize> = (0..self.data.ncols()).collect();
        features.shuffle(&mut *self.rng);

        let min_leaf = self.params.min_samples_leaf.max(1);
        let total = self.weighted_counts(samples);
        let mut best: Option<Split> = None;
        let mut visited = 0usize;

        for feature in features {
            if visited >= self.params.max_features {
                break;
            }

            let mut column: Vec<(f64, usize)> = samples
                .iter()
                .map(|&i| (self.data[[i, feature]], i))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (first, last) = (column[0].0, column[column.len() - 1].0);
            if first == last {
                continue;
            }
            visited += 1;

            let mut left = [0.0; CLASS_COUNT];

            for pos in 0..column.len() - 1 {
                let (value, sample) = column[pos];
                left[self.labels[sample].index()] += self.weights[sample];

                let next = column[pos + 1].0;
                let n_left = pos + 1;
                if value == next || n_left < min_leaf || column.len() - n_left < min_leaf {
                    continue;
                }

                let right = [total[0] - left[0], total[1] - left[1]];
                let child_impurity = left.iter().sum::<f64>() * gini(&left)
                    + right.iter().sum::<f64>() * gini(&right);

                if best.as_ref().map_or(true, |b| child_impurity < b.child_impurity) {
                    let mut threshold = (value + next) / 2.0;
                    if threshold == next {
                        threshold = value;
                    }
                    best = Some(Split { feature, threshold, child_impurity });
                }
            }
        }

        best
    }

    fn weighted_counts(&self, samples: &[usize]) -> ClassDistribution {
        let mut counts = [0.0; CLASS_COUNT];
        for &i in samples {
            counts[self.labels[i].index()] += self.weights[i];
        }
        counts
    }
}

/// Gini impurity of (weighted) class counts
pub fn gini(counts: &ClassDistribution) -> f64 {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f64>()
}

fn normalize(counts: ClassDistribution) -> ClassDistribution {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return [1.0 / CLASS_COUNT as f64; CLASS_COUNT];
    }
    [counts[0] / total, counts[1] / total]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams { max_depth: None, min_samples_split: 2, min_samples_leaf: 1, max_features: 2 }
    }

    fn labels(bits: &[u8]) -> Vec<Label> {
        bits.iter().map(|b| Label::from_index(*b as usize)).collect()
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[5.0, 0.0]), 0.0);
        assert!((gini(&[1.0, 1.0]) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_learns_single_threshold() {
        // f0 separates perfectly at 5; f1 is noise
        let data = array![[1.0, 3.0], [2.0, 1.0], [3.0, 2.0], [7.0, 2.0], [8.0, 3.0], [9.0, 1.0]];
        let y = labels(&[0, 0, 0, 1, 1, 1]);
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(data.view(), &y, &[1.0; 6], (0..6).collect(), &params(), &mut rng);

        assert_eq!(tree.predict_proba(&[2.5, 9.0]), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[8.5, 9.0]), [0.0, 1.0]);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.importances(), &[1.0, 0.0]);
        assert!(tree.is_well_formed());
    }

    #[test]
    fn test_fit_from_row_subset_view() {
        // View and weights borrowed for different lifetimes, as in forest fitting
        let full = array![[0.0], [1.0], [2.0], [8.0], [9.0], [10.0], [99.0]];
        let tree = {
            let weights: Vec<f64> = vec![2.0; 6];
            let view = full.slice(ndarray::s![..6, ..]);
            let y = labels(&[0, 0, 0, 1, 1, 1]);
            let mut rng = StdRng::seed_from_u64(3);
            let p = TreeParams { max_features: 1, ..params() };
            DecisionTree::fit(view, &y, &weights, (0..6).collect(), &p, &mut rng)
        };
        assert_eq!(tree.predict_proba(&[1.5]), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[9.5]), [0.0, 1.0]);
    }

    #[test]
    fn test_threshold_is_midpoint() {
        let data = array![[1.0], [3.0]];
        let y = labels(&[0, 1]);
        let mut rng = StdRng::seed_from_u64(1);
        let p = TreeParams { max_features: 1, ..params() };
        let tree = DecisionTree::fit(data.view(), &y, &[1.0, 1.0], vec![0, 1], &p, &mut rng);

        assert_eq!(tree.predict_proba(&[2.0]), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[2.01]), [0.0, 1.0]);
    }

    #[test]
    fn test_min_samples_leaf_blocks_split() {
        let data = array![[1.0], [2.0], [3.0]];
        let y = labels(&[0, 1, 1]);
        let mut rng = StdRng::seed_from_u64(1);
        let p = TreeParams { min_samples_leaf: 2, max_features: 1, ..params() };
        let tree = DecisionTree::fit(data.view(), &y, &[1.0; 3], vec![0, 1, 2], &p, &mut rng);

        assert_eq!(tree.n_nodes(), 1);
        let proba = tree.predict_proba(&[1.0]);
        assert!((proba[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_depth_zero_is_stump() {
        let data = array![[1.0], [9.0]];
        let y = labels(&[0, 1]);
        let mut rng = StdRng::seed_from_u64(1);
        let p = TreeParams { max_depth: Some(0), max_features: 1, ..params() };
        let tree = DecisionTree::fit(data.view(), &y, &[1.0, 3.0], vec![0, 1], &p, &mut rng);

        assert_eq!(tree.n_leaves(), 1);
        // Weighted distribution: 1 vs 3
        assert_eq!(tree.predict_proba(&[1.0]), [0.25, 0.75]);
        assert_eq!(tree.importances(), &[0.0]);
    }

    #[test]
    fn test_serde_roundtrip_keeps_predictions() {
        let data = array![[1.0, 0.0], [2.0, 1.0], [8.0, 0.0], [9.0, 1.0]];
        let y = labels(&[0, 0, 1, 1]);
        let mut rng = StdRng::seed_from_u64(3);
        let tree = DecisionTree::fit(data.view(), &y, &[1.0; 4], (0..4).collect(), &params(), &mut rng);

        let json = serde_json::to_string(&tree).unwrap();
        let back: DecisionTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back.predict_proba(&[1.5, 0.0]), tree.predict_proba(&[1.5, 0.0]));
        assert!(back.is_well_formed());
    }
}
