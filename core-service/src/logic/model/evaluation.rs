//! Cross-Validation
//!
//! Stratified k-fold accuracy (no shuffling). The fold allocation follows
//! the usual stratified scheme: samples are sorted by class, dealt
//! round-robin into folds to get per-fold class counts, and each class's
//! samples are then assigned to folds in dataset order.

use ndarray::{ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};
use crate::logic::rules::Label;
use super::config::ForestConfig;
use super::forest::RandomForest;
use super::tree::CLASS_COUNT;

pub const DEFAULT_FOLDS: usize = 5;

/// Accuracy summary: report as `mean ± 2·std`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvReport {
    pub fold_scores: Vec<f64>,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
}

impl CvReport {
    pub fn from_scores(fold_scores: Vec<f64>) -> Self {
        let n = fold_scores.len().max(1) as f64;
        let mean = fold_scores.iter().sum::<f64>() / n;
        let variance = fold_scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Self { fold_scores, mean, std: variance.sqrt() }
    }

    /// Half-width of the reported interval
    pub fn margin(&self) -> f64 {
        2.0 * self.std
    }
}

impl std::fmt::Display for CvReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} (+/- {:.3})", self.mean, self.margin())
    }
}

/// Test indices for each of `k` stratified folds
pub fn stratified_folds(labels: &[Label], k: usize) -> EngineResult<Vec<Vec<usize>>> {
    if k < 2 {
        return Err(EngineError::InsufficientData(format!("need at least 2 folds, got {}", k)));
    }
    if labels.len() < k {
        return Err(EngineError::InsufficientData(format!(
            "cannot split {} samples into {} folds", labels.len(), k
        )));
    }

    let mut class_counts = [0usize; CLASS_COUNT];
    for label in labels {
        class_counts[label.index()] += 1;
    }
    if class_counts.iter().all(|&c| c < k) {
        return Err(EngineError::InsufficientData(format!(
            "n_splits={} cannot be greater than the number of members in each class", k
        )));
    }
    for (class, &count) in class_counts.iter().enumerate() {
        if count > 0 && count < k {
            log::warn!(
                "Least populated class ({}) has only {} members, fewer than n_splits={}",
                Label::from_index(class), count, k
            );
        }
    }

    // Per-fold class allocation: deal the class-sorted labels round-robin
    let mut sorted: Vec<usize> = labels.iter().map(Label::index).collect();
    sorted.sort_unstable();
    let mut allocation = vec![[0usize; CLASS_COUNT]; k];
    for (pos, &class) in sorted.iter().enumerate() {
        allocation[pos % k][class] += 1;
    }

    let mut folds = vec![Vec::new(); k];
    let mut next_slot = [0usize; CLASS_COUNT];
    let fold_sequence: Vec<Vec<usize>> = (0..CLASS_COUNT)
        .map(|class| (0..k).flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][class])).collect())
        .collect();

    for (sample, label) in labels.iter().enumerate() {
        let class = label.index();
        let fold = fold_sequence[class][next_slot[class]];
        next_slot[class] += 1;
        folds[fold].push(sample);
    }

    Ok(folds)
}

/// k-fold accuracy of a forest fitted with `config` on each training split
pub fn cross_validate(
    data: ArrayView2<'_, f64>,
    labels: &[Label],
    config: &ForestConfig,
    k: usize,
) -> EngineResult<CvReport> {
    let folds = stratified_folds(labels, k)?;
    let mut scores = Vec::with_capacity(k);

    for (fold_index, test) in folds.iter().enumerate() {
        let mut in_test = vec![false; labels.len()];
        test.iter().for_each(|&i| in_test[i] = true);
        let train: Vec<usize> = (0..labels.len()).filter(|&i| !in_test[i]).collect();

        let train_data = data.select(Axis(0), &train);
        let train_labels: Vec<Label> = train.iter().map(|&i| labels[i]).collect();
        let forest = RandomForest::fit(train_data.view(), &train_labels, config)?;

        let test_data = data.select(Axis(0), test);
        let predicted = forest.predict_rows(test_data.view())?;
        let correct = predicted.iter().zip(test).filter(|&(p, &i)| *p == labels[i]).count();
        let accuracy = correct as f64 / test.len() as f64;

        log::debug!("Fold {}/{}: accuracy {:.4} ({} test samples)", fold_index + 1, k, accuracy, test.len());
        scores.push(accuracy);
    }

    Ok(CvReport::from_scores(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn labels(bits: &[u8]) -> Vec<Label> {
        bits.iter().map(|b| Label::from_index(*b as usize)).collect()
    }

    #[test]
    fn test_report_statistics() {
        let report = CvReport::from_scores(vec![1.0, 0.8, 0.9, 0.9, 0.9]);
        assert!((report.mean - 0.9).abs() < 1e-12);
        // population variance = (0.01 + 0.01) / 5
        assert!((report.std - (0.004f64).sqrt()).abs() < 1e-12);
        assert!((report.margin() - 2.0 * report.std).abs() < 1e-12);
        assert_eq!(report.to_string(), "0.900 (+/- 0.126)");
    }

    #[test]
    fn test_folds_partition_all_samples() {
        let y = labels(&[0, 1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1]);
        let folds = stratified_folds(&y, 3).unwrap();

        let mut all: Vec<usize> = folds.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_folds_are_stratified() {
        // 4 OFF, 8 ON → each of 4 folds gets 1 OFF and 2 ON
        let y = labels(&[0, 1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1]);
        let folds = stratified_folds(&y, 4).unwrap();
        for fold in &folds {
            let on = fold.iter().filter(|&&i| y[i] == Label::On).count();
            assert_eq!(fold.len(), 3);
            assert_eq!(on, 2);
        }
        // Class members are assigned in dataset order
        assert_eq!(folds[0], vec![0, 1, 3]);
    }

    #[test]
    fn test_too_few_samples() {
        let y = labels(&[0, 1, 1]);
        assert!(stratified_folds(&y, 5).is_err());
        assert!(stratified_folds(&y, 1).is_err());
    }

    #[test]
    fn test_cross_validate_separable() {
        // Even rows are ON in 200..207, odd rows OFF in 0..7, whatever the row order
        let n = 100;
        let mut data = Array2::<f64>::zeros((n, 1));
        let mut y = Vec::new();
        for i in 0..n {
            let on = i % 2 == 0;
            let jitter = (i % 7) as f64;
            data[[i, 0]] = if on { 200.0 + jitter } else { jitter };
            y.push(if on { Label::On } else { Label::Off });
        }

        let report = cross_validate(data.view(), &y, &ForestConfig::quick(), DEFAULT_FOLDS).unwrap();
        assert_eq!(report.fold_scores.len(), 5);
        assert_eq!(report.fold_scores, vec![1.0; 5]);
        assert_eq!(report.mean, 1.0);
    }
}
