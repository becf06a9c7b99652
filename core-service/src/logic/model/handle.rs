//! Model Handle - Swappable shared classifier
//!
//! Holds at most one `Arc<TrainedModel>`. Inference clones the `Arc` under
//! a short read lock and computes without holding it; only `install` /
//! `reload` take the write lock.
//!
//! A startup load failure is recorded once and the handle stays empty
//! until an explicit reload succeeds.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};
use super::artifact::TrainedModel;

#[derive(Debug, Default)]
struct HandleInner {
    model: RwLock<Option<Arc<TrainedModel>>>,
    last_load_error: RwLock<Option<String>>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

/// Cheap to clone; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct ModelHandle {
    inner: Arc<HandleInner>,
}

/// Handle status for `/health` and logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandleStatus {
    pub model_loaded: bool,
    pub cv_accuracy_percentage: Option<f64>,
    pub last_load_error: Option<String>,
    pub inference_count: u64,
    pub avg_latency_ms: f64,
}

impl ModelHandle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_model(model: TrainedModel) -> Self {
        let handle = Self::empty();
        handle.install(model);
        handle
    }

    /// Single load attempt at startup. Failure is logged and kept, not returned.
    pub fn load_at_startup(dir: &Path) -> Self {
        let handle = Self::empty();
        match TrainedModel::load(dir) {
            Ok(model) => {
                handle.install(model);
            }
            Err(e) => {
                log::error!("Error loading model from {}: {}", dir.display(), e);
                *handle.inner.last_load_error.write() = Some(e.to_string());
            }
        }
        handle
    }

    /// Replace the current model with the artifacts in `dir`.
    /// On failure the previous model (if any) stays installed.
    pub fn reload(&self, dir: &Path) -> EngineResult<Arc<TrainedModel>> {
        match TrainedModel::load(dir) {
            Ok(model) => Ok(self.install(model)),
            Err(e) => {
                log::warn!("Reload from {} failed: {}", dir.display(), e);
                *self.inner.last_load_error.write() = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn install(&self, model: TrainedModel) -> Arc<TrainedModel> {
        let model = Arc::new(model);
        *self.inner.model.write() = Some(Arc::clone(&model));
        *self.inner.last_load_error.write() = None;
        log::info!(
            "Model installed: {} features, {} trees",
            model.layout.len(),
            model.forest.n_trees()
        );
        model
    }

    /// Snapshot of the installed model
    pub fn current(&self) -> EngineResult<Arc<TrainedModel>> {
        self.inner.model.read().clone().ok_or(EngineError::ModelUnavailable)
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.model.read().is_some()
    }

    pub fn record_inference(&self, elapsed: Duration) {
        let us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.inner.latency_sum_us.fetch_add(us, Ordering::Relaxed);
        self.inner.inference_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn status(&self) -> HandleStatus {
        let model = self.inner.model.read().clone();
        let sum = self.inner.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inner.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        HandleStatus {
            model_loaded: model.is_some(),
            cv_accuracy_percentage: model.map(|m| m.info.cv_accuracy_percentage),
            last_load_error: self.inner.last_load_error.read().clone(),
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::artifact::{top_features, ModelInfo, TargetDistribution};
    use crate::logic::model::config::ForestConfig;
    use crate::logic::model::forest::RandomForest;
    use crate::logic::features::FeatureLayout;
    use crate::logic::rules::Label;
    use ndarray::Array2;
    use tempfile::tempdir;

    fn model(accuracy: f64) -> TrainedModel {
        let layout = FeatureLayout::from_columns(["hour"]);
        let data = Array2::from_shape_fn((24, 1), |(i, _)| i as f64);
        let labels: Vec<Label> = (0..24)
            .map(|h| if h >= 19 || h <= 6 { Label::On } else { Label::Off })
            .collect();
        let forest = RandomForest::fit(data.view(), &labels, &ForestConfig::quick()).unwrap();
        let info = ModelInfo {
            training_samples: 24,
            features_used: 1,
            feature_names: layout.names().to_vec(),
            target_distribution: TargetDistribution { lights_on: 12, lights_off: 12 },
            cv_accuracy: accuracy / 100.0,
            cv_accuracy_percentage: accuracy,
            cv_margin: 0.0,
            cv_fold_scores: vec![],
            top_features: top_features(&layout, &forest.feature_importances(), 10),
            fallback_labels: 0,
            layout_hash: layout.layout_hash(),
            n_estimators: forest.n_trees(),
            trained_at: chrono::Utc::now(),
        };
        TrainedModel::new(forest, layout, info).unwrap()
    }

    #[test]
    fn test_empty_handle_unavailable() {
        let handle = ModelHandle::empty();
        assert!(!handle.is_loaded());
        assert!(handle.current().unwrap_err().is_model_unavailable());
        assert!(handle.status().cv_accuracy_percentage.is_none());
    }

    #[test]
    fn test_startup_failure_is_recorded() {
        let dir = tempdir().unwrap();
        let handle = ModelHandle::load_at_startup(&dir.path().join("missing"));
        assert!(!handle.is_loaded());
        assert!(handle.status().last_load_error.is_some());
    }

    #[test]
    fn test_startup_loads_saved_model() {
        let dir = tempdir().unwrap();
        model(92.0).save(dir.path()).unwrap();
        let handle = ModelHandle::load_at_startup(dir.path());
        assert!(handle.is_loaded());
        let status = handle.status();
        assert_eq!(status.cv_accuracy_percentage, Some(92.0));
        assert!(status.last_load_error.is_none());
    }

    #[test]
    fn test_reload_swaps_model() {
        let dir = tempdir().unwrap();
        let handle = ModelHandle::with_model(model(90.0));
        let before = handle.current().unwrap();

        model(97.5).save(dir.path()).unwrap();
        handle.reload(dir.path()).unwrap();

        assert_eq!(handle.status().cv_accuracy_percentage, Some(97.5));
        // Earlier snapshots are unaffected
        assert_eq!(before.info.cv_accuracy_percentage, 90.0);
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let dir = tempdir().unwrap();
        let handle = ModelHandle::with_model(model(90.0));
        assert!(handle.reload(dir.path()).is_err());
        assert!(handle.is_loaded());
        assert_eq!(handle.status().cv_accuracy_percentage, Some(90.0));
    }

    #[test]
    fn test_clones_share_slot() {
        let handle = ModelHandle::empty();
        let clone = handle.clone();
        handle.install(model(95.0));
        assert!(clone.is_loaded());
    }

    #[test]
    fn test_latency_stats() {
        let handle = ModelHandle::empty();
        handle.record_inference(Duration::from_micros(1000));
        handle.record_inference(Duration::from_micros(3000));
        let status = handle.status();
        assert_eq!(status.inference_count, 2);
        assert!((status.avg_latency_ms - 2.0).abs() < 1e-9);
    }
}
