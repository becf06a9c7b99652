//! Model Artifacts
//!
//! A trained model lives in one directory as three JSON files:
//! - `streetlight_forest.json`: the fitted forest
//! - `feature_columns.json`: ordered feature names (the layout)
//! - `model_info.json`: training metadata, served verbatim by `/model-info`

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};
use crate::logic::features::{build, FeatureLayout, FeatureVector};
use crate::logic::observation::Observation;
use super::forest::{Prediction, RandomForest};

pub const FOREST_FILE: &str = "streetlight_forest.json";
pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const MODEL_INFO_FILE: &str = "model_info.json";

// ============================================================================
// METADATA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDistribution {
    pub lights_on: usize,
    pub lights_off: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Training record written next to the forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub training_samples: usize,
    pub features_used: usize,
    pub feature_names: Vec<String>,
    pub target_distribution: TargetDistribution,
    pub cv_accuracy: f64,
    pub cv_accuracy_percentage: f64,
    /// 2 x population std of the fold scores
    pub cv_margin: f64,
    pub cv_fold_scores: Vec<f64>,
    /// Ten most important features, descending
    pub top_features: Vec<FeatureImportance>,
    /// Rows labeled through the fixed-window fallback
    #[serde(default)]
    pub fallback_labels: usize,
    pub layout_hash: u32,
    pub n_estimators: usize,
    pub trained_at: DateTime<Utc>,
}

// ============================================================================
// TRAINED MODEL
// ============================================================================

/// Forest + the layout it was fitted on + metadata. Immutable once built.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub forest: RandomForest,
    pub layout: FeatureLayout,
    pub info: ModelInfo,
}

impl TrainedModel {
    pub fn new(forest: RandomForest, layout: FeatureLayout, info: ModelInfo) -> EngineResult<Self> {
        let model = Self { forest, layout, info };
        model.check_consistency()?;
        Ok(model)
    }

    /// Project the observation onto this model's layout and classify it
    pub fn predict(&self, observation: &Observation) -> EngineResult<Prediction> {
        let vector = build(observation, &self.layout);
        self.predict_vector(&vector)
    }

    pub fn predict_vector(&self, vector: &FeatureVector) -> EngineResult<Prediction> {
        self.layout.validate(vector.layout_hash)?;
        self.forest.predict(vector.as_slice())
    }

    pub fn feature_names(&self) -> &[String] {
        self.layout.names()
    }

    fn check_consistency(&self) -> EngineResult<()> {
        if !self.forest.is_well_formed() {
            return Err(EngineError::Artifact("forest structure is malformed".to_string()));
        }
        if self.forest.n_features() != self.layout.len() {
            return Err(EngineError::Artifact(format!(
                "forest expects {} features but the layout has {}",
                self.forest.n_features(),
                self.layout.len()
            )));
        }
        let hash = self.layout.layout_hash();
        if self.info.layout_hash != hash {
            return Err(EngineError::Artifact(format!(
                "metadata layout hash {:08x} does not match feature columns ({:08x})",
                self.info.layout_hash, hash
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // PERSISTENCE
    // ------------------------------------------------------------------------

    /// Write all three artifacts into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> EngineResult<()> {
        fs::create_dir_all(dir)?;

        fs::write(dir.join(FOREST_FILE), serde_json::to_vec(&self.forest)?)?;
        fs::write(dir.join(FEATURE_COLUMNS_FILE), serde_json::to_vec_pretty(&self.layout)?)?;
        fs::write(dir.join(MODEL_INFO_FILE), serde_json::to_vec_pretty(&self.info)?)?;

        log::info!(
            "Model saved to {} ({} trees, {} features)",
            dir.display(),
            self.forest.n_trees(),
            self.layout.len()
        );
        Ok(())
    }

    /// Read and cross-check the artifacts in `dir`
    pub fn load(dir: &Path) -> EngineResult<Self> {
        for file in [FOREST_FILE, FEATURE_COLUMNS_FILE, MODEL_INFO_FILE] {
            if !dir.join(file).exists() {
                return Err(EngineError::Artifact(format!(
                    "{} not found in {}",
                    file,
                    dir.display()
                )));
            }
        }

        let forest: RandomForest = serde_json::from_slice(&fs::read(dir.join(FOREST_FILE))?)?;
        let layout: FeatureLayout = serde_json::from_slice(&fs::read(dir.join(FEATURE_COLUMNS_FILE))?)?;
        let info: ModelInfo = serde_json::from_slice(&fs::read(dir.join(MODEL_INFO_FILE))?)?;

        let model = Self::new(forest, layout, info)?;
        log::info!(
            "Model loaded from {}: {} samples, {:.1}% CV accuracy",
            dir.display(),
            model.info.training_samples,
            model.info.cv_accuracy_percentage
        );
        Ok(model)
    }
}

/// Top `n` features by importance, descending; ties keep layout order
pub fn top_features(layout: &FeatureLayout, importances: &[f64], n: usize) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = layout
        .names()
        .iter()
        .zip(importances)
        .map(|(name, &importance)| FeatureImportance { feature: name.clone(), importance })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked.truncate(n);
    ranked
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::config::ForestConfig;
    use crate::logic::rules::Label;
    use ndarray::Array2;
    use tempfile::tempdir;

    fn fitted() -> TrainedModel {
        let layout = FeatureLayout::from_columns(["hour", "cloud"]);
        let n = 60;
        let mut data = Array2::<f64>::zeros((n, 2));
        let mut labels = Vec::new();
        for i in 0..n {
            let hour = (i % 24) as f64;
            data[[i, 0]] = hour;
            data[[i, 1]] = (i * 7 % 100) as f64;
            labels.push(if hour >= 19.0 || hour <= 6.0 { Label::On } else { Label::Off });
        }
        let forest = RandomForest::fit(data.view(), &labels, &ForestConfig::quick()).unwrap();
        let info = ModelInfo {
            training_samples: n,
            features_used: layout.len(),
            feature_names: layout.names().to_vec(),
            target_distribution: TargetDistribution { lights_on: 30, lights_off: 30 },
            cv_accuracy: 0.95,
            cv_accuracy_percentage: 95.0,
            cv_margin: 0.02,
            cv_fold_scores: vec![0.95; 5],
            top_features: top_features(&layout, &forest.feature_importances(), 10),
            fallback_labels: 0,
            layout_hash: layout.layout_hash(),
            n_estimators: forest.n_trees(),
            trained_at: Utc::now(),
        };
        TrainedModel::new(forest, layout, info).unwrap()
    }

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models");
        let model = fitted();
        model.save(&path).unwrap();

        assert!(path.join(FOREST_FILE).exists());
        assert!(path.join(FEATURE_COLUMNS_FILE).exists());
        assert!(path.join(MODEL_INFO_FILE).exists());

        let loaded = TrainedModel::load(&path).unwrap();
        assert_eq!(loaded.layout, model.layout);
        assert_eq!(loaded.info, model.info);

        let obs = Observation::from_pairs(vec![("hour", 22.0), ("cloud", 10.0)]);
        assert_eq!(loaded.predict(&obs).unwrap(), model.predict(&obs).unwrap());
    }

    #[test]
    fn test_feature_columns_file_is_name_list() {
        let dir = tempdir().unwrap();
        fitted().save(dir.path()).unwrap();
        let raw: Vec<String> =
            serde_json::from_slice(&fs::read(dir.path().join(FEATURE_COLUMNS_FILE)).unwrap()).unwrap();
        assert_eq!(raw, vec!["hour", "cloud"]);
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = tempdir().unwrap();
        let err = TrainedModel::load(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, EngineError::Artifact(_)));
    }

    #[test]
    fn test_load_rejects_layout_drift() {
        let dir = tempdir().unwrap();
        fitted().save(dir.path()).unwrap();
        fs::write(dir.path().join(FEATURE_COLUMNS_FILE), r#"["hour", "month"]"#).unwrap();

        let err = TrainedModel::load(dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::Artifact(_)));
    }

    #[test]
    fn test_load_rejects_feature_count_mismatch() {
        let dir = tempdir().unwrap();
        fitted().save(dir.path()).unwrap();
        fs::write(dir.path().join(FEATURE_COLUMNS_FILE), r#"["hour"]"#).unwrap();

        assert!(TrainedModel::load(dir.path()).is_err());
    }

    #[test]
    fn test_vector_from_other_layout_rejected() {
        let model = fitted();
        let other = FeatureLayout::from_columns(["cloud", "hour"]);
        let vector = build(&Observation::from_pairs(vec![("hour", 3.0)]), &other);
        assert!(matches!(model.predict_vector(&vector), Err(EngineError::LayoutMismatch { .. })));
    }

    #[test]
    fn test_top_features_sorted() {
        let layout = FeatureLayout::from_columns(["a", "b", "c"]);
        let top = top_features(&layout, &[0.2, 0.5, 0.3], 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].feature, "b");
        assert_eq!(top[1].feature, "c");
    }
}
