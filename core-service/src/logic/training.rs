//! Training Pipeline
//!
//! Dataset → rule labels → feature layout → imputed matrix → forest.
//! The final forest is fitted on every row; cross-validation only
//! estimates its accuracy.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::logic::dataset::{Dataset, STORED_TARGET_COLUMNS};
use crate::logic::error::{EngineError, EngineResult};
use crate::logic::features::{FeatureLayout, FeatureMatrix, LayoutInfo};
use crate::logic::model::artifact::top_features;
use crate::logic::model::{
    cross_validate, CvReport, ForestConfig, ModelInfo, Prediction, RandomForest, TargetDistribution,
    TrainedModel, DEFAULT_FOLDS,
};
use crate::logic::observation::Observation;
use crate::logic::rules::{label_with_path, Label, LabelPath};

const TOP_FEATURES_STORED: usize = 10;
const TOP_FEATURES_LOGGED: usize = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub forest: ForestConfig,
    pub folds: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            folds: DEFAULT_FOLDS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: TrainedModel,
    pub cv: CvReport,
    /// Rule label per dataset row
    pub labels: Vec<Label>,
    pub scenarios: Vec<ScenarioResult>,
}

pub fn train(dataset: &Dataset, config: &TrainingConfig) -> EngineResult<TrainingOutcome> {
    if dataset.is_empty() {
        return Err(EngineError::InsufficientData("dataset has no rows".to_string()));
    }
    log_stored_targets(dataset);

    // 1. Ground-truth labels
    let mut labels = Vec::with_capacity(dataset.len());
    let mut fallback_labels = 0usize;
    for row in &dataset.rows {
        let (label, path) = label_with_path(row);
        if path == LabelPath::Fallback {
            fallback_labels += 1;
        }
        labels.push(label);
    }
    let lights_on = labels.iter().filter(|l| l.is_on()).count();
    let lights_off = labels.len() - lights_on;
    log::info!(
        "Smart target distribution: ON={} ({:.1}%), OFF={} ({:.1}%)",
        lights_on,
        100.0 * lights_on as f64 / labels.len() as f64,
        lights_off,
        100.0 * lights_off as f64 / labels.len() as f64
    );
    if fallback_labels > 0 {
        log::warn!("{} rows had no hour and were labeled with the fixed night window", fallback_labels);
    }
    if lights_on == 0 || lights_off == 0 {
        log::warn!("Only one class present; the model will always predict it");
    }

    // 2. Features
    let layout = FeatureLayout::from_columns(&dataset.columns);
    if layout.is_empty() {
        return Err(EngineError::InsufficientData("no usable feature columns".to_string()));
    }
    log::info!("Selected {} features (layout {:08x})", layout.len(), layout.layout_hash());
    log::debug!("Layout: {:?}", LayoutInfo::from(&layout));
    let matrix = FeatureMatrix::from_observations(&dataset.rows, &layout);

    // 3. Fit on everything, then estimate with k-fold
    log::info!(
        "Training forest: {} trees, {} samples, {} features",
        config.forest.n_estimators,
        matrix.n_samples(),
        matrix.n_features()
    );
    let forest = RandomForest::fit(matrix.data.view(), &labels, &config.forest)?;
    log::info!(
        "Forest fitted: avg depth {:.1}, {} nodes",
        forest.avg_depth(),
        forest.total_nodes()
    );

    log::info!("Performance estimation ({}-fold CV)...", config.folds);
    let cv = cross_validate(matrix.data.view(), &labels, &config.forest, config.folds)?;
    log::info!("Cross-validation accuracy: {}", cv);

    // 4. Importances
    let importances = forest.feature_importances();
    let ranked = top_features(&layout, &importances, TOP_FEATURES_LOGGED);
    for (rank, entry) in ranked.iter().enumerate() {
        log::info!("  {:2}. {:25} {:.4}", rank + 1, entry.feature, entry.importance);
    }

    let info = ModelInfo {
        training_samples: dataset.len(),
        features_used: layout.len(),
        feature_names: layout.names().to_vec(),
        target_distribution: TargetDistribution { lights_on, lights_off },
        cv_accuracy: cv.mean,
        cv_accuracy_percentage: cv.mean * 100.0,
        cv_margin: cv.margin(),
        cv_fold_scores: cv.fold_scores.clone(),
        top_features: ranked.into_iter().take(TOP_FEATURES_STORED).collect(),
        fallback_labels,
        layout_hash: layout.layout_hash(),
        n_estimators: forest.n_trees(),
        trained_at: Utc::now(),
    };
    let model = TrainedModel::new(forest, layout, info)?;

    // 5. Sanity scenarios
    let scenarios = evaluate_scenarios(&model)?;
    for s in &scenarios {
        log::info!(
            "Scenario: {} -> Light {} ({:.1}% confidence, rules say {})",
            s.description,
            s.prediction.label.status(),
            s.prediction.confidence * 100.0,
            s.expected.status()
        );
    }

    Ok(TrainingOutcome { model, cv, labels, scenarios })
}

fn log_stored_targets(dataset: &Dataset) {
    for column in STORED_TARGET_COLUMNS {
        if dataset.has_column(column) {
            log::info!("Stored target {}: {:?}", column, dataset.value_counts(column));
        }
    }
}

// ============================================================================
// REFERENCE SCENARIOS
// ============================================================================

#[derive(Debug, Clone)]
pub struct Scenario {
    pub description: &'static str,
    pub observation: Observation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub description: &'static str,
    /// What the labeling rules assign
    pub expected: Label,
    pub prediction: Prediction,
}

/// Three hand-written situations checked after every fit
pub fn reference_scenarios() -> Vec<Scenario> {
    let common = |hour: f64, month: f64, rest: Vec<(&'static str, f64)>| {
        let mut pairs = vec![
            ("hour", hour),
            ("month", month),
            ("power_consumption_watts", 150.0),
            ("voltage_volts", 220.0),
            ("current_amperes", 0.68),
        ];
        pairs.extend(rest);
        Observation::from_pairs(pairs)
    };

    vec![
        Scenario {
            description: "Sunny summer afternoon (2 PM, June)",
            observation: common(14.0, 6.0, vec![
                ("temperature_final", 25.0), ("humidity", 50.0), ("cloud", 20.0),
                ("wind_speed_kph", 10.0), ("precipitation_mm", 0.0), ("visibility_km", 15.0),
                ("is_night", 0.0), ("day_length_minutes", 840.0), ("weather_severity", 5.0),
                ("is_clear_sky", 1.0), ("natural_light_score", 0.8), ("weather_energy_factor", 1.0),
            ]),
        },
        Scenario {
            description: "Stormy winter night (8 PM, December)",
            observation: common(20.0, 12.0, vec![
                ("temperature_final", 15.0), ("humidity", 85.0), ("cloud", 95.0),
                ("wind_speed_kph", 25.0), ("precipitation_mm", 2.0), ("visibility_km", 3.0),
                ("is_night", 1.0), ("day_length_minutes", 540.0), ("weather_severity", 25.0),
                ("is_clear_sky", 0.0), ("natural_light_score", 0.1), ("weather_energy_factor", 1.3),
            ]),
        },
        Scenario {
            description: "Cloudy spring morning (10 AM, March)",
            observation: common(10.0, 3.0, vec![
                ("temperature_final", 20.0), ("humidity", 70.0), ("cloud", 85.0),
                ("wind_speed_kph", 12.0), ("precipitation_mm", 0.5), ("visibility_km", 6.0),
                ("is_night", 0.0), ("day_length_minutes", 720.0), ("weather_severity", 15.0),
                ("is_clear_sky", 0.0), ("natural_light_score", 0.3), ("weather_energy_factor", 1.1),
            ]),
        },
    ]
}

pub fn evaluate_scenarios(model: &TrainedModel) -> EngineResult<Vec<ScenarioResult>> {
    reference_scenarios()
        .into_iter()
        .map(|s| {
            let (expected, _) = label_with_path(&s.observation);
            let prediction = model.predict(&s.observation)?;
            Ok(ScenarioResult { description: s.description, expected, prediction })
        })
        .collect()
}
