//! Decision Pipeline
//!
//! Observation → classifier → explanation + savings. One fresh `Decision`
//! per call; nothing here is persisted.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::error::EngineResult;
use crate::logic::explain::{explain, Conditions, Detail};
use crate::logic::features::build;
use crate::logic::model::ModelHandle;
use crate::logic::observation::{fields, Observation};
use crate::logic::rules::thresholds::DEFAULT_POWER_WATTS;
use crate::logic::rules::Label;
use crate::logic::savings::{estimate, EnergySavings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub label: Label,
    /// Probability of `label`, in [0.5, 1.0]
    pub confidence: f64,
    pub explanation: String,
    pub details: Vec<Detail>,
    pub energy_savings: EnergySavings,
    pub conditions: Conditions,
    pub features_used: usize,
    pub decided_at: DateTime<Utc>,
}

/// Classify one observation with the currently installed model
pub fn decide(handle: &ModelHandle, observation: &Observation) -> EngineResult<Decision> {
    let started = Instant::now();
    let model = handle.current()?;
    observation.require_valid(model.layout.names().iter().map(String::as_str))?;
    observation.require_valid(fields::DECISION_INPUTS)?;

    let vector = build(observation, &model.layout);
    log::trace!("Feature vector: {}", vector.to_log_entry(&model.layout));
    let prediction = model.predict_vector(&vector)?;
    let explanation = explain(observation, prediction.label, prediction.confidence);
    let power_watts = observation.get_or(fields::POWER_WATTS, DEFAULT_POWER_WATTS);

    let decision = Decision {
        label: prediction.label,
        confidence: prediction.confidence,
        explanation: explanation.primary_reason,
        details: explanation.details,
        energy_savings: estimate(prediction.label, power_watts),
        conditions: Conditions::from_observation(observation),
        features_used: model.layout.len(),
        decided_at: Utc::now(),
    };

    handle.record_inference(started.elapsed());
    log::debug!(
        "Decision: {} ({:.1}% confidence) in {:?}",
        decision.label,
        decision.confidence * 100.0,
        started.elapsed()
    );
    Ok(decision)
}
