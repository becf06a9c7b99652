//! Target Labeling Rule Engine
//!
//! CHỈ chứa logic gán nhãn - dùng khi dựng training set.
//! Input: Observation
//! Output: Label (never fails)

use crate::logic::observation::{fields, Observation};

use super::thresholds::{
    DEFAULT_CLOUD, DEFAULT_HOUR, DEFAULT_MONTH, DEFAULT_PRECIPITATION_MM, DEFAULT_VISIBILITY_KM,
    FIXED_NIGHT, LABEL_CLOUD_MAX, LABEL_RAIN_MM_MAX, LABEL_VISIBILITY_KM_MIN,
};
use super::types::{Label, LabelPath, Season};

// ============================================================================
// VALIDATED INPUTS
// ============================================================================

/// Fields the seasonal rules read, with documented defaults applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInputs {
    pub hour: f64,
    pub month: f64,
    pub cloud: f64,
    pub precipitation_mm: f64,
    pub visibility_km: f64,
}

impl RuleInputs {
    /// `hour` is required; everything else falls back to clear daytime
    pub fn validate(observation: &Observation) -> Option<Self> {
        let hour = observation.get(fields::HOUR)?;

        Some(Self {
            hour,
            month: observation.get_or(fields::MONTH, DEFAULT_MONTH),
            cloud: observation.get_or(fields::CLOUD, DEFAULT_CLOUD),
            precipitation_mm: observation.get_or(fields::PRECIPITATION_MM, DEFAULT_PRECIPITATION_MM),
            visibility_km: observation.get_or(fields::VISIBILITY_KM, DEFAULT_VISIBILITY_KM),
        })
    }

    pub fn is_poor_visibility(&self) -> bool {
        self.visibility_km < LABEL_VISIBILITY_KM_MIN
    }

    pub fn is_heavy_cloud(&self) -> bool {
        self.cloud > LABEL_CLOUD_MAX
    }

    pub fn is_rainy(&self) -> bool {
        self.precipitation_mm > LABEL_RAIN_MM_MAX
    }
}

// ============================================================================
// MAIN LABELING FUNCTION
// ============================================================================

/// Ground-truth label for one observation
pub fn label(observation: &Observation) -> Label {
    label_with_path(observation).0
}

/// Label plus the branch that produced it
pub fn label_with_path(observation: &Observation) -> (Label, LabelPath) {
    match RuleInputs::validate(observation) {
        Some(inputs) => (seasonal_label(&inputs), LabelPath::Seasonal),
        None => {
            log::debug!("Labeling fallback: observation has no '{}' field", fields::HOUR);
            (fallback_label(observation), LabelPath::Fallback)
        }
    }
}

/// Seasonal night window first, then the poor-condition overrides
pub fn seasonal_label(inputs: &RuleInputs) -> Label {
    let night = Season::from_month(inputs.month).night_window();

    // Night always wins
    if night.contains(inputs.hour) {
        return Label::On;
    }

    if inputs.is_poor_visibility() || inputs.is_heavy_cloud() || inputs.is_rainy() {
        Label::On
    } else {
        Label::Off
    }
}

/// Fixed 19:00-06:00 window, no season or weather
pub fn fallback_label(observation: &Observation) -> Label {
    let hour = observation.get_or(fields::HOUR, DEFAULT_HOUR);
    if FIXED_NIGHT.contains(hour) {
        Label::On
    } else {
        Label::Off
    }
}

// ============================================================================
// TESTS
// ============================================================================
