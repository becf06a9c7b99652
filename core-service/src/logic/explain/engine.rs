//! Explanation Engine
//!
//! Turns a decision and its inputs into a primary reason plus one detail
//! line per condition (time, weather, precipitation, visibility, temperature).

use crate::logic::observation::{fields, Observation};
use crate::logic::rules::thresholds::{
    AFTERNOON_FROM, CLOUD_CLEAR_BELOW, CLOUD_CLOUDY_BELOW, CLOUD_PARTLY_BELOW, DEFAULT_CLOUD,
    DEFAULT_HOUR, DEFAULT_MONTH, DEFAULT_PRECIPITATION_MM, DEFAULT_TEMPERATURE,
    DEFAULT_VISIBILITY_KM, EVENING_FROM, FIXED_NIGHT, MORNING_AFTER, RAIN_HEAVY_ABOVE,
    RAIN_LIGHT_ABOVE, REASON_CLOUD_ABOVE, REASON_RAIN_MM_ABOVE, REASON_VISIBILITY_BELOW,
    SAVING_CLOUD_BELOW, SAVING_DAYLIGHT_FROM, SAVING_DAYLIGHT_TO, SAVING_VISIBILITY_ABOVE,
    TEMP_COLD_BELOW, TEMP_FREEZING_BELOW, TEMP_MODERATE_BELOW, VISIBILITY_MODERATE_BELOW,
    VISIBILITY_POOR_BELOW,
};
use crate::logic::rules::Label;
use super::types::{Conditions, Detail, DetailCategory, Explanation};

impl Conditions {
    pub fn from_observation(observation: &Observation) -> Self {
        Self {
            hour: observation.get_or(fields::HOUR, DEFAULT_HOUR),
            month: observation.get_or(fields::MONTH, DEFAULT_MONTH),
            cloud: observation.get_or(fields::CLOUD, DEFAULT_CLOUD),
            precipitation: observation.get_or(fields::PRECIPITATION_MM, DEFAULT_PRECIPITATION_MM),
            visibility: observation.get_or(fields::VISIBILITY_KM, DEFAULT_VISIBILITY_KM),
            temperature: observation.get_or(fields::TEMPERATURE, DEFAULT_TEMPERATURE),
        }
    }

    fn is_night(&self) -> bool {
        FIXED_NIGHT.contains(self.hour)
    }
}

/// Human-readable reasons for a decision. Never fails.
pub fn explain(observation: &Observation, label: Label, confidence: f64) -> Explanation {
    let conditions = Conditions::from_observation(observation);
    log::trace!("Explaining {} at confidence {:.3}", label, confidence);
    explain_conditions(&conditions, label)
}

pub fn explain_conditions(conditions: &Conditions, label: Label) -> Explanation {
    Explanation {
        primary_reason: primary_reason(conditions, label),
        details: vec![
            time_detail(conditions),
            cloud_detail(conditions.cloud),
            precipitation_detail(conditions.precipitation),
            visibility_detail(conditions.visibility),
            temperature_detail(conditions.temperature),
        ],
    }
}

// ============================================================================
// DETAILS
// ============================================================================

fn time_detail(c: &Conditions) -> Detail {
    let clock = format!("{:02}:00", c.hour.trunc() as i64);
    let (icon, text) = if c.is_night() {
        ("🌙", format!("Night time ({})", clock))
    } else if c.hour > MORNING_AFTER && c.hour < AFTERNOON_FROM {
        ("🌅", format!("Morning ({})", clock))
    } else if c.hour >= AFTERNOON_FROM && c.hour < EVENING_FROM {
        ("☀️", format!("Afternoon ({})", clock))
    } else {
        ("🌆", format!("Evening ({})", clock))
    };
    Detail::new(icon, text, DetailCategory::Time)
}

fn cloud_detail(cloud: f64) -> Detail {
    let (icon, text) = if cloud < CLOUD_CLEAR_BELOW {
        ("☀️", "Clear sky")
    } else if cloud < CLOUD_PARTLY_BELOW {
        ("🌤️", "Partly cloudy")
    } else if cloud < CLOUD_CLOUDY_BELOW {
        ("☁️", "Cloudy")
    } else {
        ("🌫️", "Heavy clouds")
    };
    Detail::new(icon, format!("{} ({}% clouds)", text, cloud), DetailCategory::Weather)
}

fn precipitation_detail(mm: f64) -> Detail {
    if mm > RAIN_HEAVY_ABOVE {
        Detail::new("🌧️", format!("Heavy rain ({}mm)", mm), DetailCategory::Precipitation)
    } else if mm > RAIN_LIGHT_ABOVE {
        Detail::new("🌦️", format!("Light rain ({}mm)", mm), DetailCategory::Precipitation)
    } else if mm > 0.0 {
        Detail::new("💧", format!("Drizzle ({}mm)", mm), DetailCategory::Precipitation)
    } else {
        Detail::new("✅", "No precipitation", DetailCategory::Precipitation)
    }
}

fn visibility_detail(km: f64) -> Detail {
    let (icon, text) = if km < VISIBILITY_POOR_BELOW {
        ("🌫️", "Poor visibility")
    } else if km < VISIBILITY_MODERATE_BELOW {
        ("👁️", "Moderate visibility")
    } else {
        ("🔭", "Good visibility")
    };
    Detail::new(icon, format!("{} ({}km)", text, km), DetailCategory::Visibility)
}

fn temperature_detail(celsius: f64) -> Detail {
    let (icon, text) = if celsius < TEMP_FREEZING_BELOW {
        ("❄️", "Freezing")
    } else if celsius < TEMP_COLD_BELOW {
        ("🥶", "Cold")
    } else if celsius < TEMP_MODERATE_BELOW {
        ("😊", "Moderate")
    } else {
        ("🔥", "Warm")
    };
    Detail::new(icon, format!("{} ({}°C)", text, celsius), DetailCategory::Temperature)
}

// ============================================================================
// PRIMARY REASON
// ============================================================================

fn primary_reason(c: &Conditions, label: Label) -> String {
    match label {
        Label::On => {
            let reason = if c.is_night() {
                "Night time lighting essential"
            } else if c.cloud > REASON_CLOUD_ABOVE {
                "Heavy cloud coverage requires illumination"
            } else if c.precipitation > REASON_RAIN_MM_ABOVE {
                "Rainy conditions need enhanced visibility"
            } else if c.visibility < REASON_VISIBILITY_BELOW {
                "Poor visibility requires safety lighting"
            } else {
                "Safety and visibility requirements"
            };
            format!("🔦 {}", reason)
        }
        Label::Off => {
            let mut reasons = Vec::new();
            if c.hour >= SAVING_DAYLIGHT_FROM && c.hour <= SAVING_DAYLIGHT_TO {
                reasons.push("daylight hours");
            }
            if c.cloud < SAVING_CLOUD_BELOW {
                reasons.push("clear weather conditions");
            }
            if c.precipitation == 0.0 {
                reasons.push("no precipitation");
            }
            if c.visibility > SAVING_VISIBILITY_ABOVE {
                reasons.push("good visibility");
            }

            if reasons.is_empty() {
                "✅ Conditions allow energy optimization".to_string()
            } else {
                format!("💡 Energy saving mode activated - {}", reasons.join(", "))
            }
        }
    }
}
