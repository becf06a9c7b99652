//! Lighting Thresholds
//!
//! Every cutoff used by the labeling rules and by the explanation layer.
//! KHÔNG chứa logic - chỉ constants.
//!
//! The labeling rules and the explanation wording were tuned separately and
//! do not agree on every cutoff (rain: 0.3 mm vs 0.5 mm). Both values are
//! kept here under distinct names so neither drifts unnoticed.

// ============================================================================
// SEASONAL NIGHT WINDOWS (hour >= start OR hour <= end)
// ============================================================================

pub const WINTER_MONTHS: [u32; 3] = [12, 1, 2];
pub const SUMMER_MONTHS: [u32; 3] = [6, 7, 8];

pub const WINTER_NIGHT: NightWindow = NightWindow { start: 17.0, end: 7.0 };
pub const SUMMER_NIGHT: NightWindow = NightWindow { start: 21.0, end: 5.0 };
pub const SHOULDER_NIGHT: NightWindow = NightWindow { start: 19.0, end: 6.0 };

/// Season-blind window used by the labeling fallback and by the
/// explanation's time-of-day bucket
pub const FIXED_NIGHT: NightWindow = NightWindow { start: 19.0, end: 6.0 };

/// Wrap-around night interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightWindow {
    pub start: f64,
    pub end: f64,
}

impl NightWindow {
    pub fn contains(&self, hour: f64) -> bool {
        hour >= self.start || hour <= self.end
    }
}

// ============================================================================
// LABELING (poor-condition overrides during daytime)
// ============================================================================

/// Below this visibility (km) lights are needed
pub const LABEL_VISIBILITY_KM_MIN: f64 = 8.0;

/// Above this cloud coverage (%) lights are needed
pub const LABEL_CLOUD_MAX: f64 = 85.0;

/// Above this precipitation (mm) lights are needed
pub const LABEL_RAIN_MM_MAX: f64 = 0.3;

// ============================================================================
// DEFAULTS ("clear daytime" assumption)
// ============================================================================

pub const DEFAULT_MONTH: f64 = 6.0;
pub const DEFAULT_CLOUD: f64 = 0.0;
pub const DEFAULT_PRECIPITATION_MM: f64 = 0.0;
pub const DEFAULT_VISIBILITY_KM: f64 = 10.0;

/// Hour assumed by the labeling fallback and the explanation layer
pub const DEFAULT_HOUR: f64 = 12.0;
pub const DEFAULT_TEMPERATURE: f64 = 25.0;
pub const DEFAULT_POWER_WATTS: f64 = 150.0;

// ============================================================================
// EXPLANATION BUCKETS (first match wins, top to bottom)
// ============================================================================

/// Morning is `MORNING_AFTER < hour < AFTERNOON_FROM`
pub const MORNING_AFTER: f64 = 6.0;
pub const AFTERNOON_FROM: f64 = 12.0;
pub const EVENING_FROM: f64 = 17.0;

pub const CLOUD_CLEAR_BELOW: f64 = 20.0;
pub const CLOUD_PARTLY_BELOW: f64 = 50.0;
pub const CLOUD_CLOUDY_BELOW: f64 = 80.0;

pub const RAIN_HEAVY_ABOVE: f64 = 1.0;
pub const RAIN_LIGHT_ABOVE: f64 = 0.3;

pub const VISIBILITY_POOR_BELOW: f64 = 5.0;
pub const VISIBILITY_MODERATE_BELOW: f64 = 10.0;

pub const TEMP_FREEZING_BELOW: f64 = 0.0;
pub const TEMP_COLD_BELOW: f64 = 10.0;
pub const TEMP_MODERATE_BELOW: f64 = 25.0;

// ============================================================================
// EXPLANATION PRIMARY REASON
// ============================================================================

/// Lights ON: heavy cloud reason when cloud exceeds this
pub const REASON_CLOUD_ABOVE: f64 = 80.0;

/// Lights ON: rain reason when precipitation exceeds this (labeling uses 0.3)
pub const REASON_RAIN_MM_ABOVE: f64 = 0.5;

/// Lights ON: poor visibility reason below this
pub const REASON_VISIBILITY_BELOW: f64 = 5.0;

/// Lights OFF: daylight hours, inclusive
pub const SAVING_DAYLIGHT_FROM: f64 = 7.0;
pub const SAVING_DAYLIGHT_TO: f64 = 18.0;

/// Lights OFF: clear weather below this cloud coverage
pub const SAVING_CLOUD_BELOW: f64 = 50.0;

/// Lights OFF: good visibility above this
pub const SAVING_VISIBILITY_ABOVE: f64 = 8.0;
