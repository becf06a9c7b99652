//! Energy Savings Estimator

use serde::{Deserialize, Serialize};

use crate::logic::rules::Label;

/// Hours per day a light could be switched off
pub const SAVING_HOURS_PER_DAY: f64 = 12.0;
pub const DAYS_PER_MONTH: f64 = 30.0;
/// kg CO2 per watt-hour avoided
pub const CO2_KG_PER_WH: f64 = 0.0005;

/// Watt-hours saved over each horizon, plus kg CO2 per hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EnergySavings {
    pub hourly: f64,
    pub daily: f64,
    pub monthly: f64,
    pub co2: f64,
}

/// Savings are only counted when the light stays off
pub fn estimate(label: Label, power_watts: f64) -> EnergySavings {
    if label.is_on() {
        return EnergySavings::default();
    }
    let hourly = power_watts;
    let daily = hourly * SAVING_HOURS_PER_DAY;
    EnergySavings {
        hourly,
        daily,
        monthly: daily * DAYS_PER_MONTH,
        co2: round4(hourly * CO2_KG_PER_WH),
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
