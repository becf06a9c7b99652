use serde::{Deserialize, Serialize};

/// Detail category; serialized as the wire `type` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailCategory {
    Time,
    /// Cloud cover
    Weather,
    Precipitation,
    Visibility,
    Temperature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub icon: String,
    pub text: String,
    #[serde(rename = "type")]
    pub category: DetailCategory,
}

impl Detail {
    pub fn new(icon: &str, text: impl Into<String>, category: DetailCategory) -> Self {
        Self {
            icon: icon.to_string(),
            text: text.into(),
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub primary_reason: String,
    /// Always five entries: time, weather, precipitation, visibility, temperature
    pub details: Vec<Detail>,
}

/// Conditions the explanation is built from, echoed in the decision.
/// Absent fields take the "clear daytime" defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub hour: f64,
    pub month: f64,
    pub cloud: f64,
    pub precipitation: f64,
    pub visibility: f64,
    pub temperature: f64,
}
