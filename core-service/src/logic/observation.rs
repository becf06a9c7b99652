//! Environmental Observation
//!
//! Validated snapshot of sensor/weather readings for one streetlight.
//! KHÔNG chứa logic quyết định - chỉ data và coercion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{EngineError, EngineResult};

// ============================================================================
// WELL-KNOWN FIELDS
// ============================================================================

pub mod fields {
    pub const HOUR: &str = "hour";
    pub const MONTH: &str = "month";
    pub const CLOUD: &str = "cloud";
    pub const PRECIPITATION_MM: &str = "precipitation_mm";
    pub const VISIBILITY_KM: &str = "visibility_km";
    pub const TEMPERATURE: &str = "temperature_final";
    pub const HUMIDITY: &str = "humidity";
    pub const POWER_WATTS: &str = "power_consumption_watts";

    /// Read by the explanation and savings layers regardless of the model layout
    pub const DECISION_INPUTS: [&str; 7] =
        [HOUR, MONTH, CLOUD, PRECIPITATION_MM, VISIBILITY_KM, TEMPERATURE, POWER_WATTS];
}

// ============================================================================
// OBSERVATION
// ============================================================================

/// Immutable mapping of field name to a finite reading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    values: BTreeMap<String, f64>,
    /// Payload fields that did not coerce, with the reason.
    /// Only an error once something reads them.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    rejected: BTreeMap<String, String>,
}

impl Observation {
    /// Build from (name, value) pairs. Non-finite values are treated as
    /// missing cells and dropped.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let values = pairs
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| (k.into(), v))
            .collect();
        Self { values, rejected: BTreeMap::new() }
    }

    /// Parse a request payload.
    ///
    /// Numbers, numeric strings and booleans coerce to `f64`, `null` means
    /// absent. Any other value is kept aside as rejected; see [`Self::require_valid`].
    pub fn from_json(payload: &Value) -> EngineResult<Self> {
        let object = payload
            .as_object()
            .ok_or_else(|| EngineError::InvalidInput("Request body must be a JSON object".to_string()))?;

        let mut values = BTreeMap::new();
        let mut rejected = BTreeMap::new();
        for (name, raw) in object {
            match coerce(name, raw) {
                Ok(Some(v)) => {
                    values.insert(name.clone(), v);
                }
                Ok(None) => {}
                Err(reason) => {
                    rejected.insert(name.clone(), reason);
                }
            }
        }

        Ok(Self { values, rejected })
    }

    /// Fail with the first rejected field among `names`
    pub fn require_valid<'a, I>(&self, names: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            if let Some(reason) = self.rejected.get(name) {
                return Err(EngineError::InvalidInput(reason.clone()));
            }
        }
        Ok(())
    }

    pub fn is_rejected(&self, name: &str) -> bool {
        self.rejected.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy with one field replaced (observations themselves never mutate)
    pub fn with(&self, name: &str, value: f64) -> Self {
        let mut values = self.values.clone();
        let mut rejected = self.rejected.clone();
        rejected.remove(name);
        if value.is_finite() {
            values.insert(name.to_string(), value);
        } else {
            values.remove(name);
        }
        Self { values, rejected }
    }
}

fn coerce(name: &str, raw: &Value) -> Result<Option<f64>, String> {
    let value = match raw {
        Value::Null => return Ok(None),
        Value::Bool(b) => if *b { 1.0 } else { 0.0 },
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("Field '{}' is not representable as a number", name))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("could not convert string to float: '{}' (field '{}')", s, name))?,
        Value::Array(_) | Value::Object(_) => {
            return Err(format!("Field '{}' must be a number", name));
        }
    };

    if !value.is_finite() {
        return Err(format!("Field '{}' must be finite", name));
    }

    Ok(Some(value))
}

// ============================================================================
// TESTS
// ============================================================================
