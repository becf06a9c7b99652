//! Rule Types
//!
//! Label, Season và đường quyết định của rule engine.

use serde::{Deserialize, Serialize};

use super::thresholds::{NightWindow, SHOULDER_NIGHT, SUMMER_MONTHS, SUMMER_NIGHT, WINTER_MONTHS, WINTER_NIGHT};

// ============================================================================
// LABEL
// ============================================================================

/// Binary lighting target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    /// Lights OFF (0)
    Off,
    /// Lights ON (1)
    On,
}

impl Label {
    pub fn as_u8(&self) -> u8 {
        match self {
            Label::Off => 0,
            Label::On => 1,
        }
    }

    pub fn index(&self) -> usize {
        self.as_u8() as usize
    }

    pub fn from_index(index: usize) -> Self {
        if index == 0 { Label::Off } else { Label::On }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Label::Off => "OFF",
            Label::On => "ON",
        }
    }

    pub fn is_on(&self) -> bool {
        *self == Label::On
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.as_u8()
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Off),
            1 => Ok(Label::On),
            other => Err(format!("invalid label {}", other)),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status())
    }
}

// ============================================================================
// SEASON
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Summer,
    /// Spring and fall share one window
    Shoulder,
}

impl Season {
    /// Non-integral or out-of-range months fall into the shoulder season
    pub fn from_month(month: f64) -> Self {
        let is = |months: &[u32]| months.iter().any(|&m| f64::from(m) == month);
        if is(&WINTER_MONTHS) {
            Season::Winter
        } else if is(&SUMMER_MONTHS) {
            Season::Summer
        } else {
            Season::Shoulder
        }
    }

    pub fn night_window(&self) -> NightWindow {
        match self {
            Season::Winter => WINTER_NIGHT,
            Season::Summer => SUMMER_NIGHT,
            Season::Shoulder => SHOULDER_NIGHT,
        }
    }
}

// ============================================================================
// LABEL PATH
// ============================================================================

/// Which branch produced a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelPath {
    /// Full seasonal + weather rules
    Seasonal,
    /// Observation failed validation, fixed-window rule used
    Fallback,
}
