//! Rules Module
//!
//! Deterministic lighting heuristics dùng để sinh nhãn training.
//!
//! ## Structure
//! - `thresholds`: shared cutoff table (labeling + explanation)
//! - `types`: Label, Season, LabelPath
//! - `labeling`: rule engine

pub mod thresholds;
pub mod types;
pub mod labeling;

pub use types::{Label, LabelPath, Season};
pub use labeling::{label, label_with_path, RuleInputs};
