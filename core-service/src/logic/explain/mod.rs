//! Explanation Generator
//!
//! Turns a decision and its conditions into a primary reason plus five
//! categorized details. Reads thresholds from `rules::thresholds` only.

pub mod types;
pub mod engine;

pub use types::{Conditions, Detail, DetailCategory, Explanation};
pub use engine::{explain, explain_conditions};
