//! Features Module - Feature Projection
//!
//! Tách việc chiếu Observation thành vector khỏi classifier.
//! Same layout at training and inference, enforced by the layout hash.

pub mod layout;
pub mod vector;
pub mod matrix;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FeatureLayout, LayoutInfo, EXCLUDED_COLUMNS, LABEL_COLUMN};
pub use vector::{build, FeatureVector, MISSING_FEATURE_VALUE};
pub use matrix::FeatureMatrix;
