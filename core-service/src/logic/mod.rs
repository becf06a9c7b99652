//! Logic Module - Decision Engine
//!
//! ## Architecture
//! - `rules/` - Ground-truth labeling (training only) + shared thresholds
//! - `features/` - Feature layout, vectors, training matrix
//! - `model/` - Random forest, cross-validation, artifacts, swappable handle
//! - `explain/` - Human-readable reasons
//! - `dataset/` - CSV input and labeled export

pub mod error;
pub mod observation;

pub mod rules;
pub mod features;
pub mod model;
pub mod explain;
pub mod savings;
pub mod dataset;

pub mod decision;
pub mod training;
