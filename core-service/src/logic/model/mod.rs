//! Model Module - Streetlight classifier
//!
//! Random forest training and inference, cross-validation, artifacts,
//! and the swappable handle the server reads from.

pub mod config;
pub mod tree;
pub mod forest;
pub mod evaluation;
pub mod artifact;
pub mod handle;

// Re-export common types
pub use config::{ClassWeight, ForestConfig, MaxFeatures};
pub use forest::{Prediction, RandomForest};
pub use evaluation::{cross_validate, stratified_folds, CvReport, DEFAULT_FOLDS};
pub use artifact::{FeatureImportance, ModelInfo, TargetDistribution, TrainedModel};
pub use handle::{HandleStatus, ModelHandle};
