//! Streetlight Trainer - offline model training
//!
//! Reads the processed streetlight CSV, labels it with the lighting rules,
//! fits the random forest and writes the artifacts the server loads.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use streetlight_core::constants::{APP_NAME, APP_VERSION, DEFAULT_MODEL_DIR};
use streetlight_core::logic::dataset::{load_csv, write_labeled_csv};
use streetlight_core::logic::model::{ForestConfig, DEFAULT_FOLDS};
use streetlight_core::logic::training::{train, TrainingConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Processed streetlight dataset (CSV with header)
    #[arg(short, long)]
    dataset: PathBuf,

    /// Output directory for model artifacts
    #[arg(short, long, default_value = DEFAULT_MODEL_DIR)]
    output: PathBuf,

    /// Number of trees
    #[arg(long, default_value_t = 150)]
    trees: usize,

    /// Maximum tree depth (0 = unlimited)
    #[arg(long, default_value_t = 20)]
    max_depth: usize,

    #[arg(long, default_value_t = 10)]
    min_samples_split: usize,

    #[arg(long, default_value_t = 5)]
    min_samples_leaf: usize,

    /// Base RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Cross-validation folds
    #[arg(long, default_value_t = DEFAULT_FOLDS)]
    folds: usize,

    /// Also write the rule-labeled dataset to this CSV
    #[arg(long)]
    export_labeled: Option<PathBuf>,
}

impl Args {
    fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            forest: ForestConfig {
                n_estimators: self.trees,
                max_depth: (self.max_depth > 0).then_some(self.max_depth),
                min_samples_split: self.min_samples_split,
                min_samples_leaf: self.min_samples_leaf,
                seed: self.seed,
                ..ForestConfig::default()
            },
            folds: self.folds,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("{} trainer v{}", APP_NAME, APP_VERSION);

    let dataset = load_csv(&args.dataset)
        .with_context(|| format!("failed to load dataset {}", args.dataset.display()))?;

    let outcome = train(&dataset, &args.training_config()).context("training failed")?;

    if let Some(path) = &args.export_labeled {
        write_labeled_csv(&dataset, &outcome.labels, path)
            .with_context(|| format!("failed to export labeled dataset to {}", path.display()))?;
    }

    outcome
        .model
        .save(&args.output)
        .with_context(|| format!("failed to save model to {}", args.output.display()))?;

    log::info!(
        "Training completed: {} records, {} features, estimated accuracy {:.1}%",
        outcome.model.info.training_samples,
        outcome.model.info.features_used,
        outcome.cv.mean * 100.0
    );
    Ok(())
}
