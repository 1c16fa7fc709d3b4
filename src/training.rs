//! Offline training pipeline: load, split, fit, evaluate, persist.

use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::{self, DatasetError};
use crate::model::artifact::{self, ArtifactError, ModelArtifact};
use crate::model::{BoosterParams, FitError, GradientBooster};

/// Seed for the train/test shuffle. Fixed so repeated runs are identical.
pub const SPLIT_SEED: u64 = 42;

/// Fraction of rows held out for the accuracy report.
pub const TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub data: PathBuf,
    pub output: PathBuf,
    pub seed: u64,
    pub test_fraction: f64,
    pub params: BoosterParams,
}

impl TrainConfig {
    pub fn new(data: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            data: data.into(),
            output: output.into(),
            seed: SPLIT_SEED,
            test_fraction: TEST_FRACTION,
            params: BoosterParams::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Accuracy on the held-out split, in [0, 1].
    pub accuracy: f64,
    pub model_path: PathBuf,
    /// SHA-256 of the written artifact.
    pub checksum: String,
}

pub fn run(config: &TrainConfig) -> Result<TrainReport, TrainError> {
    tracing::info!("Loading data from {}...", config.data.display());
    let full = dataset::load_csv(&config.data)?;
    let (train, test) = dataset::split(&full, config.test_fraction, config.seed)?;

    tracing::info!(
        "Training gradient-boosted classifier on {} rows ({} held out)...",
        train.len(),
        test.len()
    );
    let booster = GradientBooster::fit(&config.params, &train.features, &train.labels)?;

    let predictions: Vec<u8> = (0..test.len())
        .map(|i| booster.predict(test.features.row(i)))
        .collect();
    let accuracy = accuracy(&predictions, &test.labels);
    tracing::info!("Model accuracy: {:.2}%", accuracy * 100.0);

    ModelArtifact::new(booster).save(&config.output)?;
    let checksum = artifact::file_checksum(&config.output)?;
    tracing::info!(
        "Saved model to {} (sha256 {})",
        config.output.display(),
        checksum
    );

    Ok(TrainReport {
        rows: full.len(),
        train_rows: train.len(),
        test_rows: test.len(),
        accuracy,
        model_path: config.output.clone(),
        checksum,
    })
}

/// Fraction of correct hard predictions.
pub fn accuracy(predictions: &[u8], labels: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels.iter())
        .filter(|&(&p, &y)| f64::from(p) == y)
        .count();
    correct as f64 / predictions.len() as f64
}
