//! Training data loading and splitting.
//!
//! The loader is strict: the header must name the target column and every
//! layout feature, every cell must parse as a number, and labels must be
//! 0/1. Any violation is an error the trainer treats as fatal.

use std::path::Path;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use crate::features::{FEATURE_COUNT, FEATURE_LAYOUT, TARGET_COLUMN};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    BadCell {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: target must be 0 or 1, got '{value}'")]
    BadLabel { row: usize, value: String },
    #[error("row {row} has fewer columns than the header")]
    RaggedRow { row: usize },
    #[error("dataset contains no rows")]
    Empty,
    #[error("dataset has too few rows ({0}) to hold out a test split")]
    TooSmall(usize),
}

/// A labeled feature matrix. Rows align with `labels`.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub features: Array2<f64>,
    pub labels: Vec<f64>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn select(&self, rows: &[usize]) -> TrainingSet {
        let width = self.features.ncols();
        let mut values = Vec::with_capacity(rows.len() * width);
        let mut labels = Vec::with_capacity(rows.len());
        for &i in rows {
            values.extend(self.features.row(i).iter().copied());
            labels.push(self.labels[i]);
        }
        TrainingSet {
            features: Array2::from_shape_vec((rows.len(), width), values)
                .expect("selected rows keep the source width"),
            labels,
        }
    }
}

/// Load a labeled CSV. Columns are located by header name, so column order
/// in the file does not matter.
pub fn load_csv(path: &Path) -> Result<TrainingSet, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let target_col = headers
        .iter()
        .position(|h| h == TARGET_COLUMN)
        .ok_or_else(|| DatasetError::MissingColumn(TARGET_COLUMN.to_string()))?;
    let feature_cols: Vec<usize> = FEATURE_LAYOUT
        .iter()
        .map(|&name| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        })
        .collect::<Result<_, _>>()?;

    let mut values = Vec::new();
    let mut labels = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Header line is row 1.
        let row = index + 2;

        for &col in &feature_cols {
            let cell = record.get(col).ok_or(DatasetError::RaggedRow { row })?;
            let parsed = cell.trim().parse::<f64>().map_err(|_| DatasetError::BadCell {
                row,
                column: headers[col].to_string(),
                value: cell.to_string(),
            })?;
            values.push(parsed);
        }

        let cell = record.get(target_col).ok_or(DatasetError::RaggedRow { row })?;
        let label = cell.trim().parse::<f64>().map_err(|_| DatasetError::BadLabel {
            row,
            value: cell.to_string(),
        })?;
        if label != 0.0 && label != 1.0 {
            return Err(DatasetError::BadLabel {
                row,
                value: cell.to_string(),
            });
        }
        labels.push(label);
    }

    if labels.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(TrainingSet {
        features: Array2::from_shape_vec((labels.len(), FEATURE_COUNT), values)
            .expect("one layout-width row pushed per label"),
        labels,
    })
}

/// Deterministic shuffled split: the first `test_fraction` of the shuffled
/// order is held out, the rest trains.
pub fn split(
    set: &TrainingSet,
    test_fraction: f64,
    seed: u64,
) -> Result<(TrainingSet, TrainingSet), DatasetError> {
    let rows = set.len();
    let test_rows = (rows as f64 * test_fraction).round() as usize;
    if test_rows == 0 || test_rows >= rows {
        return Err(DatasetError::TooSmall(rows));
    }

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(test_rows);
    Ok((set.select(train_idx), set.select(test_idx)))
}
