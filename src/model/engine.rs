//! Serving facade over a persisted model.
//!
//! Built once at startup, then shared read-only across requests. Nothing
//! here mutates after load, so no locking is needed.

use std::path::Path;

use ndarray::ArrayView1;

use crate::explain::{self, Explanation};
use crate::features::{PatientRecord, FEATURE_LAYOUT};

use super::artifact::{self, ArtifactError, ModelArtifact};
use super::booster::{sigmoid, GradientBooster};

pub struct RiskEngine {
    booster: GradientBooster,
}

/// Outcome of assessing a single record.
#[derive(Debug, Clone)]
pub struct RiskAssessment {
    /// 1 = disease, 0 = healthy
    pub prediction: u8,
    /// Positive-class probability
    pub probability: f64,
    pub explanation: Explanation,
}

impl RiskEngine {
    /// Load the persisted artifact and bind the engine to it.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let loaded = ModelArtifact::load(path)?;
        if let Ok(checksum) = artifact::file_checksum(path) {
            tracing::info!(
                "Loaded model from {} ({} trees, sha256 {})",
                path.display(),
                loaded.model.num_trees(),
                checksum
            );
        }
        Ok(Self {
            booster: loaded.model,
        })
    }

    pub fn new(booster: GradientBooster) -> Self {
        Self { booster }
    }

    pub fn booster(&self) -> &GradientBooster {
        &self.booster
    }

    /// Predict and explain one record.
    pub fn assess(&self, record: &PatientRecord) -> RiskAssessment {
        let vector = record.to_vector();
        let attribution = explain::attribute(&self.booster, ArrayView1::from(&vector[..]));
        let probability = sigmoid(attribution.margin);

        RiskAssessment {
            prediction: u8::from(probability >= 0.5),
            probability,
            explanation: Explanation::named(attribution, FEATURE_LAYOUT),
        }
    }
}
