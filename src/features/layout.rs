//! Feature Layout - Centralized Feature Definition
//!
//! The single source of truth for model input order. The trainer, the
//! persisted artifact, and the request schema all derive from this table,
//! and `layout_hash` is embedded in the artifact so a stale model cannot be
//! served against a reordered schema.
//!
//! Rules: adding, removing, or reordering a feature requires incrementing
//! `FEATURE_VERSION`.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in the exact order they appear in model input vectors
pub const FEATURE_LAYOUT: &[&str] = &[
    "age",      // 0: age in years
    "sex",      // 1: 1 = male, 0 = female
    "cp",       // 2: chest pain type (0-3)
    "trestbps", // 3: resting blood pressure (mm Hg)
    "chol",     // 4: serum cholesterol (mg/dl)
    "fbs",      // 5: fasting blood sugar > 120 mg/dl (1 = true)
    "restecg",  // 6: resting ECG result (0-2)
    "thalach",  // 7: maximum heart rate achieved
    "exang",    // 8: exercise-induced angina (1 = yes)
    "oldpeak",  // 9: ST depression induced by exercise
    "slope",    // 10: slope of the peak exercise ST segment
    "ca",       // 11: major vessels colored by fluoroscopy (0-3)
    "thal",     // 12: thalassemia category (0-3)
];

/// Total number of model input features
pub const FEATURE_COUNT: usize = 13;

/// Label column expected in training data
pub const TARGET_COLUMN: &str = "target";

/// CRC32 over the version byte plus the ordered feature names.
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}

/// Layout metadata carried inside the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Error when a persisted layout doesn't match the one this build expects.
#[derive(Debug, Clone, Error)]
#[error(
    "feature layout mismatch: expected v{expected_version} (hash {expected_hash:08x}), \
     got v{actual_version} (hash {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming layout metadata matches the current layout.
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if version != FEATURE_VERSION || hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: version,
            actual_hash: hash,
        });
    }

    Ok(())
}

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}
