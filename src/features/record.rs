//! Patient intake schema.

use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;

/// A single patient record, field-for-field the Cleveland dataset columns.
///
/// All thirteen fields are required. JSON types are enforced strictly: a
/// missing field or a wrong-typed value fails deserialization before any
/// model code runs. No range checks beyond type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years
    pub age: i64,
    /// 1 = male, 0 = female
    pub sex: i64,
    /// Chest pain type (0-3)
    pub cp: i64,
    /// Resting blood pressure (mm Hg)
    pub trestbps: i64,
    /// Serum cholesterol (mg/dl)
    pub chol: i64,
    /// Fasting blood sugar > 120 mg/dl (1 = true)
    pub fbs: i64,
    /// Resting ECG result (0-2)
    pub restecg: i64,
    /// Maximum heart rate achieved
    pub thalach: i64,
    /// Exercise-induced angina (1 = yes)
    pub exang: i64,
    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment
    pub slope: i64,
    /// Number of major vessels colored by fluoroscopy (0-3)
    pub ca: i64,
    /// Thalassemia category (0-3)
    pub thal: i64,
}

impl PatientRecord {
    /// Feature vector in canonical layout order.
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age as f64,
            self.sex as f64,
            self.cp as f64,
            self.trestbps as f64,
            self.chol as f64,
            self.fbs as f64,
            self.restecg as f64,
            self.thalach as f64,
            self.exang as f64,
            self.oldpeak,
            self.slope as f64,
            self.ca as f64,
            self.thal as f64,
        ]
    }
}
