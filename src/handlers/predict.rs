//! Risk prediction handler

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::features::PatientRecord;
use crate::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// 1 = disease, 0 = healthy
    pub prediction: u8,
    /// Positive-class probability
    pub risk_probability: f64,
    /// Per-feature contribution to the raw score. Positive pushes risk
    /// higher, negative pushes it lower.
    pub shap_explanation: BTreeMap<String, f64>,
}

pub async fn predict_risk(
    State(state): State<AppState>,
    payload: Result<Json<PatientRecord>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    // A schema mismatch is rejected here, before any model code runs.
    let Json(record) = payload?;

    let engine = state.engine.as_ref().ok_or(AppError::ModelUnavailable)?;
    let assessment = engine.assess(&record);

    Ok(Json(PredictResponse {
        prediction: assessment.prediction,
        risk_probability: assessment.probability,
        shap_explanation: assessment.explanation.to_map(),
    }))
}
