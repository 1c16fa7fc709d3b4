//! End-to-end tests over the full router: routing, extraction, error
//! mapping, and the response contract of `/predict_risk`.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use ndarray::Array2;
use tempfile::TempDir;
use tower::ServiceExt;

use heartrisk::app::{create_router, AppState};
use heartrisk::config::Config;
use heartrisk::features::{PatientRecord, FEATURE_COUNT, FEATURE_LAYOUT};
use heartrisk::handlers::predict::PredictResponse;
use heartrisk::model::{BoosterParams, GradientBooster, ModelArtifact, RiskEngine};

/// Thirteen-feature training set where `thalach` (slot 7) separates the
/// classes, mimicking the real data's strongest signal.
fn trained_booster() -> GradientBooster {
    let rows = 40;
    let mut values = Vec::with_capacity(rows * FEATURE_COUNT);
    let mut labels = Vec::with_capacity(rows);
    for i in 0..rows {
        let sick = i % 2 == 0;
        for f in 0..FEATURE_COUNT {
            let v = if f == 7 {
                if sick {
                    120.0 + (i % 5) as f64
                } else {
                    170.0 + (i % 5) as f64
                }
            } else {
                (f + i % 3) as f64
            };
            values.push(v);
        }
        labels.push(if sick { 1.0 } else { 0.0 });
    }
    let features = Array2::from_shape_vec((rows, FEATURE_COUNT), values).unwrap();
    let params = BoosterParams {
        rounds: 20,
        max_depth: 3,
        min_child_weight: 1e-3,
        ..BoosterParams::default()
    };
    GradientBooster::fit(&params, &features, &labels).unwrap()
}

fn test_config(dir: &Path) -> Config {
    Config {
        port: 0,
        model_path: dir.join("model.json"),
        index_path: dir.join("index.html"),
        environment: "test".to_string(),
    }
}

/// State with a freshly trained artifact on disk and the engine loaded
/// from it, the way the server boots.
fn loaded_state(dir: &TempDir) -> AppState {
    let config = test_config(dir.path());
    ModelArtifact::new(trained_booster())
        .save(&config.model_path)
        .unwrap();
    std::fs::write(&config.index_path, "<html><body>HeartRisk</body></html>").unwrap();

    let engine = RiskEngine::load(&config.model_path).unwrap();
    AppState {
        engine: Some(Arc::new(engine)),
        config,
    }
}

/// State after a failed model load: the documented broken-but-serving mode.
fn broken_state(dir: &TempDir) -> AppState {
    AppState {
        engine: None,
        config: test_config(dir.path()),
    }
}

fn sample_body() -> serde_json::Value {
    serde_json::json!({
        "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233,
        "fbs": 1, "restecg": 0, "thalach": 150, "exang": 0,
        "oldpeak": 2.3, "slope": 0, "ca": 0, "thal": 1
    })
}

async fn post_predict(state: AppState, body: &serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict_risk")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn predict_returns_the_full_contract() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_predict(loaded_state(&dir), &sample_body()).await;

    assert_eq!(status, StatusCode::OK);
    let response: PredictResponse = serde_json::from_value(json).unwrap();

    assert!(response.prediction == 0 || response.prediction == 1);
    assert!((0.0..=1.0).contains(&response.risk_probability));
    assert_eq!(
        response.prediction,
        u8::from(response.risk_probability >= 0.5)
    );

    assert_eq!(response.shap_explanation.len(), FEATURE_COUNT);
    for name in FEATURE_LAYOUT {
        assert!(response.shap_explanation.contains_key(*name));
    }
}

#[tokio::test]
async fn attributions_sum_to_the_served_score() {
    let dir = TempDir::new().unwrap();
    let state = loaded_state(&dir);
    let engine = state.engine.clone().unwrap();

    let (status, json) = post_predict(state, &sample_body()).await;
    assert_eq!(status, StatusCode::OK);
    let response: PredictResponse = serde_json::from_value(json).unwrap();

    // Recover the raw score from the served probability and compare it to
    // baseline + attributions computed on the same engine.
    let record: PatientRecord = serde_json::from_value(sample_body()).unwrap();
    let explanation = engine.assess(&record).explanation;

    let served_margin =
        (response.risk_probability / (1.0 - response.risk_probability)).ln();
    let attributed: f64 = response.shap_explanation.values().sum();

    assert!((explanation.baseline + attributed - served_margin).abs() < 1e-8);
}

#[tokio::test]
async fn missing_field_is_a_client_error() {
    let dir = TempDir::new().unwrap();
    let mut body = sample_body();
    body.as_object_mut().unwrap().remove("thal");

    let (status, json) = post_predict(loaded_state(&dir), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("thal"));
}

#[tokio::test]
async fn wrong_typed_field_is_a_client_error() {
    let dir = TempDir::new().unwrap();
    let mut body = sample_body();
    body["age"] = serde_json::json!("sixty-three");

    let (status, _json) = post_predict(loaded_state(&dir), &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn broken_state_predictions_fail_with_a_server_error() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_predict(broken_state(&dir), &sample_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn home_serves_the_static_page() {
    let dir = TempDir::new().unwrap();
    let response = create_router(loaded_state(&dir))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("HeartRisk"));
}

#[tokio::test]
async fn home_without_a_page_is_not_found() {
    let dir = TempDir::new().unwrap();
    let response = create_router(broken_state(&dir))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_model_state() {
    let dir = TempDir::new().unwrap();
    let response = create_router(loaded_state(&dir))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], true);

    let response = create_router(broken_state(&TempDir::new().unwrap()))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["model_loaded"], false);
}
