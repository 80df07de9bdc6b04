// src/api/tests.rs
use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::api::{create_router, AppState};
use crate::features::{default_record, FEATURE_COUNT};
use crate::model::{
    check_input, Classifier, ClassifierHandle, LinearModel, LoadedModel, LogisticRegression,
    ProbabilisticClassifier,
};

/// Always answers "Moyen" with a 0.82 top probability.
struct ReferenceClassifier;

impl Classifier for ReferenceClassifier {
    fn name(&self) -> &str {
        "ReferenceClassifier"
    }
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }
    fn classes(&self) -> &[i64] {
        &[0, 1, 2]
    }
    fn predict(&self, features: &[f64]) -> Result<i64> {
        check_input(features, FEATURE_COUNT)?;
        Ok(1)
    }
}

impl ProbabilisticClassifier for ReferenceClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_input(features, FEATURE_COUNT)?;
        Ok(vec![0.10, 0.82, 0.08])
    }
}

fn create_test_app(handle: ClassifierHandle) -> Router {
    let model = LoadedModel::new("XGBClassifier", None, handle);
    create_router(AppState::new(Arc::new(model)))
}

fn reference_app() -> Router {
    create_test_app(ClassifierHandle::WithConfidence(Box::new(ReferenceClassifier)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.oneshot(request).await.expect("test");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("test");
    let json = serde_json::from_slice(&body).unwrap_or(JsonValue::Null);
    (status, json)
}

fn post_predict(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .expect("test")
}

#[tokio::test]
async fn test_health_reports_model_type() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("test");
    let (status, json) = send(reference_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"status": "healthy", "model_loaded": true, "model_type": "XGBClassifier"})
    );
}

#[tokio::test]
async fn test_home_page_is_html() {
    let request = Request::builder().uri("/").body(Body::empty()).expect("test");
    let response = reference_app().oneshot(request).await.expect("test");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("test");
    let text = String::from_utf8(body.to_vec()).expect("test");
    assert!(text.contains("Juice Quality Prediction API"));
}

#[tokio::test]
async fn test_predict_reference_sample() {
    let body = json!({
        "fixed_acidity": 7.4,
        "volatile_acidity": 0.7,
        "citric_acid": 0.0,
        "residual_sugar": 1.9,
        "chlorides": 0.076,
        "free_sulfur_dioxide": 11,
        "total_sulfur_dioxide": 34,
        "density": 0.9978,
        "pH": 3.51,
        "sulphates": 0.56,
        "alcohol": 9.4
    });
    let (status, json) = send(reference_app(), post_predict(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"success": true, "prediction": {"label": "Moyen", "raw": 1}, "confidence": 0.82})
    );
}

#[tokio::test]
async fn test_predict_missing_alcohol() {
    let mut record = default_record();
    record.remove("alcohol");
    let body = serde_json::to_string(&record).expect("test");
    let (status, json) = send(reference_app(), post_predict(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], json!(false));
    assert!(json["error"].as_str().expect("test").contains("alcohol"));
}

#[tokio::test]
async fn test_predict_non_numeric_value() {
    let mut record = default_record();
    record.insert("pH".to_string(), json!("acide"));
    let body = serde_json::to_string(&record).expect("test");
    let (status, json) = send(reference_app(), post_predict(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], json!(false));
    assert!(json["error"].as_str().expect("test").contains("pH"));
}

#[tokio::test]
async fn test_predict_malformed_body() {
    let (status, json) = send(reference_app(), post_predict("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], json!(false));

    let (status, _) = send(reference_app(), post_predict("[7.4, 0.7]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_without_content_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from(serde_json::to_string(&default_record()).expect("test")))
        .expect("test");
    let (status, json) = send(reference_app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prediction"]["label"], json!("Moyen"));
}

#[tokio::test]
async fn test_predict_infinite_value_is_structured_failure() {
    let mut record = default_record();
    record.insert("density".to_string(), json!("Infinity"));
    let body = serde_json::to_string(&record).expect("test");
    let (status, json) = send(reference_app(), post_predict(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], json!(false));
}

#[tokio::test]
async fn test_predict_point_only_model_returns_null_confidence() {
    let app = create_test_app(ClassifierHandle::PointOnly(Box::new(ReferenceClassifier)));
    let body = serde_json::to_string(&default_record()).expect("test");
    let (status, json) = send(app, post_predict(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["confidence"], JsonValue::Null);
    assert_eq!(json["prediction"]["raw"], json!(1));
}

#[tokio::test]
async fn test_predict_is_idempotent() {
    let app = reference_app();
    let body = serde_json::to_string(&default_record()).expect("test");
    let (_, first) = send(app.clone(), post_predict(body.clone())).await;
    let (_, second) = send(app, post_predict(body)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_model_info() {
    let request = Request::builder()
        .uri("/model")
        .body(Body::empty())
        .expect("test");
    let (status, json) = send(reference_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["model_type"], json!("XGBClassifier"));
    assert_eq!(json["classifier"], json!("ReferenceClassifier"));
    assert_eq!(json["supports_confidence"], json!(true));
    assert_eq!(json["has_scaler"], json!(false));
    assert_eq!(json["feature_names"].as_array().expect("test").len(), FEATURE_COUNT);
}

#[tokio::test]
async fn test_get_predict_is_not_allowed() {
    let request = Request::builder()
        .uri("/predict")
        .body(Body::empty())
        .expect("test");
    let response = reference_app().oneshot(request).await.expect("test");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_predict_score_overflow_is_structured_failure() {
    let mut coef = vec![vec![0.0; FEATURE_COUNT]; 3];
    coef[0][0] = 2.0;
    let linear = LinearModel::new(coef, vec![0.0; 3], vec![0, 1, 2]).expect("test");
    let app = create_test_app(ClassifierHandle::WithConfidence(Box::new(
        LogisticRegression::new(linear),
    )));

    let mut record = default_record();
    record.insert("fixed_acidity".to_string(), json!(1e308));
    let body = serde_json::to_string(&record).expect("test");
    let (status, json) = send(app, post_predict(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], json!(false));
    assert!(json["error"].as_str().expect("test").contains("overflow"));
}
