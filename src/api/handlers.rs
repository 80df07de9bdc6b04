// src/api/handlers.rs
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::api::types::{HealthResponse, ModelInfoResponse, PredictFailure, PredictSuccess};
use crate::api::AppState;
use crate::utils::logging::RequestLogger;

const HOME_PAGE: &str = r#"<html>
    <head><title>Juice Quality API</title></head>
    <body>
        <h1>🍊 Juice Quality Prediction API</h1>
        <p>Use <code>POST /predict</code> to get predictions</p>
        <p>Check <code>GET /health</code> for API status</p>
        <p>See <code>GET /model</code> for the loaded model</p>
    </body>
</html>
"#;

pub async fn home_handler() -> Html<&'static str> {
    Html(HOME_PAGE)
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: true,
        model_type: state.service.model().model_type.clone(),
    })
}

/// Always answers with a structured body: 200 on success, 400 on any failure.
pub async fn predict_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let logger = RequestLogger::start("/predict");
    match state.service.predict_body(&body) {
        Ok(result) => {
            logger.log_success(&result);
            (StatusCode::OK, Json(PredictSuccess::from(result))).into_response()
        }
        Err(e) => {
            logger.log_failure(&e);
            (StatusCode::BAD_REQUEST, Json(PredictFailure::new(e.to_string()))).into_response()
        }
    }
}

pub async fn model_info_handler(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let model = state.service.model();
    Json(ModelInfoResponse {
        model_type: model.model_type.clone(),
        classifier: model.classifier.name().to_string(),
        feature_names: model.feature_names.clone(),
        accuracy: model.accuracy,
        best_params: model.best_params.clone(),
        has_scaler: model.has_scaler(),
        supports_confidence: model.classifier.supports_confidence(),
        artifact_sha256: model.artifact_sha256.clone(),
    })
}
