// src/api/types.rs
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::prediction::PredictionResult;

/// Response for `GET /health`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionPayload {
    pub label: String,
    pub raw: i64,
}

/// Successful `POST /predict` body. `confidence` is serialized as `null`
/// when the model has no probability interface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictSuccess {
    pub success: bool,
    pub prediction: PredictionPayload,
    pub confidence: Option<f64>,
}

impl From<PredictionResult> for PredictSuccess {
    fn from(result: PredictionResult) -> Self {
        Self {
            success: true,
            prediction: PredictionPayload {
                label: result.label,
                raw: result.class_index,
            },
            confidence: result.confidence,
        }
    }
}

impl From<PredictSuccess> for PredictionResult {
    fn from(success: PredictSuccess) -> Self {
        Self {
            class_index: success.prediction.raw,
            label: success.prediction.label,
            confidence: success.confidence,
        }
    }
}

/// Failed `POST /predict` body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictFailure {
    pub success: bool,
    pub error: String,
}

impl PredictFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Either shape of a `/predict` response, as seen by a client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PredictOutcome {
    Success(PredictSuccess),
    Failure(PredictFailure),
}

/// Response for `GET /model`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelInfoResponse {
    pub model_type: String,
    pub classifier: String,
    pub feature_names: Vec<String>,
    pub accuracy: Option<f64>,
    pub best_params: Option<JsonValue>,
    pub has_scaler: bool,
    pub supports_confidence: bool,
    pub artifact_sha256: String,
}
