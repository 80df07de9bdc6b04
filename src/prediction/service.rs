// src/prediction/service.rs
use log::{debug, warn};
use serde_json::Value as JsonValue;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::features::{build_feature_vector, InputRecord, FEATURE_ORDER};
use crate::model::LoadedModel;
use crate::prediction::error::PredictionError;
use crate::prediction::normalizer::{normalize, PredictionResult};

/// Request pipeline: parse -> build vector -> classify -> normalize.
///
/// Holds a shared handle on the loaded model; cloning is cheap and every
/// request is independent of the others.
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<LoadedModel>,
}

impl PredictionService {
    pub fn new(model: Arc<LoadedModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    /// Parses a request body into an input record, whatever its content type.
    pub fn parse_record(body: &[u8]) -> Result<InputRecord, PredictionError> {
        let value: JsonValue = serde_json::from_slice(body)
            .map_err(|e| PredictionError::MalformedRequest(e.to_string()))?;
        match value {
            JsonValue::Object(record) => Ok(record),
            other => Err(PredictionError::MalformedRequest(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn predict_record(&self, record: &InputRecord) -> Result<PredictionResult, PredictionError> {
        let features = build_feature_vector(record, &FEATURE_ORDER, self.model.scaler.as_ref())?;
        debug!("Feature vector built: {:?}", features);

        let (class_index, distribution) = self.invoke_model(&features)?;
        Ok(normalize(class_index, distribution.as_deref()))
    }

    pub fn predict_body(&self, body: &[u8]) -> Result<PredictionResult, PredictionError> {
        let record = Self::parse_record(body)?;
        self.predict_record(&record)
    }

    /// Runs the classifier. Errors and panics both become `ModelInvocation`.
    fn invoke_model(&self, features: &[f64]) -> Result<(i64, Option<Vec<f64>>), PredictionError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.model.classifier.classify(features)));
        match outcome {
            Ok(Ok(prediction)) => Ok(prediction),
            Ok(Err(e)) => Err(PredictionError::ModelInvocation(format!("{:#}", e))),
            Err(_) => {
                warn!("Classifier panicked while scoring a request");
                Err(PredictionError::ModelInvocation(
                    "the classifier failed unexpectedly".to_string(),
                ))
            }
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
