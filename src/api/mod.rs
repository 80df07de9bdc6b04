// src/api/mod.rs
//! HTTP surface of the prediction service.
//!
//! ## Endpoints
//!
//! - `GET /` - Informational page
//! - `GET /health` - Health check
//! - `GET /model` - Loaded model description
//! - `POST /predict` - Predict the quality class of one sample

pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::model::LoadedModel;
use crate::prediction::PredictionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
}

impl AppState {
    pub fn new(model: Arc<LoadedModel>) -> Self {
        Self {
            service: PredictionService::new(model),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home_handler))
        .route("/health", get(handlers::health_handler))
        .route("/model", get(handlers::model_info_handler))
        .route("/predict", post(handlers::predict_handler))
        .with_state(state)
}
