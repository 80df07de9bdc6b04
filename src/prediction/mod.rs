// src/prediction/mod.rs
pub mod error;
pub mod normalizer;
pub mod service;

// Re-export the request pipeline for a clean API
pub use error::PredictionError;
pub use normalizer::{label_for, normalize, PredictionResult};
pub use service::PredictionService;
