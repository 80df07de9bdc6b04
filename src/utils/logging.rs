// src/utils/logging.rs - Per-request logging for the prediction endpoint
use log::{info, warn};
use std::time::Instant;
use uuid::Uuid;

use crate::prediction::{PredictionError, PredictionResult};

pub struct RequestLogger {
    request_id: Uuid,
    route: &'static str,
    start_time: Instant,
}

impl RequestLogger {
    pub fn start(route: &'static str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            route,
            start_time: Instant::now(),
        }
    }

    pub fn log_success(&self, result: &PredictionResult) {
        let confidence = result
            .confidence
            .map(|c| format!("{:.1}%", c * 100.0))
            .unwrap_or_else(|| "N/A".to_string());
        info!(
            "[{}] 🔮 {} -> {} (class {}, confidence {}) in {:.2}ms",
            self.request_id,
            self.route,
            result.label,
            result.class_index,
            confidence,
            self.start_time.elapsed().as_secs_f64() * 1000.0
        );
    }

    pub fn log_failure(&self, error: &PredictionError) {
        warn!(
            "[{}] ❌ {} rejected ({}): {} in {:.2}ms",
            self.request_id,
            self.route,
            error.kind(),
            error,
            self.start_time.elapsed().as_secs_f64() * 1000.0
        );
    }
}
