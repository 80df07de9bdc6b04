// src/prediction/normalizer.rs
use serde::{Deserialize, Serialize};

/// Readable label for each known class index.
pub const LABEL_MAP: [(i64, &str); 3] = [(0, "Mauvais"), (1, "Moyen"), (2, "Bon")];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub class_index: i64,
    pub label: String,
    /// `None` means the classifier has no probability interface, not zero.
    pub confidence: Option<f64>,
}

/// Maps a class index to its label. Unknown indices fall back to their
/// decimal form.
pub fn label_for(class_index: i64) -> String {
    LABEL_MAP
        .iter()
        .find(|(index, _)| *index == class_index)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| class_index.to_string())
}

/// Highest probability of the distribution. `None` when it is empty or holds
/// a NaN.
pub fn max_probability(distribution: &[f64]) -> Option<f64> {
    if distribution.iter().any(|p| p.is_nan()) {
        return None;
    }
    distribution
        .iter()
        .copied()
        .fold(None, |best: Option<f64>, p| match best {
            Some(b) if b >= p => Some(b),
            _ => Some(p),
        })
}

pub fn normalize(class_index: i64, distribution: Option<&[f64]>) -> PredictionResult {
    PredictionResult {
        class_index,
        label: label_for(class_index),
        confidence: distribution.and_then(max_probability),
    }
}
