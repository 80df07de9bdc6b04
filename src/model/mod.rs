// src/model/mod.rs
//! Classifiers consumed by the prediction pipeline.
//!
//! A classifier is either point-prediction only or point-prediction plus a
//! probability distribution. Which one is decided once, when the artifact is
//! loaded, and carried by [`ClassifierHandle`].

pub mod artifact;
pub mod boosting;
pub mod linear;

use anyhow::{bail, Result};

pub use artifact::{load_model, ClassifierSpec, LoadedModel, ModelArtifact};
pub use boosting::{GradientBoostedTrees, RegressionTree, TreeNode};
pub use linear::{LinearModel, LinearSvc, LogisticRegression};

/// Class indices used when an artifact does not list its own.
pub fn default_classes() -> Vec<i64> {
    vec![0, 1, 2]
}

pub trait Classifier: Send + Sync {
    /// Family name reported by `/health`.
    fn name(&self) -> &str;

    fn n_features(&self) -> usize;

    /// Class index associated with each output column.
    fn classes(&self) -> &[i64];

    fn predict(&self, features: &[f64]) -> Result<i64>;
}

pub trait ProbabilisticClassifier: Classifier {
    /// One probability per entry of `classes()`, summing to 1.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;
}

pub enum ClassifierHandle {
    PointOnly(Box<dyn Classifier>),
    WithConfidence(Box<dyn ProbabilisticClassifier>),
}

impl ClassifierHandle {
    pub fn supports_confidence(&self) -> bool {
        matches!(self, ClassifierHandle::WithConfidence(_))
    }

    pub fn name(&self) -> &str {
        match self {
            ClassifierHandle::PointOnly(c) => c.name(),
            ClassifierHandle::WithConfidence(c) => c.name(),
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            ClassifierHandle::PointOnly(c) => c.n_features(),
            ClassifierHandle::WithConfidence(c) => c.n_features(),
        }
    }

    /// Predicted class index plus the distribution when available.
    pub fn classify(&self, features: &[f64]) -> Result<(i64, Option<Vec<f64>>)> {
        match self {
            ClassifierHandle::PointOnly(c) => Ok((c.predict(features)?, None)),
            ClassifierHandle::WithConfidence(c) => {
                let class_index = c.predict(features)?;
                let distribution = c.predict_proba(features)?;
                check_distribution(&distribution)?;
                Ok((class_index, Some(distribution)))
            }
        }
    }
}

/// Rejects vectors the classifiers cannot score.
pub fn check_input(features: &[f64], n_features: usize) -> Result<()> {
    if features.len() != n_features {
        bail!(
            "X has {} features, but the classifier is expecting {} features as input",
            features.len(),
            n_features
        );
    }
    if let Some(position) = features.iter().position(|v| !v.is_finite()) {
        bail!(
            "Input contains NaN, infinity or a value too large (feature #{})",
            position
        );
    }
    Ok(())
}

/// Rejects scores that overflowed while scoring a finite input.
pub fn check_scores(scores: &[f64]) -> Result<()> {
    if let Some(position) = scores.iter().position(|v| !v.is_finite()) {
        bail!(
            "Numeric overflow while scoring: output #{} is {}",
            position,
            scores[position]
        );
    }
    Ok(())
}

/// Every probability must be finite and within [0, 1].
pub fn check_distribution(distribution: &[f64]) -> Result<()> {
    if let Some(p) = distribution
        .iter()
        .find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0)
    {
        bail!("Classifier returned an invalid probability: {}", p);
    }
    Ok(())
}

/// Position of the largest score. Ties resolve to the first position.
pub fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if b >= *score => {}
            _ => best = Some((i, *score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Numerically stable softmax.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
