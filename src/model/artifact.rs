// src/model/artifact.rs
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::features::{StandardScaler, FEATURE_COUNT, FEATURE_ORDER};
use crate::model::{
    default_classes, ClassifierHandle, GradientBoostedTrees, LinearModel, LinearSvc,
    LogisticRegression, RegressionTree,
};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LinearParams {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BoostingParams {
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    /// One entry per boosting round, each with one tree per class.
    pub trees: Vec<Vec<RegressionTree>>,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

fn default_base_score() -> f64 {
    0.5
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression(LinearParams),
    LinearSvc(LinearParams),
    GradientBoosting(BoostingParams),
}

/// On-disk description of a trained model.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ModelArtifact {
    pub model_type: String,
    #[serde(default)]
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub best_params: Option<JsonValue>,
    /// `None` when the classifier does its own scaling (or needs none).
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub classifier: ClassifierSpec,
}

/// Immutable model state shared by every request for the process lifetime.
pub struct LoadedModel {
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub accuracy: Option<f64>,
    pub best_params: Option<JsonValue>,
    pub scaler: Option<StandardScaler>,
    pub classifier: ClassifierHandle,
    pub artifact_sha256: String,
}

impl LoadedModel {
    /// Wraps an already-built classifier, mostly for embedding and tests.
    pub fn new(
        model_type: &str,
        scaler: Option<StandardScaler>,
        classifier: ClassifierHandle,
    ) -> Self {
        Self {
            model_type: model_type.to_string(),
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            accuracy: None,
            best_params: None,
            scaler,
            classifier,
            artifact_sha256: String::new(),
        }
    }

    pub fn from_artifact(artifact: ModelArtifact, artifact_sha256: String) -> Result<Self> {
        let feature_names = if artifact.feature_names.is_empty() {
            warn!("Artifact does not list feature names, assuming the standard feature order");
            FEATURE_ORDER.iter().map(|s| s.to_string()).collect()
        } else {
            if artifact.feature_names != FEATURE_ORDER {
                bail!(
                    "Artifact feature names {:?} do not match the expected order {:?}",
                    artifact.feature_names,
                    FEATURE_ORDER
                );
            }
            artifact.feature_names
        };

        if let Some(scaler) = &artifact.scaler {
            scaler
                .validate(FEATURE_COUNT)
                .context("Artifact scaler is invalid")?;
        }

        let classifier = build_classifier(artifact.classifier)?;
        if classifier.n_features() != FEATURE_COUNT {
            bail!(
                "Classifier expects {} features, the service supplies {}",
                classifier.n_features(),
                FEATURE_COUNT
            );
        }

        Ok(Self {
            model_type: artifact.model_type,
            feature_names,
            accuracy: artifact.accuracy,
            best_params: artifact.best_params,
            scaler: artifact.scaler,
            classifier,
            artifact_sha256,
        })
    }

    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn log_summary(&self) {
        info!("🧠 Model type: {}", self.model_type);
        info!("   Classifier: {}", self.classifier.name());
        info!(
            "   Confidence: {}",
            if self.classifier.supports_confidence() {
                "available (predict_proba)"
            } else {
                "not available (point predictions only)"
            }
        );
        info!(
            "   External scaler: {}",
            if self.has_scaler() { "yes" } else { "no" }
        );
        if let Some(accuracy) = self.accuracy {
            info!("   Test accuracy: {:.1}%", accuracy * 100.0);
        }
        if !self.artifact_sha256.is_empty() {
            info!("   Artifact sha256: {}", self.artifact_sha256);
        }
    }
}

fn build_classifier(spec: ClassifierSpec) -> Result<ClassifierHandle> {
    Ok(match spec {
        ClassifierSpec::LogisticRegression(p) => {
            let inner = LinearModel::new(p.coef, p.intercept, p.classes)
                .context("Invalid logistic regression parameters")?;
            ClassifierHandle::WithConfidence(Box::new(LogisticRegression::new(inner)))
        }
        ClassifierSpec::LinearSvc(p) => {
            let inner = LinearModel::new(p.coef, p.intercept, p.classes)
                .context("Invalid linear SVC parameters")?;
            ClassifierHandle::PointOnly(Box::new(LinearSvc::new(inner)))
        }
        ClassifierSpec::GradientBoosting(p) => {
            let model = GradientBoostedTrees::new(FEATURE_COUNT, p.base_score, p.trees, p.classes)
                .context("Invalid gradient boosting parameters")?;
            ClassifierHandle::WithConfidence(Box::new(model))
        }
    })
}

/// Parses artifact bytes, recording their digest.
pub fn load_model_from_bytes(bytes: &[u8]) -> Result<LoadedModel> {
    let digest = hex::encode(Sha256::digest(bytes));
    debug!("Artifact digest computed: {}", digest);
    let artifact: ModelArtifact =
        serde_json::from_slice(bytes).context("Failed to parse model artifact JSON")?;
    LoadedModel::from_artifact(artifact, digest)
}

/// Loads the artifact at `path`. Called once at process start.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<LoadedModel> {
    let path = path.as_ref();
    info!("📦 Loading model artifact from {}", path.display());
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
    let model = load_model_from_bytes(&bytes)
        .with_context(|| format!("Failed to load model artifact {}", path.display()))?;
    info!("✅ Model loaded successfully");
    Ok(model)
}
