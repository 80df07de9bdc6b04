// src/model/linear.rs
use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2, ArrayView1};

use crate::model::{
    argmax, check_input, check_scores, softmax, Classifier, ProbabilisticClassifier,
};

/// One weight row and one intercept per class.
#[derive(Debug, Clone)]
pub struct LinearModel {
    coef: Array2<f64>,
    intercept: Array1<f64>,
    classes: Vec<i64>,
}

impl LinearModel {
    pub fn new(coef: Vec<Vec<f64>>, intercept: Vec<f64>, classes: Vec<i64>) -> Result<Self> {
        let n_classes = coef.len();
        if n_classes < 2 {
            bail!("Linear model needs at least 2 weight rows, got {}", n_classes);
        }
        let n_features = coef[0].len();
        if coef.iter().any(|row| row.len() != n_features) {
            bail!("Linear model weight rows have inconsistent lengths");
        }
        if intercept.len() != n_classes {
            bail!(
                "Linear model has {} weight rows but {} intercepts",
                n_classes,
                intercept.len()
            );
        }
        if classes.len() != n_classes {
            bail!(
                "Linear model has {} weight rows but {} classes",
                n_classes,
                classes.len()
            );
        }

        let flat: Vec<f64> = coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((n_classes, n_features), flat)
            .context("Failed to shape linear model weights")?;

        Ok(Self {
            coef,
            intercept: Array1::from(intercept),
            classes,
        })
    }

    pub fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Per-class score `coef · x + intercept`.
    pub fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_input(features, self.n_features())?;
        let scores = (self.coef.dot(&ArrayView1::from(features)) + &self.intercept).to_vec();
        check_scores(&scores)?;
        Ok(scores)
    }

    pub fn predict(&self, features: &[f64]) -> Result<i64> {
        let scores = self.decision_function(features)?;
        let best = argmax(&scores).context("Linear model produced no scores")?;
        Ok(self.classes[best])
    }
}

/// Multinomial logistic regression.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    inner: LinearModel,
}

impl LogisticRegression {
    pub fn new(inner: LinearModel) -> Self {
        Self { inner }
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "LogisticRegression"
    }

    fn n_features(&self) -> usize {
        self.inner.n_features()
    }

    fn classes(&self) -> &[i64] {
        self.inner.classes()
    }

    fn predict(&self, features: &[f64]) -> Result<i64> {
        self.inner.predict(features)
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        Ok(softmax(&self.inner.decision_function(features)?))
    }
}

/// One-vs-rest linear SVM. No probability interface.
#[derive(Debug, Clone)]
pub struct LinearSvc {
    inner: LinearModel,
}

impl LinearSvc {
    pub fn new(inner: LinearModel) -> Self {
        Self { inner }
    }
}

impl Classifier for LinearSvc {
    fn name(&self) -> &str {
        "LinearSVC"
    }

    fn n_features(&self) -> usize {
        self.inner.n_features()
    }

    fn classes(&self) -> &[i64] {
        self.inner.classes()
    }

    fn predict(&self, features: &[f64]) -> Result<i64> {
        self.inner.predict(features)
    }
}
