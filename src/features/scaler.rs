// src/features/scaler.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Fitted standardization: `(x - mean) / scale`.
///
/// Present for model families that are sensitive to feature scale,
/// absent for tree ensembles. A zero scale is treated as 1.0.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Checks that the fitted parameters match the expected feature count.
    pub fn validate(&self, feature_count: usize) -> Result<()> {
        if self.mean.len() != feature_count || self.scale.len() != feature_count {
            bail!(
                "Scaler was fitted on {} means / {} scales, expected {} features",
                self.mean.len(),
                self.scale.len(),
                feature_count
            );
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            bail!("Scaler parameters contain non-finite values");
        }
        Ok(())
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_standardizes() {
        let scaler = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]);
        assert_eq!(scaler.transform(&[3.0, 0.0]), vec![1.0, -2.0]);
    }

    #[test]
    fn test_zero_scale_is_treated_as_one() {
        let scaler = StandardScaler::new(vec![4.0], vec![0.0]);
        assert_eq!(scaler.transform(&[6.0]), vec![2.0]);
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        let scaler = StandardScaler::new(vec![0.0; 3], vec![1.0; 3]);
        assert!(scaler.validate(3).is_ok());
        assert!(scaler.validate(11).is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let scaler = StandardScaler::new(vec![f64::NAN], vec![1.0]);
        assert!(scaler.validate(1).is_err());
    }
}
