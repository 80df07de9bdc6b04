// src/model/boosting.rs
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{
    argmax, check_input, check_scores, softmax, Classifier, ProbabilisticClassifier,
};

/// Node of a flattened regression tree. Node 0 is the root.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    /// Samples with `x[feature] < threshold` go to `left`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Children must point forward so that evaluation always terminates.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            bail!("Tree has no nodes");
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Leaf { value } = node {
                if !value.is_finite() {
                    bail!("Leaf {} has a non-finite value", index);
                }
            }
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= n_features {
                    bail!("Node {} splits on feature {} of {}", index, feature, n_features);
                }
                if !threshold.is_finite() {
                    bail!("Node {} has a non-finite threshold", index);
                }
                for child in [left, right] {
                    if *child <= index || *child >= self.nodes.len() {
                        bail!("Node {} has an invalid child index {}", index, child);
                    }
                }
            }
        }
        Ok(())
    }

    /// Largest absolute leaf value, bounding what the tree adds to a margin.
    pub fn max_abs_leaf(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                TreeNode::Leaf { value } => Some(value.abs()),
                TreeNode::Split { .. } => None,
            })
            .fold(0.0, f64::max)
    }

    pub fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Multiclass gradient-boosted trees with a softmax objective.
///
/// Every boosting round holds one tree per class; a class margin is
/// `base_score` plus the leaf values of its trees.
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    n_features: usize,
    base_score: f64,
    rounds: Vec<Vec<RegressionTree>>,
    classes: Vec<i64>,
}

impl GradientBoostedTrees {
    pub fn new(
        n_features: usize,
        base_score: f64,
        rounds: Vec<Vec<RegressionTree>>,
        classes: Vec<i64>,
    ) -> Result<Self> {
        if classes.len() < 2 {
            bail!("Boosted model needs at least 2 classes, got {}", classes.len());
        }
        if rounds.is_empty() {
            bail!("Boosted model has no boosting rounds");
        }
        if !base_score.is_finite() {
            bail!("Boosted model has a non-finite base score");
        }
        for (round_index, round) in rounds.iter().enumerate() {
            if round.len() != classes.len() {
                bail!(
                    "Boosting round {} has {} trees, expected one per class ({})",
                    round_index,
                    round.len(),
                    classes.len()
                );
            }
            for (class_position, tree) in round.iter().enumerate() {
                tree.validate(n_features).with_context(|| {
                    format!(
                        "Invalid tree for class position {} in round {}",
                        class_position, round_index
                    )
                })?;
            }
        }

        // Worst-case margin per class must stay finite for any input.
        for class_position in 0..classes.len() {
            let bound = rounds
                .iter()
                .map(|round| round[class_position].max_abs_leaf())
                .fold(base_score.abs(), |acc, v| acc + v);
            if !bound.is_finite() {
                bail!(
                    "Margins for class position {} can overflow (leaf values too large)",
                    class_position
                );
            }
        }

        Ok(Self {
            n_features,
            base_score,
            rounds,
            classes,
        })
    }

    pub fn margins(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_input(features, self.n_features)?;
        let mut margins = vec![self.base_score; self.classes.len()];
        for round in &self.rounds {
            for (margin, tree) in margins.iter_mut().zip(round) {
                *margin += tree.leaf_value(features);
            }
        }
        check_scores(&margins)?;
        Ok(margins)
    }
}

impl Classifier for GradientBoostedTrees {
    fn name(&self) -> &str {
        "XGBClassifier"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, features: &[f64]) -> Result<i64> {
        let margins = self.margins(features)?;
        let best = argmax(&margins).context("Boosted model produced no margins")?;
        Ok(self.classes[best])
    }
}

impl ProbabilisticClassifier for GradientBoostedTrees {
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        Ok(softmax(&self.margins(features)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_classes;

    fn stump(feature: usize, threshold: f64, below: f64, above: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: below },
                TreeNode::Leaf { value: above },
            ],
        }
    }

    fn leaf(value: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![TreeNode::Leaf { value }],
        }
    }

    // Low alcohol (feature 1) -> Mauvais, high -> Bon, neutral otherwise.
    fn toy_model() -> GradientBoostedTrees {
        GradientBoostedTrees::new(
            2,
            0.5,
            vec![
                vec![stump(1, 9.0, 1.0, -1.0), leaf(0.25), stump(1, 12.0, -1.0, 1.0)],
                vec![leaf(0.0), leaf(0.25), leaf(0.0)],
            ],
            default_classes(),
        )
        .unwrap()
    }

    #[test]
    fn test_tree_routes_on_threshold() {
        let tree = stump(0, 1.0, 10.0, 20.0);
        assert_eq!(tree.leaf_value(&[0.5]), 10.0);
        assert_eq!(tree.leaf_value(&[1.0]), 20.0);
    }

    #[test]
    fn test_predict_follows_margins() {
        let model = toy_model();
        assert_eq!(model.predict(&[0.0, 8.0]).unwrap(), 0);
        assert_eq!(model.predict(&[0.0, 10.0]).unwrap(), 1);
        assert_eq!(model.predict(&[0.0, 13.0]).unwrap(), 2);
    }

    #[test]
    fn test_margins_include_base_score() {
        let margins = toy_model().margins(&[0.0, 10.0]).unwrap();
        assert_eq!(margins, vec![-0.5, 1.0, -0.5]);
    }

    #[test]
    fn test_distribution_is_normalized() {
        let proba = toy_model().predict_proba(&[0.0, 13.0]).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(argmax(&proba), Some(2));
    }

    #[test]
    fn test_backward_child_is_rejected() {
        let tree = RegressionTree {
            nodes: vec![
                TreeNode::Leaf { value: 0.0 },
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                },
            ],
        };
        assert!(tree.validate(1).is_err());
    }

    #[test]
    fn test_round_must_have_one_tree_per_class() {
        let result = GradientBoostedTrees::new(1, 0.0, vec![vec![leaf(0.0)]], default_classes());
        assert!(result.is_err());
    }

    #[test]
    fn test_extreme_leaves_are_rejected_at_load() {
        let result = GradientBoostedTrees::new(
            1,
            0.5,
            vec![
                vec![stump(0, 0.0, 1e308, 0.0), leaf(0.0), leaf(0.0)],
                vec![leaf(1e308), leaf(0.0), leaf(0.0)],
            ],
            default_classes(),
        );
        assert!(result.is_err());

        let tree = stump(0, 0.0, f64::INFINITY, 0.0);
        assert!(tree.validate(1).is_err());
        assert_eq!(stump(0, 0.0, -3.0, 2.0).max_abs_leaf(), 3.0);
    }

    #[test]
    fn test_nodes_deserialize_untagged() {
        let tree: RegressionTree = serde_json::from_str(
            r#"{"nodes": [{"feature": 0, "threshold": 1.5, "left": 1, "right": 2}, {"value": -0.3}, {"value": 0.4}]}"#,
        )
        .unwrap();
        assert_eq!(tree, stump(0, 1.5, -0.3, 0.4));
    }
}
