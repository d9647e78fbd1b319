use serde::{Deserialize, Serialize};

use crate::Regressor;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Regressor for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `features[feature] <= threshold`, else `right`.
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

/// Flattened regression tree; node 0 is the root and children always follow their parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionTree {
    pub n_features: usize,
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature, left, right, ..
            } = node
            {
                if *feature >= self.n_features {
                    return Err(format!("node {idx} splits on feature {feature} of {}", self.n_features));
                }
                for child in [*left, *right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {idx} has out-of-order child {child}"));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Regressor for DecisionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return *value,
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).copied().unwrap_or(f64::NAN);
                    // NaN goes right, as in the training library.
                    idx = if x <= *threshold { *left } else { *right };
                }
                None => return f64::NAN,
            }
        }
    }
}

/// Bagged trees; the prediction is the mean of the trees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.n_features != self.n_features {
                return Err(format!("tree {i} expects {} features, forest {}", tree.n_features, self.n_features));
            }
            tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Regressor for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_row(features)).sum();
        total / self.trees.len() as f64
    }

    fn sub_estimators(&self) -> Option<Vec<&dyn Regressor>> {
        Some(self.trees.iter().map(|t| t as &dyn Regressor).collect())
    }
}
