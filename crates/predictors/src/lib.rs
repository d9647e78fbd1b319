//! Prediction-serving pipeline: feature codec, predictor, confidence estimator, batch scoring.
//!
//! The trained encoder, scaler and regression model are opaque collaborators
//! behind the traits below. JSON-loadable implementations live in [`artifacts`].

use eta_core::{AttributeRecord, Estimate, Result};

pub mod artifacts;
pub mod batch;
pub mod codec;
pub mod combined;
pub mod confidence;
pub mod pipeline;
pub mod predictor;

pub use artifacts::{ArtifactPaths, EncoderArtifact, RegressionModel, ScalerArtifact};
pub use batch::{process_batch, BatchOutcome, BatchSummary};
pub use codec::{encode, encode_batch};
pub use combined::CombinedPipeline;
pub use confidence::{confidence_interval, z_score, DEFAULT_CONFIDENCE_LEVEL};
pub use pipeline::Pipeline;
pub use predictor::predict;

/// Output of a categorical encoder before densification.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedRow {
    Dense(Vec<f64>),
    /// `(index, value)` pairs over a row of `width` zeros.
    Sparse { width: usize, entries: Vec<(usize, f64)> },
}

impl EncodedRow {
    pub fn into_dense(self) -> Vec<f64> {
        match self {
            EncodedRow::Dense(values) => values,
            EncodedRow::Sparse { width, entries } => {
                let mut dense = vec![0.0; width];
                for (idx, value) in entries {
                    if let Some(slot) = dense.get_mut(idx) {
                        *slot = value;
                    }
                }
                dense
            }
        }
    }
}

/// A fitted categorical encoder. Unknown-category policy belongs to the encoder.
pub trait CategoricalEncoder: Send + Sync {
    fn output_width(&self) -> usize;

    /// `row` holds `(column, value)` pairs in training-time column order.
    fn transform(&self, row: &[(&str, String)]) -> Result<EncodedRow>;
}

/// A fitted numeric scaler.
pub trait NumericScaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>>;
}

/// A trained regression model.
pub trait Regressor: Send + Sync {
    fn n_features(&self) -> usize;

    /// Scores one row. Callers check the width first; see [`predict`].
    fn predict_row(&self, features: &[f64]) -> f64;

    /// Individual sub-estimators for ensemble models, `None` otherwise.
    fn sub_estimators(&self) -> Option<Vec<&dyn Regressor>> {
        None
    }
}

/// Turns a raw attribute record into a scored estimate. Scenario tooling
/// depends on this rather than on the concrete pipeline.
pub trait DeliveryEstimator: Send + Sync {
    fn estimate(&self, record: &AttributeRecord) -> Result<Estimate>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use eta_core::schema;

    use crate::artifacts::{DecisionTree, LinearModel, OneHotEncoder, RandomForest, StandardScaler, TreeNode, UnknownPolicy};
    use crate::pipeline::Pipeline;

    pub fn encoder() -> OneHotEncoder {
        let cats = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        OneHotEncoder {
            categories: vec![
                cats(&["Cloudy", "Fog", "Sandstorms", "Stormy", "Sunny", "Windy"]),
                cats(&["High", "Jam", "Low", "Medium"]),
                cats(&["Buffet", "Drinks", "Meal", "Snack"]),
                cats(&["Bicycle", "Electric Bike", "Motorcycle", "Scooter"]),
                cats(&["No", "Yes"]),
                cats(&["Metropolitan", "Semi-Urban", "Urban"]),
            ],
            feature_names: schema::CATEGORICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            handle_unknown: UnknownPolicy::Error,
            sparse_output: true,
        }
    }

    /// Identity scaler over the nine numeric columns.
    pub fn scaler() -> StandardScaler {
        StandardScaler {
            mean: vec![0.0; 9],
            scale: vec![1.0; 9],
        }
    }

    pub const WIDTH: usize = 9 + 23;

    /// Linear model: 2 min per km plus prep time plus 5 min when traffic is Jam.
    pub fn linear() -> LinearModel {
        let mut coefficients = vec![0.0; WIDTH];
        coefficients[4] = 2.0;
        coefficients[5] = 1.0;
        coefficients[9 + 6 + 1] = 5.0;
        LinearModel {
            coefficients,
            intercept: 3.0,
        }
    }

    pub fn constant_tree(value: f64) -> DecisionTree {
        DecisionTree {
            n_features: WIDTH,
            nodes: vec![TreeNode::Leaf { value }],
        }
    }

    pub fn constant_forest(values: &[f64]) -> RandomForest {
        RandomForest {
            n_features: WIDTH,
            trees: values.iter().copied().map(constant_tree).collect(),
        }
    }

    pub fn pipeline_with_linear() -> Pipeline {
        Pipeline::new(Arc::new(encoder()), Arc::new(scaler()), Arc::new(linear()))
    }
}
