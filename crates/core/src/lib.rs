//! Core types for the delivery-time estimator.

use serde::{Deserialize, Serialize};

pub type Minutes = f64;

/// Fixed-order numeric row fed to the regression model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector(pub Vec<f64>);

impl FeatureVector {
    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Two-sided band around a point estimate. `lower` is clamped at zero, `upper` never is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Interval {
    pub lower: Minutes,
    pub upper: Minutes,
}

impl Interval {
    pub fn width(&self) -> Minutes {
        self.upper - self.lower
    }
}

/// A scored order: clamped point estimate plus its confidence band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Estimate {
    pub minutes: Minutes,
    pub interval: Interval,
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("cannot encode {column}={value:?}: {reason}")]
    Encoding {
        column: String,
        value: String,
        reason: String,
    },
    #[error("model expects {expected} features, got {actual}")]
    Inference { expected: usize, actual: usize },
    #[error("failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },
    #[error("table error: {0}")]
    Table(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn missing<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PipelineError::Schema {
            missing: columns.into_iter().map(Into::into).collect(),
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

pub mod order;
pub mod record;
pub mod schema;
pub mod session;
pub mod stats;
pub mod table;

pub use order::DeliveryOrder;
pub use record::{AttributeRecord, AttributeValue};
pub use session::{HistoryRecord, Scenario};
pub use table::Table;
