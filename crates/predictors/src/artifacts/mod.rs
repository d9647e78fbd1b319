//! JSON-serialized trained artifacts and their loading.
//!
//! Each artifact file is a single JSON document tagged by `kind`. Loading is
//! fatal-by-contract: callers get an `ArtifactLoad` error naming the path and
//! cause, never a defaulted artifact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use eta_core::{PipelineError, Result};

use crate::{CategoricalEncoder, EncodedRow, NumericScaler, Regressor};

mod encoder;
mod model;
mod scaler;

pub use encoder::{OneHotEncoder, UnknownPolicy};
pub use model::{DecisionTree, LinearModel, RandomForest, TreeNode};
pub use scaler::{MinMaxScaler, StandardScaler};

/// Locations of the three artifacts the main pipeline is built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub encoder: PathBuf,
    pub scaler: PathBuf,
    pub model: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            encoder: PathBuf::from("encoder.json"),
            scaler: PathBuf::from("scaler.json"),
            model: PathBuf::from("rf_model.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncoderArtifact {
    OneHot(OneHotEncoder),
}

impl CategoricalEncoder for EncoderArtifact {
    fn output_width(&self) -> usize {
        match self {
            EncoderArtifact::OneHot(e) => e.output_width(),
        }
    }

    fn transform(&self, row: &[(&str, String)]) -> Result<EncodedRow> {
        match self {
            EncoderArtifact::OneHot(e) => e.transform(row),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl NumericScaler for ScalerArtifact {
    fn n_features(&self) -> usize {
        match self {
            ScalerArtifact::Standard(s) => s.n_features(),
            ScalerArtifact::MinMax(s) => s.n_features(),
        }
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        match self {
            ScalerArtifact::Standard(s) => s.transform(values),
            ScalerArtifact::MinMax(s) => s.transform(values),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressionModel {
    Linear(LinearModel),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl RegressionModel {
    /// Structural checks so that scoring can never index out of bounds.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            RegressionModel::Linear(_) => Ok(()),
            RegressionModel::DecisionTree(t) => t.validate(),
            RegressionModel::RandomForest(f) => f.validate(),
        }
    }
}

impl Regressor for RegressionModel {
    fn n_features(&self) -> usize {
        match self {
            RegressionModel::Linear(m) => m.n_features(),
            RegressionModel::DecisionTree(m) => m.n_features(),
            RegressionModel::RandomForest(m) => m.n_features(),
        }
    }

    fn predict_row(&self, features: &[f64]) -> f64 {
        match self {
            RegressionModel::Linear(m) => m.predict_row(features),
            RegressionModel::DecisionTree(m) => m.predict_row(features),
            RegressionModel::RandomForest(m) => m.predict_row(features),
        }
    }

    fn sub_estimators(&self) -> Option<Vec<&dyn Regressor>> {
        match self {
            RegressionModel::RandomForest(m) => m.sub_estimators(),
            _ => None,
        }
    }
}

pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
    serde_json::from_str(&raw).map_err(|e| load_error(path, e))
}

pub(crate) fn load_error(path: &Path, cause: impl ToString) -> PipelineError {
    PipelineError::ArtifactLoad {
        path: path.display().to_string(),
        reason: cause.to_string(),
    }
}

pub fn load_encoder(path: &Path) -> Result<EncoderArtifact> {
    let encoder: EncoderArtifact = load_json(path)?;
    info!(path = %path.display(), width = encoder.output_width(), "loaded encoder");
    Ok(encoder)
}

pub fn load_scaler(path: &Path) -> Result<ScalerArtifact> {
    let scaler: ScalerArtifact = load_json(path)?;
    info!(path = %path.display(), features = scaler.n_features(), "loaded scaler");
    Ok(scaler)
}

pub fn load_model(path: &Path) -> Result<RegressionModel> {
    let model: RegressionModel = load_json(path)?;
    model.validate().map_err(|reason| load_error(path, reason))?;
    info!(
        path = %path.display(),
        features = model.n_features(),
        ensemble = model.sub_estimators().is_some(),
        "loaded model"
    );
    Ok(model)
}
