//! Single-artifact pipeline behind the lightweight form endpoint.
//!
//! Takes numeric feature values in its own fixed order and feeds them straight
//! to the bundled model. Its inputs are not interchangeable with the attribute
//! records the main [`Pipeline`](crate::Pipeline) consumes.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use eta_core::schema::SERVER_FEATURES;
use eta_core::{FeatureVector, PipelineError, Result};

use crate::artifacts::{load_error, load_json, RegressionModel, ScalerArtifact};
use crate::{predictor, NumericScaler, Regressor};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedPipeline {
    #[serde(default = "default_features")]
    pub features: Vec<String>,
    #[serde(default)]
    pub scaler: Option<ScalerArtifact>,
    pub model: RegressionModel,
}

fn default_features() -> Vec<String> {
    SERVER_FEATURES.iter().map(|f| f.to_string()).collect()
}

impl CombinedPipeline {
    pub fn new(model: RegressionModel) -> Self {
        Self {
            features: default_features(),
            scaler: None,
            model,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let pipeline: CombinedPipeline = load_json(path)?;
        pipeline.model.validate().map_err(|reason| load_error(path, reason))?;
        pipeline.check_widths().map_err(|reason| load_error(path, reason))?;
        info!(
            path = %path.display(),
            features = pipeline.features.len(),
            scaled = pipeline.scaler.is_some(),
            "loaded combined pipeline"
        );
        Ok(pipeline)
    }

    /// The feature list, the scaler and the model must all agree on width.
    pub fn check_widths(&self) -> std::result::Result<(), String> {
        let width = self.features.len();
        if let Some(scaler) = &self.scaler {
            if scaler.n_features() != width {
                return Err(format!(
                    "scaler expects {} features, feature list has {width}",
                    scaler.n_features()
                ));
            }
        }
        if self.model.n_features() != width {
            return Err(format!(
                "model expects {} features, feature list has {width}",
                self.model.n_features()
            ));
        }
        Ok(())
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Reads each feature from `form` in order; absent fields count as 0.
    pub fn predict_form(&self, form: &HashMap<String, String>) -> Result<f64> {
        let values = self
            .features
            .iter()
            .map(|name| match form.get(name) {
                None => Ok(0.0),
                Some(raw) => raw.trim().parse::<f64>().map_err(|_| PipelineError::Encoding {
                    column: name.clone(),
                    value: raw.clone(),
                    reason: "not a number".to_string(),
                }),
            })
            .collect::<Result<Vec<f64>>>()?;
        self.predict_values(values)
    }

    pub fn predict_values(&self, values: Vec<f64>) -> Result<f64> {
        let values = match &self.scaler {
            Some(scaler) => scaler.transform(&values)?,
            None => values,
        };
        predictor::predict(&self.model, &FeatureVector(values))
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }
}
