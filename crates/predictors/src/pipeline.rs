use std::sync::Arc;

use tracing::{debug, warn};

use eta_core::schema::NUMERIC_COLUMNS;
use eta_core::{AttributeRecord, Estimate, FeatureVector, Result};

use crate::artifacts::{self, ArtifactPaths};
use crate::{codec, confidence, predictor, CategoricalEncoder, DeliveryEstimator, NumericScaler, Regressor};

/// The three loaded artifacts, shared read-only for the life of the process.
#[derive(Clone)]
pub struct Pipeline {
    encoder: Arc<dyn CategoricalEncoder>,
    scaler: Arc<dyn NumericScaler>,
    model: Arc<dyn Regressor>,
    confidence_level: f64,
}

impl Pipeline {
    pub fn new(
        encoder: Arc<dyn CategoricalEncoder>,
        scaler: Arc<dyn NumericScaler>,
        model: Arc<dyn Regressor>,
    ) -> Self {
        Self {
            encoder,
            scaler,
            model,
            confidence_level: confidence::DEFAULT_CONFIDENCE_LEVEL,
        }
    }

    /// Loads all three artifacts; the first failure aborts the load.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let encoder = artifacts::load_encoder(&paths.encoder)?;
        let scaler = artifacts::load_scaler(&paths.scaler)?;
        let model = artifacts::load_model(&paths.model)?;

        let expected = scaler.n_features() + encoder.output_width();
        if scaler.n_features() != NUMERIC_COLUMNS.len() || model.n_features() != expected {
            // Surfaced per request as an inference error, not refused here.
            warn!(
                scaler_features = scaler.n_features(),
                encoder_width = encoder.output_width(),
                model_features = model.n_features(),
                "artifact widths disagree; predictions will fail"
            );
        }

        Ok(Self::new(Arc::new(encoder), Arc::new(scaler), Arc::new(model)))
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn encoder(&self) -> &dyn CategoricalEncoder {
        self.encoder.as_ref()
    }

    pub fn scaler(&self) -> &dyn NumericScaler {
        self.scaler.as_ref()
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn encode(&self, record: &AttributeRecord) -> Result<FeatureVector> {
        codec::encode(record, self.encoder(), self.scaler())
    }

    /// Unclamped model output for one record.
    pub fn predict(&self, record: &AttributeRecord) -> Result<f64> {
        let features = self.encode(record)?;
        predictor::predict(self.model(), &features)
    }
}

impl DeliveryEstimator for Pipeline {
    fn estimate(&self, record: &AttributeRecord) -> Result<Estimate> {
        let features = self.encode(record)?;
        let raw = predictor::predict(self.model(), &features)?;
        let interval = confidence::confidence_interval(self.model(), &features, self.confidence_level)?;
        debug!(raw, lower = interval.lower, upper = interval.upper, "scored order");
        Ok(Estimate {
            minutes: raw.max(0.0),
            interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use eta_core::{DeliveryOrder, Interval};

    #[test]
    fn estimate_combines_point_and_band() {
        let pipeline = fixtures::pipeline_with_linear();
        let order = DeliveryOrder {
            distance_km: 5.0,
            prep_time_min: 10.0,
            traffic: "Jam".to_string(),
            ..DeliveryOrder::default()
        };
        // 3 + 2*5 + 10 + 5
        let estimate = pipeline.estimate(&order.to_record()).unwrap();
        assert!((estimate.minutes - 28.0).abs() < 1e-9);
        assert!((estimate.interval.lower - 23.8).abs() < 1e-9);
        assert!((estimate.interval.upper - 32.2).abs() < 1e-9);
    }

    #[test]
    fn negative_raw_prediction_clamps_to_zero() {
        let mut model = fixtures::linear();
        model.intercept = -500.0;
        let pipeline = Pipeline::new(
            Arc::new(fixtures::encoder()),
            Arc::new(fixtures::scaler()),
            Arc::new(model),
        );
        let record = DeliveryOrder::default().to_record();
        assert!(pipeline.predict(&record).unwrap() < 0.0);
        let estimate = pipeline.estimate(&record).unwrap();
        assert_eq!(estimate.minutes, 0.0);
        assert_eq!(estimate.interval.lower, 0.0);
    }

    #[test]
    fn forest_estimate_uses_tree_spread() {
        let pipeline = Pipeline::new(
            Arc::new(fixtures::encoder()),
            Arc::new(fixtures::scaler()),
            Arc::new(fixtures::constant_forest(&[30.0, 30.0])),
        )
        .with_confidence_level(0.99);
        let estimate = pipeline.estimate(&DeliveryOrder::default().to_record()).unwrap();
        assert_eq!(estimate.minutes, 30.0);
        assert_eq!(estimate.interval, Interval { lower: 30.0, upper: 30.0 });
    }

    #[test]
    fn width_mismatch_surfaces_per_request() {
        let mut model = fixtures::linear();
        model.coefficients.pop();
        let pipeline = Pipeline::new(
            Arc::new(fixtures::encoder()),
            Arc::new(fixtures::scaler()),
            Arc::new(model),
        );
        let err = pipeline.estimate(&DeliveryOrder::default().to_record()).unwrap_err();
        assert!(matches!(err, eta_core::PipelineError::Inference { .. }));
    }
}
