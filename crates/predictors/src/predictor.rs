use eta_core::{FeatureVector, PipelineError, Result};

use crate::Regressor;

/// Raw model output in minutes; no clamping or rounding.
pub fn predict(model: &dyn Regressor, features: &FeatureVector) -> Result<f64> {
    check_width(model, features)?;
    Ok(model.predict_row(features.as_slice()))
}

pub(crate) fn check_width(model: &dyn Regressor, features: &FeatureVector) -> Result<()> {
    let expected = model.n_features();
    if features.width() == expected {
        Ok(())
    } else {
        Err(PipelineError::Inference {
            expected,
            actual: features.width(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn width_mismatch_is_inference_error() {
        let model = fixtures::linear();
        let err = predict(&model, &FeatureVector(vec![1.0; 3])).unwrap_err();
        assert!(matches!(err, PipelineError::Inference { expected: fixtures::WIDTH, actual: 3 }));
    }

    #[test]
    fn output_is_not_clamped() {
        let mut model = fixtures::linear();
        model.intercept = -100.0;
        let y = predict(&model, &FeatureVector(vec![0.0; fixtures::WIDTH])).unwrap();
        assert_eq!(y, -100.0);
    }
}
