//! Heuristic uncertainty band around a point estimate.
//!
//! Ensembles use the spread of their sub-estimators; any other model gets a
//! fixed fractional margin. Neither is a calibrated prediction interval.

use eta_core::{stats, FeatureVector, Interval, Result};

use crate::predictor::check_width;
use crate::Regressor;

pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Fraction of the point estimate used as the margin for non-ensemble models.
pub const HEURISTIC_MARGIN: f64 = 0.15;

const Z_95: f64 = 1.96;
const Z_99: f64 = 2.576;

/// Two-point lookup: 0.95 maps to 1.96 and every other level to 2.576.
pub fn z_score(confidence_level: f64) -> f64 {
    if (confidence_level - 0.95).abs() < f64::EPSILON {
        Z_95
    } else {
        Z_99
    }
}

pub fn confidence_interval(
    model: &dyn Regressor,
    features: &FeatureVector,
    confidence_level: f64,
) -> Result<Interval> {
    check_width(model, features)?;
    let x = features.as_slice();

    let (lower, upper) = match model.sub_estimators() {
        Some(estimators) if !estimators.is_empty() => {
            let outputs: Vec<f64> = estimators.iter().map(|e| e.predict_row(x)).collect();
            let mean = stats::mean(&outputs).unwrap_or_default();
            let std = stats::population_std(&outputs).unwrap_or_default();
            let margin = z_score(confidence_level) * std;
            (mean - margin, mean + margin)
        }
        _ => {
            let point = model.predict_row(x);
            let margin = point * HEURISTIC_MARGIN;
            (point - margin, point + margin)
        }
    };

    Ok(Interval {
        lower: lower.max(0.0),
        upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn zeros() -> FeatureVector {
        FeatureVector(vec![0.0; fixtures::WIDTH])
    }

    #[test]
    fn ensemble_band_uses_population_std() {
        let forest = fixtures::constant_forest(&[10.0, 12.0, 14.0, 16.0, 18.0]);
        let std = 8.0_f64.sqrt();

        let i95 = confidence_interval(&forest, &zeros(), 0.95).unwrap();
        assert!((i95.lower - (14.0 - 1.96 * std)).abs() < 1e-9);
        assert!((i95.upper - (14.0 + 1.96 * std)).abs() < 1e-9);

        let i99 = confidence_interval(&forest, &zeros(), 0.99).unwrap();
        assert!((i99.upper - (14.0 + 2.576 * std)).abs() < 1e-9);
        assert!(i99.lower < i99.upper);
    }

    #[test]
    fn other_levels_fall_through_to_99() {
        assert_eq!(z_score(0.95), 1.96);
        assert_eq!(z_score(0.99), 2.576);
        assert_eq!(z_score(0.90), 2.576);
    }

    #[test]
    fn zero_variance_collapses_to_point() {
        let forest = fixtures::constant_forest(&[21.0; 4]);
        let band = confidence_interval(&forest, &zeros(), 0.95).unwrap();
        assert_eq!(band, Interval { lower: 21.0, upper: 21.0 });
    }

    #[test]
    fn lower_bound_is_clamped_at_zero() {
        let forest = fixtures::constant_forest(&[0.0, 1.0, 20.0]);
        let band = confidence_interval(&forest, &zeros(), 0.95).unwrap();
        assert_eq!(band.lower, 0.0);
        assert!(band.upper > 7.0);
    }

    #[test]
    fn non_ensemble_uses_fifteen_percent() {
        let mut model = fixtures::linear();
        model.intercept = 40.0;
        let band = confidence_interval(&model, &zeros(), 0.95).unwrap();
        assert!((band.lower - 34.0).abs() < 1e-9);
        assert!((band.upper - 46.0).abs() < 1e-9);
    }

    #[test]
    fn width_is_checked() {
        let model = fixtures::linear();
        assert!(confidence_interval(&model, &FeatureVector(vec![0.0]), 0.95).is_err());
    }
}
