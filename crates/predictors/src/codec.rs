//! Attribute record -> feature vector.

use eta_core::schema::{CATEGORICAL_COLUMNS, NUMERIC_COLUMNS, REQUIRED_COLUMNS};
use eta_core::{AttributeRecord, FeatureVector, Result};

use crate::{CategoricalEncoder, NumericScaler};

/// Builds `[scaled numerics..., encoded categoricals...]` in training-time column order.
pub fn encode(
    record: &AttributeRecord,
    encoder: &dyn CategoricalEncoder,
    scaler: &dyn NumericScaler,
) -> Result<FeatureVector> {
    record.require(&REQUIRED_COLUMNS)?;

    let numeric = NUMERIC_COLUMNS
        .iter()
        .map(|col| record.number(col))
        .collect::<Result<Vec<f64>>>()?;
    let categorical = CATEGORICAL_COLUMNS
        .iter()
        .map(|col| record.text(col).map(|value| (*col, value)))
        .collect::<Result<Vec<(&str, String)>>>()?;

    let mut features = scaler.transform(&numeric)?;
    features.extend(encoder.transform(&categorical)?.into_dense());
    Ok(FeatureVector(features))
}

pub fn encode_batch(
    records: &[AttributeRecord],
    encoder: &dyn CategoricalEncoder,
    scaler: &dyn NumericScaler,
) -> Result<Vec<FeatureVector>> {
    records.iter().map(|r| encode(r, encoder, scaler)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use eta_core::{schema, DeliveryOrder, PipelineError};

    #[test]
    fn numerics_first_then_one_hot_blocks() {
        let order = DeliveryOrder {
            distance_km: 6.0,
            traffic: "Jam".to_string(),
            ..DeliveryOrder::default()
        };
        let fv = encode(&order.to_record(), &fixtures::encoder(), &fixtures::scaler()).unwrap();
        assert_eq!(fv.width(), fixtures::WIDTH);
        assert_eq!(&fv.0[..9], &[30.0, 4.5, 1.0, 0.0, 6.0, 10.0, 13.0, 3.0, 0.0]);
        // Sunny is the fifth weather category, Jam the second traffic category.
        assert_eq!(fv.0[9 + 4], 1.0);
        assert_eq!(fv.0[9 + 6 + 1], 1.0);
        assert_eq!(fv.0[9..].iter().sum::<f64>(), 6.0);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let mut record = DeliveryOrder::default().to_record();
        record.remove(schema::WEATHER);
        match encode(&record, &fixtures::encoder(), &fixtures::scaler()) {
            Err(PipelineError::Schema { missing }) => assert_eq!(missing, vec![schema::WEATHER]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unseen_category_is_encoding_error() {
        let order = DeliveryOrder {
            city: "Rural".to_string(),
            ..DeliveryOrder::default()
        };
        let err = encode(&order.to_record(), &fixtures::encoder(), &fixtures::scaler()).unwrap_err();
        assert!(matches!(err, PipelineError::Encoding { ref column, .. } if column == schema::CITY));
    }

    #[test]
    fn batch_encoding_keeps_order() {
        let near = DeliveryOrder {
            distance_km: 1.0,
            ..DeliveryOrder::default()
        };
        let far = DeliveryOrder {
            distance_km: 20.0,
            ..DeliveryOrder::default()
        };
        let fvs = encode_batch(
            &[near.to_record(), far.to_record()],
            &fixtures::encoder(),
            &fixtures::scaler(),
        )
        .unwrap();
        assert_eq!(fvs[0].0[4], 1.0);
        assert_eq!(fvs[1].0[4], 20.0);
    }
}
