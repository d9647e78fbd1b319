//! Typed view of an attribute record.

use serde::{Deserialize, Serialize};

use crate::record::AttributeRecord;
use crate::schema;
use crate::{PipelineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryOrder {
    #[serde(rename = "Delivery_person_Age")]
    pub age: u32,
    #[serde(rename = "Delivery_person_Ratings")]
    pub rating: f64,
    #[serde(rename = "Weatherconditions")]
    pub weather: String,
    #[serde(rename = "Road_traffic_density")]
    pub traffic: String,
    #[serde(rename = "Vehicle_condition")]
    pub vehicle_condition: u32,
    #[serde(rename = "Type_of_order")]
    pub order_type: String,
    #[serde(rename = "Type_of_vehicle")]
    pub vehicle_type: String,
    pub multiple_deliveries: u32,
    #[serde(rename = "Festival")]
    pub festival: String,
    #[serde(rename = "City")]
    pub city: String,
    pub distance_km: f64,
    pub prep_time_min: f64,
    pub order_hour: u32,
    pub order_day: u32,
    #[serde(with = "weekend_flag")]
    pub is_weekend: bool,
}

impl Default for DeliveryOrder {
    /// Values the input form starts from.
    fn default() -> Self {
        Self {
            age: 30,
            rating: 4.5,
            weather: "Sunny".to_string(),
            traffic: "Low".to_string(),
            vehicle_condition: 1,
            order_type: "Snack".to_string(),
            vehicle_type: "Motorcycle".to_string(),
            multiple_deliveries: 0,
            festival: "No".to_string(),
            city: "Metropolitan".to_string(),
            distance_km: 5.0,
            prep_time_min: 10.0,
            order_hour: 13,
            order_day: 3,
            is_weekend: false,
        }
    }
}

impl DeliveryOrder {
    /// Reads every required column out of `record`; any absent column is a schema error.
    pub fn from_record(record: &AttributeRecord) -> Result<Self> {
        record.require(&schema::REQUIRED_COLUMNS)?;
        Ok(Self {
            age: count(record, schema::AGE)?,
            rating: record.number(schema::RATING)?,
            weather: record.text(schema::WEATHER)?,
            traffic: record.text(schema::TRAFFIC)?,
            vehicle_condition: count(record, schema::VEHICLE_CONDITION)?,
            order_type: record.text(schema::ORDER_TYPE)?,
            vehicle_type: record.text(schema::VEHICLE_TYPE)?,
            multiple_deliveries: count(record, schema::MULTIPLE_DELIVERIES)?,
            festival: record.text(schema::FESTIVAL)?,
            city: record.text(schema::CITY)?,
            distance_km: record.number(schema::DISTANCE_KM)?,
            prep_time_min: record.number(schema::PREP_TIME_MIN)?,
            order_hour: count(record, schema::ORDER_HOUR)?,
            order_day: count(record, schema::ORDER_DAY)?,
            is_weekend: record.number(schema::IS_WEEKEND)? != 0.0,
        })
    }

    pub fn to_record(&self) -> AttributeRecord {
        AttributeRecord::new()
            .with(schema::AGE, self.age as f64)
            .with(schema::RATING, self.rating)
            .with(schema::WEATHER, self.weather.as_str())
            .with(schema::TRAFFIC, self.traffic.as_str())
            .with(schema::VEHICLE_CONDITION, self.vehicle_condition as f64)
            .with(schema::ORDER_TYPE, self.order_type.as_str())
            .with(schema::VEHICLE_TYPE, self.vehicle_type.as_str())
            .with(schema::MULTIPLE_DELIVERIES, self.multiple_deliveries as f64)
            .with(schema::FESTIVAL, self.festival.as_str())
            .with(schema::CITY, self.city.as_str())
            .with(schema::DISTANCE_KM, self.distance_km)
            .with(schema::PREP_TIME_MIN, self.prep_time_min)
            .with(schema::ORDER_HOUR, self.order_hour as f64)
            .with(schema::ORDER_DAY, self.order_day as f64)
            .with(schema::IS_WEEKEND, if self.is_weekend { 1.0 } else { 0.0 })
    }

    /// Advisory checks; an order with issues can still be scored.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.distance_km < 0.0 {
            issues.push("Distance cannot be negative".to_string());
        }
        if self.prep_time_min < 0.0 {
            issues.push("Preparation time cannot be negative".to_string());
        }
        if !(18..=80).contains(&self.age) {
            issues.push("Delivery person age seems unrealistic".to_string());
        }
        issues
    }
}

/// Counts and clock values must be whole and non-negative; `11.6` is not an hour.
fn count(record: &AttributeRecord, column: &str) -> Result<u32> {
    let value = record.number(column)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(PipelineError::Encoding {
            column: column.to_string(),
            value: value.to_string(),
            reason: "expected a whole non-negative number".to_string(),
        })
    }
}

/// `is_weekend` travels as 0/1 on the wire but reads as a flag in code.
mod weekend_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*flag))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Number(f64),
        }
        Ok(match Flag::deserialize(d)? {
            Flag::Bool(b) => b,
            Flag::Number(n) => n != 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trip_keeps_every_attribute() {
        let order = DeliveryOrder {
            is_weekend: true,
            distance_km: 12.5,
            ..DeliveryOrder::default()
        };
        let back = DeliveryOrder::from_record(&order.to_record()).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn from_record_rejects_missing_columns() {
        let mut record = DeliveryOrder::default().to_record();
        record.remove(schema::CITY);
        record.remove(schema::ORDER_DAY);
        match DeliveryOrder::from_record(&record) {
            Err(PipelineError::Schema { missing }) => {
                assert_eq!(missing, vec![schema::CITY.to_string(), schema::ORDER_DAY.to_string()])
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fractional_counts_are_rejected_not_rounded() {
        let record = DeliveryOrder::default()
            .to_record()
            .with(schema::ORDER_HOUR, "11.6");
        match DeliveryOrder::from_record(&record) {
            Err(PipelineError::Encoding { column, value, .. }) => {
                assert_eq!(column, schema::ORDER_HOUR);
                assert_eq!(value, "11.6");
            }
            other => panic!("unexpected {other:?}"),
        }
        let negative = DeliveryOrder::default()
            .to_record()
            .with(schema::MULTIPLE_DELIVERIES, -1.0);
        assert!(DeliveryOrder::from_record(&negative).is_err());

        let whole = DeliveryOrder::default().to_record().with(schema::ORDER_HOUR, "12.0");
        assert_eq!(DeliveryOrder::from_record(&whole).unwrap().order_hour, 12);
    }

    #[test]
    fn validate_flags_out_of_range_values() {
        let order = DeliveryOrder {
            age: 90,
            distance_km: -1.0,
            ..DeliveryOrder::default()
        };
        assert_eq!(
            order.validate(),
            vec!["Distance cannot be negative", "Delivery person age seems unrealistic"]
        );
        assert!(DeliveryOrder::default().validate().is_empty());
    }

    #[test]
    fn weekend_flag_accepts_numbers_and_bools() {
        let mut json = serde_json::to_value(DeliveryOrder::default()).unwrap();
        assert_eq!(json["is_weekend"], 0);
        json["is_weekend"] = serde_json::json!(true);
        let order: DeliveryOrder = serde_json::from_value(json).unwrap();
        assert!(order.is_weekend);
    }
}
