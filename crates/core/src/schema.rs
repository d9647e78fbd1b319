//! Column names and the training-time column order.
//!
//! The order of [`NUMERIC_COLUMNS`] and [`CATEGORICAL_COLUMNS`] is the order the
//! scaler and encoder were fitted on. Reordering either list corrupts every
//! prediction without raising an error.

pub const AGE: &str = "Delivery_person_Age";
pub const RATING: &str = "Delivery_person_Ratings";
pub const VEHICLE_CONDITION: &str = "Vehicle_condition";
pub const MULTIPLE_DELIVERIES: &str = "multiple_deliveries";
pub const DISTANCE_KM: &str = "distance_km";
pub const PREP_TIME_MIN: &str = "prep_time_min";
pub const ORDER_HOUR: &str = "order_hour";
pub const ORDER_DAY: &str = "order_day";
pub const IS_WEEKEND: &str = "is_weekend";

pub const WEATHER: &str = "Weatherconditions";
pub const TRAFFIC: &str = "Road_traffic_density";
pub const ORDER_TYPE: &str = "Type_of_order";
pub const VEHICLE_TYPE: &str = "Type_of_vehicle";
pub const FESTIVAL: &str = "Festival";
pub const CITY: &str = "City";

pub const NUMERIC_COLUMNS: [&str; 9] = [
    AGE,
    RATING,
    VEHICLE_CONDITION,
    MULTIPLE_DELIVERIES,
    DISTANCE_KM,
    PREP_TIME_MIN,
    ORDER_HOUR,
    ORDER_DAY,
    IS_WEEKEND,
];

pub const CATEGORICAL_COLUMNS: [&str; 6] = [WEATHER, TRAFFIC, ORDER_TYPE, VEHICLE_TYPE, FESTIVAL, CITY];

/// Column order of the input form and the batch upload template.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    AGE,
    RATING,
    WEATHER,
    TRAFFIC,
    VEHICLE_CONDITION,
    ORDER_TYPE,
    VEHICLE_TYPE,
    MULTIPLE_DELIVERIES,
    FESTIVAL,
    CITY,
    DISTANCE_KM,
    PREP_TIME_MIN,
    ORDER_HOUR,
    ORDER_DAY,
    IS_WEEKEND,
];

/// Column appended by the batch pipeline.
pub const PREDICTION_COLUMN: &str = "Predicted_Delivery_Time";

/// Prefix written in place of a prediction when a batch row fails.
pub const ERROR_MARKER: &str = "Error: ";

/// Feature order of the single combined pipeline artifact served by the
/// lightweight form endpoint. Unrelated to the columns above.
pub const SERVER_FEATURES: [&str; 25] = [
    "Delivery_person_Age",
    "Delivery_person_Ratings",
    "Weather_conditions",
    "Road_traffic_density",
    "Vehicle_condition",
    "Type_of_order",
    "Type_of_vehicle",
    "multiple_deliveries",
    "Festival",
    "City",
    "City_code",
    "day",
    "month",
    "quarter",
    "year",
    "day_of_week",
    "is_month_start",
    "is_month_end",
    "is_quarter_start",
    "is_quarter_end",
    "is_year_start",
    "is_year_end",
    "is_weekend",
    "order_prepare_time",
    "distance",
];

/// Returns the required columns absent from `present`, in [`REQUIRED_COLUMNS`] order.
pub fn missing_columns<'a, I>(present: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = present.into_iter().collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(col))
        .map(|col| col.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_columns_cover_both_groups() {
        for col in NUMERIC_COLUMNS.iter().chain(CATEGORICAL_COLUMNS.iter()) {
            assert!(REQUIRED_COLUMNS.contains(col), "{col} not required");
        }
        assert_eq!(REQUIRED_COLUMNS.len(), NUMERIC_COLUMNS.len() + CATEGORICAL_COLUMNS.len());
    }

    #[test]
    fn missing_columns_reports_only_absent_names() {
        let present: Vec<&str> = REQUIRED_COLUMNS.iter().copied().filter(|c| *c != DISTANCE_KM).collect();
        assert_eq!(missing_columns(present), vec![DISTANCE_KM.to_string()]);
    }
}
