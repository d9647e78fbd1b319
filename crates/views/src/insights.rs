//! Plain-language notes on what drives an order's delivery time.

use eta_core::{AttributeRecord, DeliveryOrder, Result};

use crate::{evaluate, title_case, OrderFacts, Rule};

pub static INSIGHT_RULES: &[Rule] = &[
    Rule {
        name: "long_distance",
        applies: |f| f.distance_km > 15.0,
        message: |f| format!("Long distance ({:.1} km) is a major factor in delivery time.", f.distance_km),
    },
    Rule {
        name: "short_distance",
        applies: |f| f.distance_km < 3.0,
        message: |f| format!("Short distance ({:.1} km) helps reduce delivery time.", f.distance_km),
    },
    Rule {
        name: "adverse_weather",
        applies: |f| matches!(f.weather.as_str(), "stormy" | "sandstorms"),
        message: |f| format!("Adverse weather ({}) may increase delivery time.", title_case(&f.weather)),
    },
    Rule {
        name: "good_weather",
        applies: |f| f.weather == "sunny",
        message: |_| "Good weather conditions favor faster delivery.".to_string(),
    },
    Rule {
        name: "heavy_traffic",
        applies: |f| matches!(f.traffic.as_str(), "high" | "jam"),
        message: |f| format!("Heavy traffic ({}) is likely to delay delivery.", title_case(&f.traffic)),
    },
    Rule {
        name: "low_traffic",
        applies: |f| f.traffic == "low",
        message: |_| "Low traffic conditions help maintain optimal delivery time.".to_string(),
    },
    Rule {
        name: "peak_time",
        applies: OrderFacts::is_peak_hour,
        message: |f| format!("Peak ordering time ({}:00) may affect delivery speed.", f.order_hour),
    },
    Rule {
        name: "multiple_deliveries",
        applies: |f| f.multiple_deliveries > 1,
        message: |f| format!("Multiple deliveries ({}) will increase total time.", f.multiple_deliveries),
    },
    Rule {
        name: "weekend",
        applies: |f| f.is_weekend,
        message: |_| "Weekend orders may have different delivery patterns.".to_string(),
    },
    Rule {
        name: "eco_vehicle",
        applies: |f| matches!(f.vehicle.as_str(), "bicycle" | "electric bike"),
        message: |f| format!("{} may be slower but more eco-friendly.", title_case(&f.vehicle)),
    },
    Rule {
        name: "motorcycle",
        applies: |f| f.vehicle == "motorcycle",
        message: |_| "Motorcycle delivery offers good speed and flexibility.".to_string(),
    },
    Rule {
        name: "festival",
        applies: |f| f.festival == "yes",
        message: |_| "Festival season may affect delivery times due to increased demand.".to_string(),
    },
];

/// Every applicable insight for `order`, in rule-table order.
pub fn insights(order: &DeliveryOrder) -> Vec<String> {
    evaluate(INSIGHT_RULES, &OrderFacts::from(order))
}

pub fn insights_for_record(record: &AttributeRecord) -> Result<Vec<String>> {
    Ok(insights(&DeliveryOrder::from_record(record)?))
}
