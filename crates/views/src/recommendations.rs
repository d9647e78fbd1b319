//! Suggestions for bringing an order's delivery time down.

use eta_core::DeliveryOrder;

use crate::{evaluate, OrderFacts, Rule};

pub static RECOMMENDATION_RULES: &[Rule] = &[
    Rule {
        name: "long_distance_vehicle",
        applies: |f| f.distance_km > 10.0,
        message: |_| "Consider using a faster vehicle for long distances.".to_string(),
    },
    Rule {
        name: "weather_buffer",
        applies: adverse_weather,
        message: |_| "Allow extra time for adverse weather conditions.".to_string(),
    },
    Rule {
        name: "weather_reschedule",
        applies: adverse_weather,
        message: |_| "Consider rescheduling during severe weather.".to_string(),
    },
    Rule {
        name: "traffic_routing",
        applies: heavy_traffic,
        message: |_| "Use traffic-aware routing to avoid congestion.".to_string(),
    },
    Rule {
        name: "traffic_off_peak",
        applies: heavy_traffic,
        message: |_| "Consider delivery during off-peak hours.".to_string(),
    },
    Rule {
        name: "peak_prepositioning",
        applies: OrderFacts::is_peak_hour,
        message: |_| "Peak hours – consider pre-positioning delivery partners.".to_string(),
    },
    Rule {
        name: "bicycle_upgrade",
        applies: |f| f.vehicle == "bicycle" && f.distance_km > 5.0,
        message: |_| "Consider upgrading to a motorized vehicle for efficiency.".to_string(),
    },
    Rule {
        name: "route_optimisation",
        applies: |f| f.multiple_deliveries > 2,
        message: |_| "Optimize delivery route to minimize total time.".to_string(),
    },
];

fn adverse_weather(f: &OrderFacts) -> bool {
    matches!(f.weather.as_str(), "stormy" | "sandstorms" | "fog")
}

fn heavy_traffic(f: &OrderFacts) -> bool {
    matches!(f.traffic.as_str(), "high" | "jam")
}

pub fn recommendations(order: &DeliveryOrder) -> Vec<String> {
    evaluate(RECOMMENDATION_RULES, &OrderFacts::from(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paired_rules_emit_both_messages() {
        let order = DeliveryOrder {
            weather: "Fog".to_string(),
            traffic: "High".to_string(),
            order_hour: 9,
            ..DeliveryOrder::default()
        };
        assert_eq!(
            recommendations(&order),
            vec![
                "Allow extra time for adverse weather conditions.",
                "Consider rescheduling during severe weather.",
                "Use traffic-aware routing to avoid congestion.",
                "Consider delivery during off-peak hours.",
            ]
        );
    }

    #[test]
    fn long_bicycle_trip_with_many_drops() {
        let order = DeliveryOrder {
            distance_km: 11.0,
            vehicle_type: "Bicycle".to_string(),
            multiple_deliveries: 3,
            order_hour: 12,
            ..DeliveryOrder::default()
        };
        assert_eq!(
            recommendations(&order),
            vec![
                "Consider using a faster vehicle for long distances.",
                "Peak hours – consider pre-positioning delivery partners.",
                "Consider upgrading to a motorized vehicle for efficiency.",
                "Optimize delivery route to minimize total time.",
            ]
        );
    }

    #[test]
    fn calm_order_has_no_recommendations() {
        let order = DeliveryOrder {
            order_hour: 16,
            ..DeliveryOrder::default()
        };
        assert!(recommendations(&order).is_empty());
    }
}
