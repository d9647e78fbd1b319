//! Derived views over orders, estimates and session history: insights,
//! recommendations, analytics and scenario comparison.

use tracing::debug;

use eta_core::DeliveryOrder;

pub mod analytics;
pub mod annotate;
pub mod comparison;
pub mod insights;
pub mod recommendations;

pub use analytics::{delivery_statistics, efficiency_score, DeliveryStatistics, PerformanceRating, Trend, TrendAnalysis};
pub use annotate::{annotate_batch, AnnotateOptions};
pub use comparison::{compare_scenarios, ScenarioComparison, SpeedBand};
pub use insights::insights;
pub use recommendations::recommendations;

/// Normalised attributes the rule tables test against. Categorical values are
/// trimmed and lower-cased so rules match regardless of how they were typed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFacts {
    pub distance_km: f64,
    pub weather: String,
    pub traffic: String,
    pub vehicle: String,
    pub festival: String,
    pub order_hour: u32,
    pub multiple_deliveries: u32,
    pub is_weekend: bool,
}

impl From<&DeliveryOrder> for OrderFacts {
    fn from(order: &DeliveryOrder) -> Self {
        Self {
            distance_km: order.distance_km,
            weather: normalize(&order.weather),
            traffic: normalize(&order.traffic),
            vehicle: normalize(&order.vehicle_type),
            festival: normalize(&order.festival),
            order_hour: order.order_hour,
            multiple_deliveries: order.multiple_deliveries,
            is_weekend: order.is_weekend,
        }
    }
}

impl OrderFacts {
    pub fn is_peak_hour(&self) -> bool {
        (12..=14).contains(&self.order_hour) || (19..=21).contains(&self.order_hour)
    }
}

/// One `(predicate, message)` row of a rule table.
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&OrderFacts) -> bool,
    pub message: fn(&OrderFacts) -> String,
}

/// Every rule whose predicate holds, in table order.
pub fn evaluate(rules: &[Rule], facts: &OrderFacts) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(facts))
        .map(|rule| {
            debug!(rule = rule.name, "rule fired");
            (rule.message)(facts)
        })
        .collect()
}

pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Upper-cases the first letter of each word: `"electric bike"` -> `"Electric Bike"`.
pub(crate) fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facts_are_normalised() {
        let order = DeliveryOrder {
            weather: "  STORMY ".to_string(),
            vehicle_type: "Electric Bike".to_string(),
            ..DeliveryOrder::default()
        };
        let facts = OrderFacts::from(&order);
        assert_eq!(facts.weather, "stormy");
        assert_eq!(facts.vehicle, "electric bike");
    }

    #[test]
    fn rule_names_are_unique_per_table() {
        for table in [insights::INSIGHT_RULES, recommendations::RECOMMENDATION_RULES] {
            let mut names: Vec<&str> = table.iter().map(|r| r.name).collect();
            names.sort_unstable();
            let before = names.len();
            names.dedup();
            assert_eq!(names.len(), before, "duplicate rule name in {names:?}");
        }
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("electric bike"), "Electric Bike");
        assert_eq!(title_case("jam"), "Jam");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn peak_hours_are_inclusive() {
        let mut facts = OrderFacts::from(&DeliveryOrder::default());
        for (hour, peak) in [(11, false), (12, true), (14, true), (15, false), (19, true), (21, true), (22, false)] {
            facts.order_hour = hour;
            assert_eq!(facts.is_peak_hour(), peak, "hour {hour}");
        }
    }
}
