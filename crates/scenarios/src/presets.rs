use serde::{Deserialize, Serialize};

use eta_core::DeliveryOrder;

/// Canned what-if orders offered next to the custom scenario form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    RushHour,
    Morning,
    BadWeather,
    Festival,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::RushHour,
        Preset::Morning,
        Preset::BadWeather,
        Preset::Festival,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::RushHour => "Rush Hour",
            Preset::Morning => "Morning Order",
            Preset::BadWeather => "Bad Weather",
            Preset::Festival => "Festival Rush",
        }
    }

    pub fn order(self) -> DeliveryOrder {
        let base = DeliveryOrder {
            order_day: 15,
            ..DeliveryOrder::default()
        };
        match self {
            Preset::RushHour => DeliveryOrder {
                age: 28,
                rating: 4.3,
                weather: "Cloudy".into(),
                traffic: "High".into(),
                vehicle_condition: 1,
                order_type: "Meal".into(),
                vehicle_type: "Motorcycle".into(),
                distance_km: 8.5,
                prep_time_min: 25.0,
                order_hour: 19,
                city: "Metropolitan".into(),
                multiple_deliveries: 1,
                festival: "No".into(),
                is_weekend: false,
                ..base
            },
            Preset::Morning => DeliveryOrder {
                age: 25,
                rating: 4.6,
                weather: "Sunny".into(),
                traffic: "Low".into(),
                vehicle_condition: 2,
                order_type: "Snack".into(),
                vehicle_type: "Scooter".into(),
                distance_km: 3.2,
                prep_time_min: 15.0,
                order_hour: 10,
                city: "Urban".into(),
                multiple_deliveries: 0,
                festival: "No".into(),
                is_weekend: false,
                ..base
            },
            Preset::BadWeather => DeliveryOrder {
                age: 32,
                rating: 4.4,
                weather: "Stormy".into(),
                traffic: "Medium".into(),
                vehicle_condition: 1,
                order_type: "Meal".into(),
                vehicle_type: "Motorcycle".into(),
                distance_km: 6.8,
                prep_time_min: 20.0,
                order_hour: 14,
                city: "Metropolitan".into(),
                multiple_deliveries: 0,
                festival: "No".into(),
                is_weekend: true,
                ..base
            },
            Preset::Festival => DeliveryOrder {
                age: 30,
                rating: 4.2,
                weather: "Sunny".into(),
                traffic: "Jam".into(),
                vehicle_condition: 1,
                order_type: "Buffet".into(),
                vehicle_type: "Scooter".into(),
                distance_km: 7.5,
                prep_time_min: 35.0,
                order_hour: 20,
                city: "Metropolitan".into(),
                multiple_deliveries: 2,
                festival: "Yes".into(),
                is_weekend: true,
                ..base
            },
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "rush_hour" => Ok(Preset::RushHour),
            "morning" => Ok(Preset::Morning),
            "bad_weather" => Ok(Preset::BadWeather),
            "festival" => Ok(Preset::Festival),
            other => Err(format!("unknown preset {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid_orders() {
        for preset in Preset::ALL {
            assert!(preset.order().validate().is_empty(), "{preset:?}");
            assert_eq!(preset.order().order_day, 15);
        }
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("rush-hour".parse::<Preset>(), Ok(Preset::RushHour));
        assert_eq!("Bad Weather".parse::<Preset>(), Ok(Preset::BadWeather));
        assert!("brunch".parse::<Preset>().is_err());
    }

    #[test]
    fn festival_preset_is_a_jam() {
        let order = Preset::Festival.order();
        assert_eq!((order.traffic.as_str(), order.festival.as_str()), ("Jam", "Yes"));
        assert_eq!(Preset::Festival.name(), "Festival Rush");
    }
}
