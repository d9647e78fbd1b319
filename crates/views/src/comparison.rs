use serde::Serialize;

use eta_core::{Minutes, Scenario};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpeedBand {
    Fast,
    Moderate,
    Slow,
}

impl SpeedBand {
    pub fn from_minutes(minutes: Minutes) -> Self {
        if minutes < 25.0 {
            SpeedBand::Fast
        } else if minutes < 35.0 {
            SpeedBand::Moderate
        } else {
            SpeedBand::Slow
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioComparison {
    pub best: String,
    pub best_minutes: Minutes,
    pub worst: String,
    pub worst_minutes: Minutes,
    pub average_minutes: Minutes,
    pub spread_minutes: Minutes,
    pub insights: Vec<String>,
}

/// Best and worst scenario by estimate; ties go to the earlier scenario.
pub fn compare_scenarios(scenarios: &[Scenario]) -> Option<ScenarioComparison> {
    let first = scenarios.first()?;
    let mut best = first;
    let mut worst = first;
    for s in &scenarios[1..] {
        if s.minutes() < best.minutes() {
            best = s;
        }
        if s.minutes() > worst.minutes() {
            worst = s;
        }
    }

    let average = scenarios.iter().map(Scenario::minutes).sum::<f64>() / scenarios.len() as f64;
    let spread = worst.minutes() - best.minutes();
    let insights = vec![
        format!("Average delivery time across scenarios: {average:.1} minutes"),
        format!("Time difference between best and worst: {spread:.1} minutes"),
        format!(
            "Best conditions: {} weather, {} traffic",
            best.order.weather, best.order.traffic
        ),
        format!(
            "Avoid: {} weather with {} traffic",
            worst.order.weather, worst.order.traffic
        ),
    ];

    Some(ScenarioComparison {
        best: best.name.clone(),
        best_minutes: best.minutes(),
        worst: worst.name.clone(),
        worst_minutes: worst.minutes(),
        average_minutes: average,
        spread_minutes: spread,
        insights,
    })
}
