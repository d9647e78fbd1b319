//! Aggregates over a session's prediction history, plus the per-order efficiency score.

use serde::Serialize;

use eta_core::{stats, DeliveryOrder, HistoryRecord, Minutes, Result, Table};

use crate::normalize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeliveryStatistics {
    pub total_predictions: usize,
    pub average_time: Minutes,
    pub median_time: Minutes,
    pub std_deviation: Minutes,
    pub min_time: Minutes,
    pub max_time: Minutes,
}

/// `None` for an empty history.
pub fn delivery_statistics(history: &[HistoryRecord]) -> Option<DeliveryStatistics> {
    let values: Vec<f64> = history.iter().map(HistoryRecord::minutes).collect();
    Some(DeliveryStatistics {
        total_predictions: values.len(),
        average_time: stats::mean(&values)?,
        median_time: stats::median(&values)?,
        std_deviation: stats::population_std(&values)?,
        min_time: stats::min(&values)?,
        max_time: stats::max(&values)?,
    })
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub average_interval_minutes: f64,
    pub prediction_frequency: usize,
}

const TREND_WINDOW: usize = 5;

/// Compares the last five predictions against everything before them.
/// Needs at least two records; with five or fewer the trend is [`Trend::Stable`].
pub fn analyze_trends(history: &[HistoryRecord]) -> Option<TrendAnalysis> {
    if history.len() < 2 {
        return None;
    }
    let mut sorted: Vec<&HistoryRecord> = history.iter().collect();
    sorted.sort_by_key(|r| r.timestamp);

    let predictions: Vec<f64> = sorted.iter().map(|r| r.minutes()).collect();
    let trend = if predictions.len() > TREND_WINDOW {
        let (earlier, recent) = predictions.split_at(predictions.len() - TREND_WINDOW);
        match (stats::mean(recent), stats::mean(earlier)) {
            (Some(r), Some(e)) if r > e => Trend::Increasing,
            _ => Trend::Decreasing,
        }
    } else {
        Trend::Stable
    };

    let gaps: Vec<f64> = sorted
        .windows(2)
        .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_milliseconds() as f64 / 60_000.0)
        .collect();

    Some(TrendAnalysis {
        trend,
        average_interval_minutes: stats::mean(&gaps).unwrap_or_default(),
        prediction_frequency: predictions.len(),
    })
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
    Excellent,
    Good,
    NeedsAttention,
}

impl PerformanceRating {
    pub fn from_average(average: Minutes) -> Self {
        if average < 25.0 {
            PerformanceRating::Excellent
        } else if average < 35.0 {
            PerformanceRating::Good
        } else {
            PerformanceRating::NeedsAttention
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PerformanceRating::Excellent => "Excellent performance! Average delivery time is below 25 minutes.",
            PerformanceRating::Good => "Good performance, but room for improvement.",
            PerformanceRating::NeedsAttention => "Performance needs attention. Average delivery time is high.",
        }
    }
}

/// Mean prediction per weather condition, in order of first appearance.
pub fn average_by_weather(history: &[HistoryRecord]) -> Vec<(String, Minutes)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for record in history {
        let weather = &record.order.weather;
        match groups.iter_mut().find(|(w, _)| w == weather) {
            Some((_, values)) => values.push(record.minutes()),
            None => groups.push((weather.clone(), vec![record.minutes()])),
        }
    }
    groups
        .into_iter()
        .filter_map(|(w, values)| stats::mean(&values).map(|m| (w, m)))
        .collect()
}

/// Trailing mean over `window` values; positions before the first full window are `None`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                stats::mean(&values[i + 1 - window..=i])
            }
        })
        .collect()
}

fn weather_multiplier(weather: &str) -> f64 {
    match weather {
        "sunny" => 1.0,
        "cloudy" => 1.1,
        "windy" => 1.2,
        "stormy" => 1.4,
        "sandstorms" => 1.5,
        "fog" => 1.3,
        _ => 1.2,
    }
}

fn traffic_multiplier(traffic: &str) -> f64 {
    match traffic {
        "low" => 1.0,
        "medium" => 1.2,
        "high" => 1.4,
        "jam" => 1.8,
        _ => 1.2,
    }
}

fn vehicle_multiplier(vehicle: &str) -> f64 {
    match vehicle {
        "motorcycle" => 1.0,
        "scooter" => 1.1,
        "electric bike" => 1.2,
        "bicycle" => 1.5,
        _ => 1.2,
    }
}

/// 0-100 agreement between the model's estimate and a rule-of-thumb
/// expectation of 2 min/km scaled by conditions, plus preparation time.
pub fn efficiency_score(order: &DeliveryOrder, prediction: Minutes) -> f64 {
    let base = order.distance_km * 2.0;
    let expected = base
        * weather_multiplier(&normalize(&order.weather))
        * traffic_multiplier(&normalize(&order.traffic))
        * vehicle_multiplier(&normalize(&order.vehicle_type))
        + order.prep_time_min;
    if expected == 0.0 {
        return 0.0;
    }
    (100.0 - (prediction - expected).abs() / expected * 100.0).clamp(0.0, 100.0)
}

/// History laid out for display and export.
pub fn history_table(history: &[HistoryRecord]) -> Result<Table> {
    let mut table = Table::new([
        "Timestamp",
        "Predicted Time (min)",
        "Confidence Range",
        "Distance (km)",
        "Weather",
        "Traffic",
    ]);
    for record in history {
        let row = [
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.1}", record.estimate.minutes),
            format!(
                "{:.1} - {:.1}",
                record.estimate.interval.lower, record.estimate.interval.upper
            ),
            record.order.distance_km.to_string(),
            record.order.weather.clone(),
            record.order.traffic.clone(),
        ];
        table.push_row(row)?;
    }
    Ok(table)
}
