//! Optional display columns layered on a scored batch table.

use eta_core::schema::{DISTANCE_KM, PREDICTION_COLUMN, TRAFFIC, WEATHER};
use eta_core::{PipelineError, Result, Table};

pub const LOWER_COLUMN: &str = "Confidence_Lower";
pub const UPPER_COLUMN: &str = "Confidence_Upper";
pub const INSIGHT_COLUMN: &str = "AI_Insights";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotateOptions {
    pub confidence_bands: bool,
    pub insight_labels: bool,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            confidence_bands: true,
            insight_labels: true,
        }
    }
}

/// Adds a flat ±15% band and a one-line label per row. Rows whose prediction
/// cell is an error marker get empty bands.
pub fn annotate_batch(scored: &Table, options: AnnotateOptions) -> Result<Table> {
    let predictions = scored
        .column(PREDICTION_COLUMN)
        .ok_or_else(|| PipelineError::missing([PREDICTION_COLUMN]))?;
    let mut table = scored.clone();

    if options.confidence_bands {
        let band = |factor: f64| -> Vec<String> {
            predictions
                .iter()
                .map(|cell| match cell.parse::<f64>() {
                    Ok(p) => (p * factor).to_string(),
                    Err(_) => String::new(),
                })
                .collect()
        };
        let lower = band(0.85);
        let upper = band(1.15);
        table.append_column(LOWER_COLUMN, lower)?;
        table.append_column(UPPER_COLUMN, upper)?;
    }

    if options.insight_labels {
        let labels = (0..scored.len())
            .map(|i| {
                let cell = |col: &str| {
                    scored
                        .column_index(col)
                        .map(|idx| scored.rows()[i][idx].trim().to_string())
                        .unwrap_or_default()
                };
                let distance = cell(DISTANCE_KM).parse::<f64>().unwrap_or(0.0);
                let weather = cell(WEATHER);
                if distance > 10.0 {
                    "Long distance order"
                } else if cell(TRAFFIC) == "Jam" {
                    "Traffic delay expected"
                } else if weather == "Stormy" || weather == "Sandstorms" {
                    "Weather delay possible"
                } else {
                    "Normal delivery"
                }
                .to_string()
            })
            .collect();
        table.append_column(INSIGHT_COLUMN, labels)?;
    }

    Ok(table)
}
