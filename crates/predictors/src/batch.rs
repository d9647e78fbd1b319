//! Row-by-row scoring of an uploaded table with per-row failure isolation.

use serde::Serialize;
use tracing::{info, warn};

use eta_core::schema::{ERROR_MARKER, PREDICTION_COLUMN};
use eta_core::{stats, PipelineError, Result, Table};

use crate::{codec, predictor, CategoricalEncoder, NumericScaler, Regressor};

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Input rows in input order, plus [`PREDICTION_COLUMN`].
    pub table: Table,
    pub scored: usize,
    pub failed: usize,
}

/// Scores every row of `rows`. Missing required columns fail the whole batch
/// before any row is touched; any later failure only marks its own row.
/// Predictions are clamped at zero, as for single estimates.
pub fn process_batch(
    rows: &Table,
    encoder: &dyn CategoricalEncoder,
    scaler: &dyn NumericScaler,
    model: &dyn Regressor,
) -> Result<BatchOutcome> {
    let missing = rows.missing_required();
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }

    let mut cells = Vec::with_capacity(rows.len());
    let mut failed = 0;
    for index in 0..rows.len() {
        let scored = rows
            .record(index)
            .ok_or_else(|| PipelineError::Table(format!("row {index} out of range")))
            .and_then(|record| codec::encode(&record, encoder, scaler))
            .and_then(|features| predictor::predict(model, &features));
        match scored {
            Ok(minutes) => cells.push(minutes.max(0.0).to_string()),
            Err(err) => {
                warn!(row = index, error = %err, "batch row failed");
                failed += 1;
                cells.push(format!("{ERROR_MARKER}{err}"));
            }
        }
    }

    let mut table = rows.clone();
    table.append_column(PREDICTION_COLUMN, cells)?;
    let scored = table.len() - failed;
    info!(rows = table.len(), scored, failed, "batch complete");
    Ok(BatchOutcome { table, scored, failed })
}

impl crate::Pipeline {
    pub fn process_batch(&self, rows: &Table) -> Result<BatchOutcome> {
        process_batch(rows, self.encoder(), self.scaler(), self.model())
    }
}

/// Aggregate figures over the successfully scored rows of a batch result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchSummary {
    pub total_orders: usize,
    pub scored: usize,
    pub failed: usize,
    pub average_time: Option<f64>,
    pub median_time: Option<f64>,
    pub min_time: Option<f64>,
    pub max_time: Option<f64>,
    pub std_deviation: Option<f64>,
}

impl BatchSummary {
    /// `None` when the table carries no prediction column.
    pub fn from_table(table: &Table) -> Option<Self> {
        let cells = table.column(PREDICTION_COLUMN)?;
        let values: Vec<f64> = cells.iter().filter_map(|c| c.parse::<f64>().ok()).collect();
        Some(Self {
            total_orders: cells.len(),
            scored: values.len(),
            failed: cells.len() - values.len(),
            average_time: stats::mean(&values),
            median_time: stats::median(&values),
            min_time: stats::min(&values),
            max_time: stats::max(&values),
            std_deviation: stats::sample_std(&values),
        })
    }
}
