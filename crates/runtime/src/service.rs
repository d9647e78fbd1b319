//! Facade the binaries drive: one shared pipeline, per-session stores, metrics.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

use eta_core::{AttributeRecord, DeliveryOrder, Estimate, HistoryRecord, PipelineError, Scenario, Table};
use eta_predictors::{ArtifactPaths, BatchSummary, DeliveryEstimator, Pipeline};
use eta_scenarios::{Preset, ScenarioManager, SessionId, SessionRegistry};
use eta_views::analytics::{self, DeliveryStatistics, TrendAnalysis};
use eta_views::{annotate_batch, compare_scenarios, efficiency_score, insights, recommendations};
use eta_views::{AnnotateOptions, ScenarioComparison, SpeedBand};

use crate::metrics::MetricsRegistry;

/// Everything shown for one scored order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionReport {
    pub estimate: Estimate,
    pub speed: SpeedBand,
    pub efficiency: f64,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// Advisory input warnings; never block the prediction.
    pub issues: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub table: Table,
    pub summary: Option<BatchSummary>,
}

pub struct PredictionService {
    pipeline: Arc<Pipeline>,
    scenarios: ScenarioManager,
    sessions: SessionRegistry,
    metrics: MetricsRegistry,
}

impl PredictionService {
    /// Loads the artifacts once. A load failure is logged and returned.
    pub fn bootstrap(paths: &ArtifactPaths, metrics: MetricsRegistry) -> Result<Self> {
        let pipeline = match Pipeline::load(paths) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                error!(error = %err, "failed to load prediction artifacts");
                return Err(err).context("loading prediction artifacts");
            }
        };
        info!(confidence_level = pipeline.confidence_level(), "pipeline ready");
        Ok(Self::from_pipeline(pipeline, metrics))
    }

    pub fn from_pipeline(pipeline: Pipeline, metrics: MetricsRegistry) -> Self {
        let pipeline = Arc::new(pipeline);
        let estimator: Arc<dyn DeliveryEstimator> = pipeline.clone();
        Self {
            pipeline,
            scenarios: ScenarioManager::new(estimator),
            sessions: SessionRegistry::new(),
            metrics,
        }
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn open_session(&self) -> SessionId {
        self.sessions.open()
    }

    pub fn close_session(&self, session: &SessionId) {
        self.sessions.close(session);
    }

    /// Scores one order and appends it to the session's history. Scoring and
    /// the append happen under one lock so a closed session records nothing.
    pub fn predict(&self, session: &SessionId, order: DeliveryOrder) -> Result<PredictionReport> {
        let scored = self.sessions.with_session(session, |store| {
            let estimate = self.pipeline.estimate(&order.to_record())?;
            let report = PredictionReport {
                estimate,
                speed: SpeedBand::from_minutes(estimate.minutes),
                efficiency: efficiency_score(&order, estimate.minutes),
                insights: insights(&order),
                recommendations: recommendations(&order),
                issues: order.validate(),
            };
            store.record_prediction(order, estimate);
            Ok::<_, PipelineError>((report, store.history().len()))
        })?;

        match scored {
            Ok((report, history_len)) => {
                self.metrics.inc_predictions_served(1);
                self.metrics.record_history_len(history_len as u64);
                Ok(report)
            }
            Err(err) => {
                self.metrics.inc_prediction_failures(1);
                Err(err).context("scoring order")
            }
        }
    }

    pub fn predict_record(&self, session: &SessionId, record: &AttributeRecord) -> Result<PredictionReport> {
        let order = DeliveryOrder::from_record(record).context("reading order attributes")?;
        self.predict(session, order)
    }

    /// Scores an uploaded table. Only a missing column fails the whole batch.
    pub fn run_batch(&self, rows: &Table, annotate: Option<AnnotateOptions>) -> Result<BatchReport> {
        let outcome = self.pipeline.process_batch(rows).context("scoring batch")?;
        self.metrics.inc_batch_rows(outcome.table.len() as u64);
        self.metrics.inc_batch_row_failures(outcome.failed as u64);

        let summary = BatchSummary::from_table(&outcome.table);
        let table = match annotate {
            Some(options) => annotate_batch(&outcome.table, options)?,
            None => outcome.table,
        };
        Ok(BatchReport { table, summary })
    }

    pub fn add_scenario(&self, session: &SessionId, name: &str, order: DeliveryOrder) -> Result<Scenario> {
        let scenario = self
            .sessions
            .with_session(session, |store| {
                self.scenarios.add_scenario(store, name, order).cloned()
            })??;
        self.metrics.inc_scenarios_created(1);
        Ok(scenario)
    }

    /// Returns whether the preset was added; an existing name is left alone.
    pub fn add_preset(&self, session: &SessionId, preset: Preset) -> Result<bool> {
        let added = self
            .sessions
            .with_session(session, |store| self.scenarios.add_preset(store, preset))??;
        if added {
            self.metrics.inc_scenarios_created(1);
        }
        Ok(added)
    }

    pub fn remove_scenario(&self, session: &SessionId, name: &str) -> Result<Scenario> {
        Ok(self
            .sessions
            .with_session(session, |store| store.remove_scenario(name))??)
    }

    pub fn scenarios(&self, session: &SessionId) -> Result<Vec<Scenario>> {
        Ok(self
            .sessions
            .with_session(session, |store| store.scenarios().to_vec())?)
    }

    pub fn compare(&self, session: &SessionId) -> Result<Option<ScenarioComparison>> {
        Ok(self
            .sessions
            .with_session(session, |store| compare_scenarios(store.scenarios()))?)
    }

    pub fn clear_scenarios(&self, session: &SessionId) -> Result<()> {
        Ok(self.sessions.with_session(session, |store| store.clear_scenarios())?)
    }

    pub fn history(&self, session: &SessionId) -> Result<Vec<HistoryRecord>> {
        Ok(self
            .sessions
            .with_session(session, |store| store.history().to_vec())?)
    }

    pub fn clear_history(&self, session: &SessionId) -> Result<()> {
        Ok(self.sessions.with_session(session, |store| store.clear_history())?)
    }

    pub fn statistics(&self, session: &SessionId) -> Result<Option<DeliveryStatistics>> {
        Ok(self
            .sessions
            .with_session(session, |store| analytics::delivery_statistics(store.history()))?)
    }

    pub fn trends(&self, session: &SessionId) -> Result<Option<TrendAnalysis>> {
        Ok(self
            .sessions
            .with_session(session, |store| analytics::analyze_trends(store.history()))?)
    }

    /// History as an exportable table.
    pub fn export_history(&self, session: &SessionId) -> Result<Table> {
        Ok(self
            .sessions
            .with_session(session, |store| analytics::history_table(store.history()))??)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eta_core::schema::{ERROR_MARKER, PREDICTION_COLUMN};
    use eta_core::table::sample_batch;
    use eta_predictors::{CategoricalEncoder, EncodedRow, NumericScaler, Regressor};
    use pretty_assertions::assert_eq;

    /// Contributes no columns; rejects weather it has never seen.
    struct KnownWeather;

    impl CategoricalEncoder for KnownWeather {
        fn output_width(&self) -> usize {
            0
        }

        fn transform(&self, row: &[(&str, String)]) -> eta_core::Result<EncodedRow> {
            let (column, weather) = &row[0];
            if !["Sunny", "Cloudy", "Windy", "Stormy", "Fog", "Sandstorms"].contains(&weather.as_str()) {
                return Err(PipelineError::Encoding {
                    column: column.to_string(),
                    value: weather.clone(),
                    reason: "unknown category".into(),
                });
            }
            Ok(EncodedRow::Dense(Vec::new()))
        }
    }

    struct Identity;

    impl NumericScaler for Identity {
        fn n_features(&self) -> usize {
            9
        }

        fn transform(&self, values: &[f64]) -> eta_core::Result<Vec<f64>> {
            Ok(values.to_vec())
        }
    }

    /// Two minutes per kilometre plus preparation time.
    struct PerKm;

    impl Regressor for PerKm {
        fn n_features(&self) -> usize {
            9
        }

        fn predict_row(&self, x: &[f64]) -> f64 {
            2.0 * x[4] + x[5]
        }
    }

    fn service() -> PredictionService {
        let pipeline = Pipeline::new(Arc::new(KnownWeather), Arc::new(Identity), Arc::new(PerKm));
        PredictionService::from_pipeline(pipeline, MetricsRegistry::default())
    }

    #[test]
    fn predict_reports_and_records_history() {
        let svc = service();
        let session = svc.open_session();
        let order = DeliveryOrder {
            distance_km: 12.0,
            prep_time_min: 10.0,
            ..DeliveryOrder::default()
        };
        let report = svc.predict(&session, order).unwrap();
        assert_eq!(report.estimate.minutes, 34.0);
        assert!((report.estimate.interval.lower - 28.9).abs() < 1e-9);
        assert_eq!(report.speed, SpeedBand::Moderate);
        assert!(report.issues.is_empty());
        assert!(!report.recommendations.is_empty());

        let history = svc.history(&session).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(svc.metrics().snapshot().history_peak, 1);
    }

    #[test]
    fn failed_prediction_is_counted_and_not_recorded() {
        let svc = service();
        let session = svc.open_session();
        let order = DeliveryOrder {
            weather: "Tornado".into(),
            ..DeliveryOrder::default()
        };
        assert!(svc.predict(&session, order).is_err());
        assert!(svc.history(&session).unwrap().is_empty());
        assert_eq!(svc.metrics().snapshot().prediction_failures, 1);
    }

    #[test]
    fn unknown_session_is_an_error() {
        let svc = service();
        let stranger = SessionId::new();
        assert!(svc.predict(&stranger, DeliveryOrder::default()).is_err());
        let snap = svc.metrics().snapshot();
        assert_eq!((snap.predictions_served, snap.prediction_failures), (0, 0));
    }

    #[test]
    fn closed_session_records_and_counts_nothing() {
        let svc = service();
        let session = svc.open_session();
        svc.predict(&session, DeliveryOrder::default()).unwrap();
        svc.close_session(&session);
        assert!(svc.predict(&session, DeliveryOrder::default()).is_err());
        assert!(svc.history(&session).is_err());
        assert_eq!(svc.metrics().snapshot().predictions_served, 1);
    }

    #[test]
    fn batch_counts_rows_and_annotates() {
        let svc = service();
        let mut csv = sample_batch().to_csv_string().unwrap();
        csv = csv.replace("Windy", "Tornado");
        let rows = Table::from_csv_reader(csv.as_bytes()).unwrap();

        let report = svc.run_batch(&rows, Some(AnnotateOptions::default())).unwrap();
        let predictions = report.table.column(PREDICTION_COLUMN).unwrap();
        assert!(predictions[3].starts_with(ERROR_MARKER));
        assert_eq!(report.table.column("Confidence_Lower").unwrap()[3], "");
        let summary = report.summary.unwrap();
        assert_eq!((summary.scored, summary.failed), (4, 1));

        let snap = svc.metrics().snapshot();
        assert_eq!((snap.batch_rows, snap.batch_row_failures), (5, 1));
    }

    #[test]
    fn presets_compare_and_dedupe() {
        let svc = service();
        let session = svc.open_session();
        for preset in Preset::ALL {
            assert!(svc.add_preset(&session, preset).unwrap());
        }
        assert!(!svc.add_preset(&session, Preset::Morning).unwrap());

        let comparison = svc.compare(&session).unwrap().unwrap();
        assert_eq!(comparison.best, "Morning Order");
        assert_eq!(comparison.worst, "Festival Rush");
        assert_eq!(svc.metrics().snapshot().scenarios_created, 4);

        svc.remove_scenario(&session, "Bad Weather").unwrap();
        assert_eq!(svc.scenarios(&session).unwrap().len(), 3);
    }

    #[test]
    fn history_analytics_and_export() {
        let svc = service();
        let session = svc.open_session();
        assert!(svc.statistics(&session).unwrap().is_none());
        for km in [2.0, 4.0, 6.0] {
            let order = DeliveryOrder {
                distance_km: km,
                ..DeliveryOrder::default()
            };
            svc.predict(&session, order).unwrap();
        }
        let stats = svc.statistics(&session).unwrap().unwrap();
        assert_eq!(stats.total_predictions, 3);
        assert_eq!(stats.average_time, 18.0);
        assert_eq!(svc.export_history(&session).unwrap().len(), 3);

        svc.clear_history(&session).unwrap();
        assert!(svc.trends(&session).unwrap().is_none());
    }
}
