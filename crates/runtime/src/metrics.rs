use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    predictions_served: AtomicU64,
    prediction_failures: AtomicU64,
    batch_rows: AtomicU64,
    batch_row_failures: AtomicU64,
    scenarios_created: AtomicU64,
    history_peak: AtomicU64,
}

impl MetricsRegistry {
    pub fn inc_predictions_served(&self, delta: u64) {
        self.inner.predictions_served.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_prediction_failures(&self, delta: u64) {
        self.inner.prediction_failures.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_batch_rows(&self, delta: u64) {
        self.inner.batch_rows.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_batch_row_failures(&self, delta: u64) {
        self.inner.batch_row_failures.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_scenarios_created(&self, delta: u64) {
        self.inner.scenarios_created.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn record_history_len(&self, len: u64) {
        self.inner.history_peak.fetch_max(len, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions_served: self.inner.predictions_served.load(Ordering::Relaxed),
            prediction_failures: self.inner.prediction_failures.load(Ordering::Relaxed),
            batch_rows: self.inner.batch_rows.load(Ordering::Relaxed),
            batch_row_failures: self.inner.batch_row_failures.load(Ordering::Relaxed),
            scenarios_created: self.inner.scenarios_created.load(Ordering::Relaxed),
            history_peak: self.inner.history_peak.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub predictions_served: u64,
    pub prediction_failures: u64,
    pub batch_rows: u64,
    pub batch_row_failures: u64,
    pub scenarios_created: u64,
    pub history_peak: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Line<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Line {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct StageTimer {
    start: Instant,
}

impl StageTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn clones_share_counters() {
        let metrics = MetricsRegistry::default();
        let other = metrics.clone();
        metrics.inc_predictions_served(2);
        other.inc_batch_rows(5);
        other.record_history_len(3);
        other.record_history_len(1);
        let snap = metrics.snapshot();
        assert_eq!((snap.predictions_served, snap.batch_rows, snap.history_peak), (2, 5, 3));
    }

    #[test]
    fn json_line_is_flat() {
        let metrics = MetricsRegistry::default();
        metrics.inc_scenarios_created(1);
        let line = metrics
            .snapshot()
            .to_json_line("compare", Some(Duration::from_millis(12)));
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["label"], "compare");
        assert_eq!(value["scenarios_created"], 1);
        assert_eq!(value["elapsed_ms"], 12);
    }
}
