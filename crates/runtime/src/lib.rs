//! Process bootstrap and the service facade the binaries drive.

use tracing_subscriber::filter::LevelFilter;

pub mod config;
pub mod metrics;
pub mod service;

pub use config::{ArtifactArgs, ServerArgs};
pub use metrics::{MetricsRegistry, MetricsSnapshot, StageTimer};
pub use service::{BatchReport, PredictionReport, PredictionService};

/// Installs the fmt subscriber. `RUST_LOG` wins; INFO otherwise. Safe to call twice.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init();
}
