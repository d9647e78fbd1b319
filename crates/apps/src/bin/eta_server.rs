use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use eta_apps::{router, AppState};
use eta_predictors::CombinedPipeline;
use eta_runtime::{init_tracing, MetricsRegistry, ServerArgs};

#[derive(Parser)]
#[command(name = "eta_server", about = "Form endpoint over the combined delivery-time model")]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let pipeline = match CombinedPipeline::load(&cli.server.pipeline) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            error!(error = %err, "failed to load combined pipeline");
            return Err(err).context("loading combined pipeline");
        }
    };

    let metrics = MetricsRegistry::default();
    let app = router(AppState::new(pipeline, metrics.clone()));

    let listener = tokio::net::TcpListener::bind(cli.server.bind)
        .await
        .with_context(|| format!("binding {}", cli.server.bind))?;
    info!(addr = %cli.server.bind, "eta_server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!(metrics = %metrics.snapshot().to_json_line("eta_server", None), "eta_server stopped");
    Ok(())
}
