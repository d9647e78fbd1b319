use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;

use eta_predictors::ArtifactPaths;

/// Where the main pipeline's three artifacts live.
#[derive(Debug, Clone, Args)]
pub struct ArtifactArgs {
    /// Fitted categorical encoder (JSON).
    #[arg(long, env = "ETA_ENCODER_PATH", default_value = "encoder.json")]
    pub encoder: PathBuf,
    /// Fitted numeric scaler (JSON).
    #[arg(long, env = "ETA_SCALER_PATH", default_value = "scaler.json")]
    pub scaler: PathBuf,
    /// Trained regression model (JSON).
    #[arg(long, env = "ETA_MODEL_PATH", default_value = "rf_model.json")]
    pub model: PathBuf,
}

impl ArtifactArgs {
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            encoder: self.encoder.clone(),
            scaler: self.scaler.clone(),
            model: self.model.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    /// Combined feature list + model artifact for the form endpoint.
    #[arg(long, env = "ETA_PIPELINE_PATH", default_value = "delivery_time_pipeline.json")]
    pub pipeline: PathBuf,
    #[arg(long, env = "ETA_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        #[command(flatten)]
        server: ServerArgs,
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "eta",
            "--model",
            "/models/forest.json",
            "--bind",
            "0.0.0.0:8080",
        ]);
        let paths = cli.artifacts.paths();
        assert_eq!(paths.model, PathBuf::from("/models/forest.json"));
        assert_eq!(cli.server.bind.port(), 8080);
    }

    #[test]
    fn rejects_bad_bind_address() {
        assert!(Cli::try_parse_from(["eta", "--bind", "localhost"]).is_err());
    }
}
