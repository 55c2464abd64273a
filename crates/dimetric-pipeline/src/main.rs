//! dimetric daemon
//!
//! - Config path: first argument, defaults to `dimetric.yaml`
//! - Log filter: `RUST_LOG` (defaults to `info`)
//! - Runs until Ctrl-C

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use dimetric_pipeline::{config, Pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "dimetric.yaml".to_string());

    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, code = e.code().as_str(), error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::from_config(&cfg) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "pipeline setup failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%path, "dimetric starting");
    pipeline
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "ctrl_c handler failed");
            }
        })
        .await;

    ExitCode::SUCCESS
}
