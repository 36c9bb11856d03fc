//! Iris Species Predictor API server binary

mod api;
mod config;

use anyhow::Context;
use clap::Parser;
use config::Args;
use iris_binding::{IrisError, ModelStore, PredictionService};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "iris_server={0},iris_binding={0},tower_http={0}",
            args.log_level
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let paths = args.model_paths();
    let store = match ModelStore::load(&paths) {
        Ok(store) => store,
        Err(e @ IrisError::ModelsUnavailable { .. }) => {
            error!(
                "Model files not found or unreadable. Please ensure '{}' and '{}' exist and are valid.",
                paths.classifier.display(),
                paths.scaler.display()
            );
            return Err(e).context("cannot serve predictions without the model artifacts");
        }
        Err(e) => return Err(e.into()),
    };

    let state = api::ApiState {
        service: Arc::new(PredictionService::new(Arc::new(store))),
    };

    let addr = args.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Iris Species Predictor listening on http://{}", addr);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolve once `signal` fires. If the listener cannot be installed, never
/// resolve so the server keeps running.
async fn wait_for_shutdown<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_resolves_shutdown() {
        let result = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for_shutdown(async { Ok(()) }),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failed_listener_keeps_serving() {
        let result = tokio::time::timeout(
            Duration::from_millis(50),
            wait_for_shutdown(async { Err(io::Error::new(io::ErrorKind::Other, "no signals")) }),
        )
        .await;
        assert!(result.is_err());
    }
}
