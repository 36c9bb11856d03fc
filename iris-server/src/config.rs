//! Server configuration from command-line arguments and environment

use clap::Parser;
use iris_binding::ModelPaths;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "iris-server")]
#[command(about = "Iris species prediction API backed by a pre-trained k-NN classifier")]
pub struct Args {
    /// Directory holding knn_iris_model.json and scaler_iris.json
    #[arg(long, env = "IRIS_MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,

    /// Classifier artifact path (overrides --model-dir for this file)
    #[arg(long, env = "IRIS_CLASSIFIER_PATH")]
    pub classifier: Option<PathBuf>,

    /// Scaler artifact path (overrides --model-dir for this file)
    #[arg(long, env = "IRIS_SCALER_PATH")]
    pub scaler: Option<PathBuf>,

    /// Server host
    #[arg(long, env = "IRIS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "IRIS_PORT", default_value = "8501")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Artifact locations after applying per-file overrides
    pub fn model_paths(&self) -> ModelPaths {
        let mut paths = ModelPaths::in_dir(&self.model_dir);
        if let Some(classifier) = &self.classifier {
            paths.classifier = classifier.clone();
        }
        if let Some(scaler) = &self.scaler {
            paths.scaler = scaler.clone();
        }
        paths
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}
