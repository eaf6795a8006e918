//! Configuration loading
//!
//! Values come from an optional TOML file, overridden by environment
//! variables prefixed with `TREND_FORECAST`, e.g.
//! `TREND_FORECAST__SERVER__PORT=9000`.

use crate::error::Result;
use crate::ml::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl Config {
    /// Load configuration from `path` (if present) plus environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("TREND_FORECAST")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where the model, training data and prediction log live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: String,
    #[serde(default = "default_model_file")]
    pub model_file: String,
    #[serde(default = "default_training_data_file")]
    pub training_data_file: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl StorageConfig {
    /// Storage directory with `~` and environment variables expanded
    pub fn resolved_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::full(&self.dir)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| self.dir.clone()))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            model_file: default_model_file(),
            training_data_file: default_training_data_file(),
            log_file: default_log_file(),
        }
    }
}

/// Regression settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub algorithm: Algorithm,
    /// L2 penalty on the Poisson feature weight
    #[serde(default = "default_l2_weight")]
    pub l2_weight: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// L-BFGS gradient tolerance
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            l2_weight: default_l2_weight(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage_dir() -> String {
    "./Models".to_string()
}

fn default_model_file() -> String {
    "model.json".to_string()
}

fn default_training_data_file() -> String {
    "training_data.json".to_string()
}

fn default_log_file() -> String {
    "prediction_log.json".to_string()
}

fn default_l2_weight() -> f64 {
    1e-4
}

fn default_max_iterations() -> usize {
    100
}

fn default_tolerance() -> f64 {
    1e-7
}
