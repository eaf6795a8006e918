//! Error types for the forecasting service

use thiserror::Error;

/// Errors surfaced by the forecast service and its collaborators
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("No trained model found. Train the model first.")]
    ModelNotFound,

    #[error("No training data found. Train the model first.")]
    NoTrainingData,

    #[error("Price history cannot be empty.")]
    EmptyInput,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Regression failed: {0}")]
    Regression(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl ForecastError {
    /// True for errors caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::ModelNotFound
                | ForecastError::NoTrainingData
                | ForecastError::EmptyInput
                | ForecastError::BadRequest(_)
                | ForecastError::Regression(_)
        )
    }
}

impl From<::config::ConfigError> for ForecastError {
    fn from(e: ::config::ConfigError) -> Self {
        ForecastError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
