//! Core data types shared by the service, the store and the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One supervised example: a value and the value that followed it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingExample {
    pub value: f64,
    pub label: f64,
}

impl TrainingExample {
    pub fn new(value: f64, label: f64) -> Self {
        Self { value, label }
    }
}

/// Build one training pair per element of `series`.
///
/// Element `i` is labelled with element `i + 1`. The final element has no
/// successor and is labelled with itself.
pub fn series_to_examples(series: &[f64]) -> Vec<TrainingExample> {
    series
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let label = series.get(i + 1).copied().unwrap_or(value);
            TrainingExample::new(value, label)
        })
        .collect()
}

/// A single forecast request as recorded in the prediction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionLogEntry {
    pub timestamp: DateTime<Utc>,
    /// Input series extended with every prediction made
    pub input_series: Vec<f64>,
    pub predictions: Vec<f64>,
    pub actual: Option<f64>,
    pub error: Option<f64>,
}

/// Result of a forecast call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOutcome {
    pub predictions: Vec<f64>,
    pub actual: Option<f64>,
    /// Absolute error of the final prediction against `actual`
    pub error: Option<f64>,
}

/// Snapshot of what is currently persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatus {
    pub trained: bool,
    pub algorithm: Option<String>,
    pub training_examples: Option<usize>,
    pub trained_at: Option<DateTime<Utc>>,
    pub log_entries: usize,
}
