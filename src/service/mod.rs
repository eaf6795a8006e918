//! Forecast service
//!
//! Owns the model lifecycle on top of a [`FlatFileStore`] and a
//! [`RegressionEngine`]:
//!
//! ```text
//! train(series) ──► pairs ──► engine.fit ──► store[model], store[training-data]
//! forecast(series, n) ──► store[model] ──► n x engine.predict ──► store[prediction-log]
//! correct(actual) ──► store[training-data] + 1 pair ──► train
//! ```
//!
//! Nothing is cached between calls; every operation reloads from the store.
//! All operations run under one mutex so concurrent requests against the same
//! store never interleave their reads and writes.


use crate::error::{ForecastError, Result};
use crate::ml::{RegressionEngine, RegressionModel};
use crate::storage::{FlatFileStore, StoreKey};
use crate::types::{
    series_to_examples, ForecastOutcome, ModelStatus, PredictionLogEntry, TrainingExample,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct ForecastService {
    store: Arc<dyn FlatFileStore>,
    engine: Arc<dyn RegressionEngine>,
    lock: Mutex<()>,
}

impl ForecastService {
    pub fn new(store: Arc<dyn FlatFileStore>, engine: Arc<dyn RegressionEngine>) -> Self {
        Self {
            store,
            engine,
            lock: Mutex::new(()),
        }
    }

    /// Where the model artifact is written
    pub fn model_location(&self) -> String {
        self.store.location(StoreKey::Model)
    }

    /// Train a fresh model on `series`, replacing any existing model and
    /// training data.
    pub async fn train(&self, series: &[f64]) -> Result<()> {
        if series.is_empty() {
            return Err(ForecastError::EmptyInput);
        }
        let _guard = self.lock.lock().await;
        self.fit_and_save(&series_to_examples(series)).await
    }

    /// Train on explicit pairs
    pub async fn train_examples(&self, examples: &[TrainingExample]) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.fit_and_save(examples).await
    }

    /// Recursively forecast `horizon` values after `series`.
    ///
    /// Each step feeds the previous prediction back in as the input, so
    /// errors compound with the horizon. A prediction that overflows fails
    /// the whole forecast and nothing is logged. Otherwise the request is
    /// appended to the prediction log; a failed log write is reported but
    /// does not fail the forecast.
    pub async fn forecast(
        &self,
        series: &[f64],
        horizon: usize,
        actual: Option<f64>,
    ) -> Result<ForecastOutcome> {
        if series.is_empty() {
            return Err(ForecastError::EmptyInput);
        }
        let _guard = self.lock.lock().await;
        let model = self.load_model().await?;

        let mut working = series.to_vec();
        let mut predictions = Vec::new();
        for step in 0..horizon {
            let Some(&input) = working.last() else {
                break;
            };
            let prediction = self.engine.predict(&model, input);
            debug!("Forecast step {}: {} -> {}", step + 1, input, prediction);
            if !prediction.is_finite() {
                return Err(ForecastError::Regression(format!(
                    "forecast diverged at step {} of {}: input {} predicted {}",
                    step + 1,
                    horizon,
                    input,
                    prediction
                )));
            }
            predictions.push(prediction);
            working.push(prediction);
        }

        let error = match (actual, predictions.last()) {
            (Some(actual), Some(&last)) => Some((actual - last).abs()),
            _ => None,
        };

        let entry = PredictionLogEntry {
            timestamp: Utc::now(),
            input_series: working,
            predictions: predictions.clone(),
            actual,
            error,
        };
        if let Err(e) = self.append_log(entry).await {
            warn!("Failed to append prediction log: {}", e);
        }

        Ok(ForecastOutcome {
            predictions,
            actual,
            error,
        })
    }

    /// Append `{last label, actual}` to the training data and retrain
    pub async fn correct(&self, actual: f64) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut examples = self.load_training_data().await?;
        let last = *examples.last().ok_or(ForecastError::NoTrainingData)?;
        examples.push(TrainingExample::new(last.label, actual));

        info!(
            "Correcting model with actual value {} ({} examples)",
            actual,
            examples.len()
        );
        self.fit_and_save(&examples).await
    }

    /// Delete model, training data and prediction log
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        for key in StoreKey::ALL {
            self.store.delete(key).await?;
        }
        info!("Model, training data, and logs cleared");
        Ok(())
    }

    /// Current training data; errors if there is none
    pub async fn training_data(&self) -> Result<Vec<TrainingExample>> {
        let _guard = self.lock.lock().await;
        self.load_training_data().await
    }

    /// Prediction log; empty if nothing has been logged
    pub async fn prediction_log(&self) -> Result<Vec<PredictionLogEntry>> {
        let _guard = self.lock.lock().await;
        self.load_log().await
    }

    pub async fn status(&self) -> Result<ModelStatus> {
        let _guard = self.lock.lock().await;
        let model: Option<RegressionModel> = self.read_json(StoreKey::Model).await?;
        let log_entries = self.load_log().await?.len();

        Ok(ModelStatus {
            trained: model.is_some(),
            algorithm: model.as_ref().map(|m| m.algorithm.to_string()),
            training_examples: model.as_ref().map(|m| m.training_examples),
            trained_at: model.as_ref().map(|m| m.trained_at),
            log_entries,
        })
    }

    async fn fit_and_save(&self, examples: &[TrainingExample]) -> Result<()> {
        if examples.is_empty() {
            return Err(ForecastError::EmptyInput);
        }

        let model = self.engine.fit(examples)?;
        self.store
            .write(StoreKey::Model, serde_json::to_vec(&model)?)
            .await?;
        self.store
            .write(StoreKey::TrainingData, serde_json::to_vec(examples)?)
            .await?;

        info!(
            "Trained {} model on {} examples, saved to {}",
            model.algorithm,
            examples.len(),
            self.store.location(StoreKey::Model)
        );
        Ok(())
    }

    async fn load_model(&self) -> Result<RegressionModel> {
        self.read_json(StoreKey::Model)
            .await?
            .ok_or(ForecastError::ModelNotFound)
    }

    async fn load_training_data(&self) -> Result<Vec<TrainingExample>> {
        self.read_json(StoreKey::TrainingData)
            .await?
            .ok_or(ForecastError::NoTrainingData)
    }

    async fn load_log(&self) -> Result<Vec<PredictionLogEntry>> {
        Ok(self
            .read_json(StoreKey::PredictionLog)
            .await?
            .unwrap_or_default())
    }

    async fn append_log(&self, entry: PredictionLogEntry) -> Result<()> {
        let mut log = self.load_log().await?;
        log.push(entry);
        self.store
            .write(StoreKey::PredictionLog, serde_json::to_vec(&log)?)
            .await
    }

    async fn read_json<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>> {
        match self.store.read(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
