//! Single-feature regression
//!
//! Provides the fitted model artifact and the engines that produce it:
//! - Poisson regression (log link, L2-regularised, L-BFGS via `linfa-linear`)
//! - Ordinary least squares (`linfa-linear`)
//!
//! Both engines standardise the feature before fitting and store the
//! standardisation in the model so predictions need nothing else.

pub mod linear;
pub mod poisson;


pub use linear::LinearRegression;
pub use poisson::{PoissonRegression, PoissonRegressionConfig};

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::types::TrainingExample;
use chrono::{DateTime, Utc};
use linfa::Dataset;
use ndarray::{Array1, Axis, Ix1};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Regression algorithm used to fit a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Poisson,
    Linear,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Poisson => write!(f, "poisson"),
            Algorithm::Linear => write!(f, "linear"),
        }
    }
}

/// Fitted model artifact as persisted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionModel {
    pub algorithm: Algorithm,
    pub intercept: f64,
    pub weight: f64,
    pub feature_mean: f64,
    pub feature_scale: f64,
    pub training_examples: usize,
    pub trained_at: DateTime<Utc>,
}

impl RegressionModel {
    /// Linear predictor `intercept + weight * z` on the standardised input
    pub fn linear_predictor(&self, x: f64) -> f64 {
        let z = (x - self.feature_mean) / self.feature_scale;
        self.intercept + self.weight * z
    }

    pub fn predict(&self, x: f64) -> f64 {
        let eta = self.linear_predictor(x);
        match self.algorithm {
            Algorithm::Poisson => eta.exp(),
            Algorithm::Linear => eta,
        }
    }
}

/// Fit/predict over scalar features
#[cfg_attr(test, mockall::automock)]
pub trait RegressionEngine: Send + Sync {
    /// Fit a new model on `examples`
    fn fit(&self, examples: &[TrainingExample]) -> Result<RegressionModel>;

    /// Predict the label for input `x`
    fn predict(&self, model: &RegressionModel, x: f64) -> f64 {
        model.predict(x)
    }

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// Build the engine selected by configuration
pub fn build_engine(config: &ModelConfig) -> Arc<dyn RegressionEngine> {
    match config.algorithm {
        Algorithm::Poisson => Arc::new(PoissonRegression::new(PoissonRegressionConfig {
            l2_weight: config.l2_weight,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        })),
        Algorithm::Linear => Arc::new(LinearRegression::new()),
    }
}

/// Mean and scale used to standardise the feature.
///
/// A zero or non-finite spread falls back to a scale of 1.
pub(crate) fn standardization(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev.is_finite() && std_dev > f64::EPSILON {
        (mean, std_dev)
    } else {
        (mean, 1.0)
    }
}

/// True when every value is the same up to rounding
pub(crate) fn is_constant(values: &[f64]) -> bool {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    max - min <= f64::EPSILON * max.abs().max(min.abs()).max(1.0)
}

/// Training set with the feature standardised, ready for a linfa fit
pub(crate) struct StandardizedData {
    pub mean: f64,
    pub scale: f64,
    /// The feature carries no information; every record is zero
    pub constant: bool,
    pub dataset: Dataset<f64, f64, Ix1>,
}

pub(crate) fn standardize(examples: &[TrainingExample]) -> StandardizedData {
    let x: Vec<f64> = examples.iter().map(|e| e.value).collect();
    let (mean, scale) = standardization(&x);
    let constant = is_constant(&x);

    let z: Array1<f64> = x
        .iter()
        .map(|v| if constant { 0.0 } else { (v - mean) / scale })
        .collect();
    let targets: Array1<f64> = examples.iter().map(|e| e.label).collect();

    StandardizedData {
        mean,
        scale,
        constant,
        dataset: Dataset::new(z.insert_axis(Axis(1)), targets),
    }
}

/// Reject empty or non-finite training sets
pub(crate) fn validate_examples(examples: &[TrainingExample]) -> Result<()> {
    if examples.is_empty() {
        return Err(ForecastError::EmptyInput);
    }
    if let Some(bad) = examples
        .iter()
        .find(|e| !e.value.is_finite() || !e.label.is_finite())
    {
        return Err(ForecastError::Regression(format!(
            "non-finite training example: value={}, label={}",
            bad.value, bad.label
        )));
    }
    Ok(())
}
