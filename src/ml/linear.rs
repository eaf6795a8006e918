//! Ordinary least squares on a single standardised feature

use super::{standardize, validate_examples, Algorithm, RegressionEngine, RegressionModel};
use crate::error::{ForecastError, Result};
use crate::types::TrainingExample;
use chrono::Utc;
use linfa::traits::Fit;
use linfa_linear::LinearRegression as OrdinaryLeastSquares;
use tracing::debug;

/// Least squares fit of `label = b + w * z`
#[derive(Default)]
pub struct LinearRegression;

impl LinearRegression {
    pub fn new() -> Self {
        Self
    }
}

impl RegressionEngine for LinearRegression {
    fn fit(&self, examples: &[TrainingExample]) -> Result<RegressionModel> {
        validate_examples(examples)?;
        let data = standardize(examples);

        // A constant feature makes the normal equations singular
        let (intercept, weight) = if data.constant {
            let y_mean = examples.iter().map(|e| e.label).sum::<f64>() / examples.len() as f64;
            (y_mean, 0.0)
        } else {
            let fitted = OrdinaryLeastSquares::new()
                .fit(&data.dataset)
                .map_err(|e| ForecastError::Regression(e.to_string()))?;
            (fitted.intercept(), fitted.params()[0])
        };

        debug!(
            "Linear fit: {} examples, intercept={:.6}, weight={:.6}",
            examples.len(),
            intercept,
            weight
        );

        Ok(RegressionModel {
            algorithm: Algorithm::Linear,
            intercept,
            weight,
            feature_mean: data.mean,
            feature_scale: data.scale,
            training_examples: examples.len(),
            trained_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "linear"
    }
}
