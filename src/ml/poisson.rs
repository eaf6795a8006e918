//! Poisson regression
//!
//! Models the label as a Poisson rate `exp(b + w * z)` where `z` is the
//! standardised feature. Fitting is a `linfa-linear` Tweedie GLM with power 1
//! and a log link, which minimises the mean Poisson deviance plus
//! `l2_weight / 2 * w^2` with L-BFGS. The intercept is not penalised.

use super::{standardize, validate_examples, Algorithm, RegressionEngine, RegressionModel};
use crate::error::{ForecastError, Result};
use crate::types::TrainingExample;
use chrono::Utc;
use linfa::traits::Fit;
use linfa_linear::{Link, TweedieRegressor};
use tracing::debug;

/// Floor for the rate when every label is zero
const MIN_RATE: f64 = 1e-9;

/// Configuration for Poisson regression
#[derive(Debug, Clone)]
pub struct PoissonRegressionConfig {
    /// L2 penalty on the feature weight
    pub l2_weight: f64,
    /// Maximum number of L-BFGS iterations
    pub max_iterations: usize,
    /// Gradient tolerance for L-BFGS
    pub tolerance: f64,
}

impl Default for PoissonRegressionConfig {
    fn default() -> Self {
        Self {
            l2_weight: 1e-4,
            max_iterations: 100,
            tolerance: 1e-7,
        }
    }
}

/// Poisson regression engine
pub struct PoissonRegression {
    config: PoissonRegressionConfig,
}

impl PoissonRegression {
    pub fn new(config: PoissonRegressionConfig) -> Self {
        Self { config }
    }
}

impl Default for PoissonRegression {
    fn default() -> Self {
        Self::new(PoissonRegressionConfig::default())
    }
}

impl RegressionEngine for PoissonRegression {
    fn fit(&self, examples: &[TrainingExample]) -> Result<RegressionModel> {
        validate_examples(examples)?;
        if let Some(bad) = examples.iter().find(|e| e.label < 0.0) {
            return Err(ForecastError::Regression(format!(
                "Poisson regression requires non-negative labels, got {}",
                bad.label
            )));
        }

        let data = standardize(examples);

        // The log link starts from ln(mean label), which is -inf for all zeros
        let (intercept, weight) = if examples.iter().all(|e| e.label == 0.0) {
            (MIN_RATE.ln(), 0.0)
        } else {
            let fitted = TweedieRegressor::params()
                .power(1.0)
                .link(Link::Log)
                .alpha(self.config.l2_weight)
                .max_iter(self.config.max_iterations)
                .tol(self.config.tolerance)
                .fit(&data.dataset)
                .map_err(|e| ForecastError::Regression(e.to_string()))?;
            (fitted.intercept, fitted.coef[0])
        };

        if !intercept.is_finite() || !weight.is_finite() {
            return Err(ForecastError::Regression(
                "Poisson regression diverged".to_string(),
            ));
        }

        debug!(
            "Poisson fit: {} examples, intercept={:.6}, weight={:.6}",
            examples.len(),
            intercept,
            weight
        );

        Ok(RegressionModel {
            algorithm: Algorithm::Poisson,
            intercept,
            weight,
            feature_mean: data.mean,
            feature_scale: data.scale,
            training_examples: examples.len(),
            trained_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "poisson"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples(pairs: &[(f64, f64)]) -> Vec<TrainingExample> {
        pairs.iter().map(|&(v, l)| TrainingExample::new(v, l)).collect()
    }

    #[test]
    fn test_constant_labels_predict_the_constant() {
        let engine = PoissonRegression::default();
        let model = engine
            .fit(&examples(&[(1.0, 5.0), (2.0, 5.0), (3.0, 5.0), (4.0, 5.0)]))
            .unwrap();

        assert!(model.weight.abs() < 1e-4);
        assert!((engine.predict(&model, 2.5) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_example() {
        let engine = PoissonRegression::default();
        let model = engine.fit(&examples(&[(13.0, 13.0)])).unwrap();

        assert_eq!(model.feature_scale, 1.0);
        assert_eq!(model.weight, 0.0);
        assert!((engine.predict(&model, 13.0) - 13.0).abs() < 1e-3);
    }

    #[test]
    fn test_increasing_relation() {
        let engine = PoissonRegression::default();
        let pairs: Vec<(f64, f64)> = (1..20).map(|i| (i as f64, i as f64 + 1.0)).collect();
        let model = engine.fit(&examples(&pairs)).unwrap();

        assert!(model.weight > 0.0);
        assert!(engine.predict(&model, 15.0) > engine.predict(&model, 5.0));
    }

    #[test]
    fn test_rejects_negative_labels() {
        let engine = PoissonRegression::default();
        let result = engine.fit(&examples(&[(1.0, 2.0), (2.0, -1.0)]));
        assert!(matches!(result, Err(ForecastError::Regression(_))));
    }

    #[test]
    fn test_all_zero_labels_stay_finite() {
        let engine = PoissonRegression::default();
        let model = engine
            .fit(&examples(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]))
            .unwrap();

        let prediction = engine.predict(&model, 2.0);
        assert!(prediction.is_finite());
        assert!(prediction < 1e-6);
    }

    #[test]
    fn test_penalty_shrinks_weight() {
        let pairs: Vec<(f64, f64)> = (1..10).map(|i| (i as f64, 2.0 * i as f64)).collect();
        let loose = PoissonRegression::default().fit(&examples(&pairs)).unwrap();
        let tight = PoissonRegression::new(PoissonRegressionConfig {
            l2_weight: 10.0,
            ..Default::default()
        })
        .fit(&examples(&pairs))
        .unwrap();

        assert!(tight.weight > 0.0);
        assert!(tight.weight < loose.weight);
    }
}
