//! Trend Forecast Service
//!
//! Trains a single-feature regression model on a price series and forecasts
//! future values by feeding each prediction back in as the next input.
//!
//! ## Architecture
//!
//! ```text
//! HTTP API / CLI → ForecastService → RegressionEngine (Poisson | Linear)
//!                        ↓
//!                  FlatFileStore (model, training data, prediction log)
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod ml;
pub mod service;
pub mod storage;
pub mod types;

pub use error::{ForecastError, Result};
pub use service::ForecastService;

#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod config_tests;
