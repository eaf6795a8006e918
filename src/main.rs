//! Trend Forecast Service
//!
//! Serves the forecasting API, or runs single operations against the
//! configured store from the command line.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trend_forecast::{
    api,
    config::Config,
    ml::build_engine,
    storage::{DirectoryStore, FlatFileStore, MemoryStore},
    ForecastService,
};

#[derive(Parser)]
#[command(name = "trend-forecast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train a regression model on a price series and forecast ahead")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Override the configured listen host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Keep model and logs in memory instead of the storage directory
        #[arg(long)]
        in_memory: bool,
    },
    /// Train a new model on a price series, oldest first
    Train {
        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
        /// Read the series from a JSON array file instead
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Forecast future values from a price history
    Forecast {
        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
        /// Read the history from a JSON array file instead
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Number of steps to forecast
        #[arg(short, long, default_value = "1")]
        days: usize,
        /// Observed value to score the final prediction against
        #[arg(short, long, allow_negative_numbers = true)]
        actual: Option<f64>,
    },
    /// Add an observed value to the training data and retrain
    Correct {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Print the prediction log
    Log,
    /// Print the current training data
    TrainingData,
    /// Show whether a model is trained
    Status,
    /// Delete model, training data and prediction log
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trend_forecast=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    match cli.command {
        Commands::Serve { host, port, in_memory } => {
            let service = open_service(&config, in_memory).await?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            api::serve(service, &host, port).await
        }
        Commands::Train { values, file } => {
            let series = read_series(values, file)?;
            let service = open_service(&config, false).await?;
            service.train(&series).await?;
            println!("Model trained on {} values, saved to {}", series.len(), service.model_location());
            Ok(())
        }
        Commands::Forecast { values, file, days, actual } => {
            let history = read_series(values, file)?;
            let service = open_service(&config, false).await?;
            print_json(&service.forecast(&history, days, actual).await?)
        }
        Commands::Correct { value } => {
            let service = open_service(&config, false).await?;
            service.correct(value).await?;
            println!("Model corrected with actual value {}", value);
            Ok(())
        }
        Commands::Log => {
            let service = open_service(&config, false).await?;
            print_json(&service.prediction_log().await?)
        }
        Commands::TrainingData => {
            let service = open_service(&config, false).await?;
            print_json(&service.training_data().await?)
        }
        Commands::Status => {
            let service = open_service(&config, false).await?;
            print_json(&service.status().await?)
        }
        Commands::Clear => {
            let service = open_service(&config, false).await?;
            service.clear().await?;
            println!("Model cleared. A new model can now be created.");
            Ok(())
        }
    }
}

async fn open_service(config: &Config, in_memory: bool) -> anyhow::Result<Arc<ForecastService>> {
    let store: Arc<dyn FlatFileStore> = if in_memory {
        tracing::warn!("Using in-memory storage - state is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(DirectoryStore::open(&config.storage).await?)
    };

    let engine = build_engine(&config.model);
    tracing::info!("Using {} regression", engine.name());

    Ok(Arc::new(ForecastService::new(store, engine)))
}

fn read_series(values: Vec<f64>, file: Option<PathBuf>) -> anyhow::Result<Vec<f64>> {
    match file {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of numbers", path.display()))
        }
        None => Ok(values),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
