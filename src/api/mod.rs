//! HTTP API
//!
//! Exposes the forecast service over JSON. Routes are served at the root and
//! again under `/api/prediction`.


use crate::error::ForecastError;
use crate::service::ForecastService;
use crate::types::{ForecastOutcome, ModelStatus, PredictionLogEntry, TrainingExample};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps service errors onto HTTP status codes
pub struct ApiError(ForecastError);

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ForecastError::BadRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ForecastError::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ForecastError::ModelNotFound | ForecastError::NoTrainingData => StatusCode::NOT_FOUND,
            ForecastError::EmptyInput | ForecastError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ForecastError::Regression(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ForecastError::Storage(_)
            | ForecastError::Serialization(_)
            | ForecastError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if !self.0.is_client_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResponse {
    pub message: String,
    pub model_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: ModelStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQuery {
    #[serde(default)]
    pub forecast_days: usize,
    pub actual_value: Option<f64>,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn train(
    State(service): State<Arc<ForecastService>>,
    body: Result<Json<Vec<f64>>, JsonRejection>,
) -> ApiResult<TrainResponse> {
    let Json(prices) = body?;
    service.train(&prices).await?;
    Ok(Json(TrainResponse {
        message: "Model trained or updated.".to_string(),
        model_path: service.model_location(),
    }))
}

async fn forecast(
    State(service): State<Arc<ForecastService>>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
    body: Result<Json<Vec<f64>>, JsonRejection>,
) -> ApiResult<ForecastOutcome> {
    let Query(query) = query?;
    let Json(price_history) = body?;
    let outcome = service
        .forecast(&price_history, query.forecast_days, query.actual_value)
        .await?;
    Ok(Json(outcome))
}

async fn correct(
    State(service): State<Arc<ForecastService>>,
    body: Result<Json<f64>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Json(actual_value) = body?;
    service.correct(actual_value).await?;
    Ok(Json(MessageResponse {
        message: "Model corrected with actual value.".to_string(),
    }))
}

async fn get_log(State(service): State<Arc<ForecastService>>) -> ApiResult<Vec<PredictionLogEntry>> {
    Ok(Json(service.prediction_log().await?))
}

async fn get_training_data(
    State(service): State<Arc<ForecastService>>,
) -> ApiResult<Vec<TrainingExample>> {
    Ok(Json(service.training_data().await?))
}

async fn clear(State(service): State<Arc<ForecastService>>) -> ApiResult<MessageResponse> {
    service.clear().await?;
    tracing::info!("Model and training data cleared by API request");
    Ok(Json(MessageResponse {
        message: "Model cleared. A new model can now be created.".to_string(),
    }))
}

async fn health(State(service): State<Arc<ForecastService>>) -> ApiResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: service.status().await?,
    }))
}

fn prediction_routes() -> Router<Arc<ForecastService>> {
    Router::new()
        .route("/train", post(train))
        .route("/forecast", post(forecast))
        .route("/correct", post(correct))
        .route("/log", get(get_log))
        .route("/training-data", get(get_training_data))
        .route("/clear", delete(clear))
}

/// Create the API router
pub fn create_router(service: Arc<ForecastService>) -> Router {
    prediction_routes()
        .nest("/api/prediction", prediction_routes())
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the API until Ctrl-C
pub async fn serve(service: Arc<ForecastService>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(service);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Forecast API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Forecast API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
