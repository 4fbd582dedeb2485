//! HTTP API endpoints

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use pgtune_core::render::{render, OutputFormat};
use pgtune_core::{compute, InputParameters, OutputSettings, TuneError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Create the API router
pub fn create_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health))
        .route("/ping", get(ping))

        // Tuning
        .route("/api/v1/tune", get(tune).post(tune_json))
        .route("/api/v1/tune/conf", get(tune_conf))
        .route("/api/v1/tune/sql", get(tune_sql))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Tuning parameters, named after the CLI flags. Missing fields take the
/// CLI defaults.
#[derive(Debug, Default, Deserialize)]
pub struct TuneParams {
    connections: Option<u32>,
    cpus: Option<u32>,
    db_type: Option<String>,
    db_version: Option<String>,
    hd_type: Option<String>,
    total_memory: Option<u64>,
    total_memory_unit: Option<String>,
}

impl TryFrom<TuneParams> for InputParameters {
    type Error = TuneError;

    fn try_from(params: TuneParams) -> Result<Self, Self::Error> {
        let mut input = InputParameters::default();
        if let Some(connections) = params.connections {
            input.connections = connections;
        }
        if let Some(cpus) = params.cpus {
            input.cpus = cpus;
        }
        if let Some(db_type) = params.db_type {
            input.workload = db_type.parse()?;
        }
        if let Some(db_version) = params.db_version {
            input.db_version = db_version;
        }
        if let Some(hd_type) = params.hd_type {
            input.storage = hd_type.parse()?;
        }
        if let Some(total_memory) = params.total_memory {
            input.total_memory = total_memory;
        }
        if let Some(unit) = params.total_memory_unit {
            input.memory_unit = unit.parse()?;
        }
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct TuneResponse {
    pub input: InputParameters,
    pub settings: OutputSettings,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tune(#[from] TuneError),

    /// Query string or body that does not deserialize into `TuneParams`
    #[error("{0}")]
    Rejected(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Tune(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            ApiError::Tune(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: pgtune_core::VERSION.to_string(),
    })
}

async fn ping() -> &'static str {
    "pong"
}

fn calculate(params: TuneParams) -> Result<(InputParameters, OutputSettings), ApiError> {
    let input = InputParameters::try_from(params)?;
    debug!(?input, "tune request");
    let settings = compute(&input);
    Ok((input, settings))
}

type TuneQuery = Result<Query<TuneParams>, QueryRejection>;

async fn tune(params: TuneQuery) -> Result<Json<TuneResponse>, ApiError> {
    let (input, settings) = calculate(params?.0)?;
    Ok(Json(TuneResponse { input, settings }))
}

async fn tune_json(
    params: Result<Json<TuneParams>, JsonRejection>,
) -> Result<Json<TuneResponse>, ApiError> {
    tune(Ok(Query(params?.0))).await
}

async fn tune_conf(params: TuneQuery) -> Result<String, ApiError> {
    let (input, settings) = calculate(params?.0)?;
    Ok(render(&input, &settings, OutputFormat::Conf)?)
}

async fn tune_sql(params: TuneQuery) -> Result<String, ApiError> {
    let (input, settings) = calculate(params?.0)?;
    Ok(render(&input, &settings, OutputFormat::AlterSystem)?)
}
