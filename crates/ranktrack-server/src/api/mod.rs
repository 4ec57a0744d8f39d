mod form;
mod rankings;
mod status;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ranktrack_core::validate::ValidationError;
use ranktrack_core::AppConfig;
use ranktrack_dataforseo::DataForSeoClient;
use ranktrack_geocode::GeocodeClient;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub geocode: Arc<GeocodeClient>,
    pub dataforseo: Arc<DataForSeoClient>,
}

/// Structured error body: machine-readable kind, human-readable message,
/// optional details (e.g. per-field validation messages). Never carries
/// stack traces or credentials.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error_kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub request_id: String,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        error_kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error_kind: error_kind.into(),
            message: message.into(),
            details: None,
            request_id: request_id.into(),
        }
    }

    pub fn validation(request_id: impl Into<String>, error: &ValidationError) -> Self {
        Self {
            error_kind: "validation_error".to_string(),
            message: error.to_string(),
            details: serde_json::to_value(&error.fields).ok(),
            request_id: request_id.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error_kind.as_str() {
            "validation_error" => StatusCode::UNPROCESSABLE_ENTITY,
            "geocoding_failed" | "ranking_provider_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(form::index))
        .route("/health", get(health))
        .route("/api/status", get(status::api_status))
        .route("/api/check-rankings", post(rankings::check_rankings))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Liveness only: no external calls, 200 while the process is up.
async fn health(Extension(_req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        timestamp: Utc::now(),
    })
}
