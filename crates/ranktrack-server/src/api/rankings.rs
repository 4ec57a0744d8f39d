//! The main orchestration handler: validate → geocode → rank → assemble.

use std::time::Instant;

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use ranktrack_core::models::{RankingRequest, RankingResponse};
use ranktrack_core::validate::validate_request;
use ranktrack_dataforseo::DataForSeoError;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) async fn check_rankings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<RankingRequest>,
) -> Result<Json<RankingResponse>, ApiError> {
    let started = Instant::now();

    let valid = validate_request(&request, state.config.default_depth, state.config.max_depth)
        .map_err(|e| ApiError::validation(req_id.0.clone(), &e))?;

    tracing::info!(keyword = %valid.keyword, depth = valid.depth, "processing ranking request");

    // Ranking needs coordinates; a geocoding failure ends the request
    // before any SERP call is issued.
    let location = state.geocode.resolve(&valid.location).await.map_err(|e| {
        tracing::error!(error = %e, "geocoding failed");
        ApiError::new(req_id.0.clone(), "geocoding_failed", e.to_string())
    })?;

    let outcome = state
        .dataforseo
        .fetch_rankings(
            &valid.keyword,
            &location,
            valid.device,
            &valid.language_code,
            valid.depth,
        )
        .await
        .map_err(|e| map_ranking_error(req_id.0.clone(), &e))?;

    let processing_time_seconds = started.elapsed().as_secs_f64();
    tracing::info!(
        organic = outcome.organic.len(),
        maps = outcome.maps.len(),
        elapsed = processing_time_seconds,
        "ranking request completed"
    );

    Ok(Json(RankingResponse {
        keyword: valid.keyword,
        location,
        device: valid.device,
        language_code: valid.language_code,
        depth: valid.depth,
        organic_results: outcome.organic,
        maps_results: outcome.maps,
        warnings: outcome.warnings,
        check_date: Utc::now(),
        processing_time_seconds,
    }))
}

/// Fatal ranking-client errors mapped to client-visible kinds. The error
/// display never contains credentials; auth messages carry only the
/// provider's status text.
fn map_ranking_error(request_id: String, error: &DataForSeoError) -> ApiError {
    tracing::error!(error = %error, "ranking provider call failed");
    match error {
        DataForSeoError::InvalidDepth { .. } => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        _ => ApiError::new(request_id, "ranking_provider_error", error.to_string()),
    }
}
