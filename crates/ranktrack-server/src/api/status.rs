//! Provider connectivity report. Best-effort by design: this endpoint
//! answers 200 no matter which upstreams are down.

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use ranktrack_geocode::ProviderStatus;

use crate::middleware::RequestId;

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct StatusReport {
    dataforseo: Reachability,
    geocoding: Vec<ProviderStatus>,
}

#[derive(Debug, Serialize)]
struct Reachability {
    reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub(super) async fn api_status(
    State(state): State<AppState>,
    Extension(_req_id): Extension<RequestId>,
) -> Json<StatusReport> {
    let (dataforseo, geocoding) =
        tokio::join!(state.dataforseo.test_connection(), state.geocode.probe_all());

    let dataforseo = match dataforseo {
        Ok(true) => Reachability {
            reachable: true,
            error: None,
        },
        Ok(false) => Reachability {
            reachable: false,
            error: Some("API answered with a non-success envelope".to_string()),
        },
        Err(e) => Reachability {
            reachable: false,
            error: Some(e.to_string()),
        },
    };

    Json(StatusReport {
        dataforseo,
        geocoding,
    })
}
