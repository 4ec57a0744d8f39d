//! HTTP client for the DataForSEO live SERP endpoints.
//!
//! Wraps `reqwest` with basic-auth credential handling, envelope/task
//! status triage, and typed item parsing. Auth failures are surfaced as
//! [`DataForSeoError::Auth`] and treated as fatal; anything else is a
//! per-leg error the caller may isolate.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::json;

use ranktrack_core::models::{Device, GeoLocation, MapsResult, OrganicResult};

use crate::error::DataForSeoError;
use crate::language::language_name;
use crate::types::{Envelope, SerpItem, STATUS_OK};

const ORGANIC_PATH: &str = "serp/google/organic/live/advanced";
const MAPS_PATH: &str = "serp/google/maps/live/advanced";

/// The maps endpoint returns far fewer usable positions than organic;
/// requesting more than this wastes quota (original-tool behavior).
const MAPS_DEPTH_CAP: u32 = 40;

/// Zoom level appended to `location_coordinate`, city-scale per the
/// DataForSEO task format.
const COORDINATE_ZOOM: u32 = 17;

/// Merged outcome of the two SERP legs. A transient failure on one leg
/// leaves its list empty and adds a warning; it never corrupts the other.
#[derive(Debug, Default)]
pub struct RankingOutcome {
    pub organic: Vec<OrganicResult>,
    pub maps: Vec<MapsResult>,
    pub warnings: Vec<String>,
}

/// Client for the DataForSEO SERP API.
///
/// The base URL is injected, so tests point the same client at a mock
/// server while the server binary passes the live or sandbox endpoint.
pub struct DataForSeoClient {
    client: Client,
    login: String,
    password: String,
    base_url: Url,
    max_depth: u32,
}

impl DataForSeoClient {
    /// Creates a client for the given DataForSEO base URL: live or
    /// sandbox per configuration, or a wiremock server in tests.
    ///
    /// # Errors
    ///
    /// Returns [`DataForSeoError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed, or
    /// [`DataForSeoError::Api`] if `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        login: &str,
        password: &str,
        timeout_secs: u64,
        max_depth: u32,
        user_agent: &str,
    ) -> Result<Self, DataForSeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| DataForSeoError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            login: login.to_owned(),
            password: password.to_owned(),
            base_url,
            max_depth,
        })
    }

    /// Runs both SERP legs concurrently and merges them.
    ///
    /// The legs have no ordering dependency; each failure is isolated to
    /// its own leg (empty list plus a warning) unless it is fatal —
    /// authentication and depth violations abort the whole call.
    ///
    /// # Errors
    ///
    /// - [`DataForSeoError::InvalidDepth`] before any network call when
    ///   `depth` is 0 or above the configured maximum.
    /// - [`DataForSeoError::Auth`] if either leg is rejected for
    ///   credentials; both legs share them, so retrying the other is
    ///   pointless.
    /// - [`DataForSeoError::Quota`] if either leg reports the account
    ///   out of funds or rate-limited; the other leg draws on the same
    ///   account.
    pub async fn fetch_rankings(
        &self,
        keyword: &str,
        location: &GeoLocation,
        device: Device,
        language_code: &str,
        depth: u32,
    ) -> Result<RankingOutcome, DataForSeoError> {
        self.check_depth(depth)?;

        let (organic, maps) = tokio::join!(
            self.organic_rankings(keyword, location, device, language_code, depth),
            self.maps_rankings(keyword, location, device, language_code, depth),
        );

        let mut outcome = RankingOutcome::default();
        match organic {
            Ok(results) => outcome.organic = results,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "organic leg failed; returning empty list");
                outcome
                    .warnings
                    .push(format!("organic results unavailable: {e}"));
            }
        }
        match maps {
            Ok(results) => outcome.maps = results,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "maps leg failed; returning empty list");
                outcome
                    .warnings
                    .push(format!("maps results unavailable: {e}"));
            }
        }
        Ok(outcome)
    }

    /// Fetches organic SERP rankings at the resolved coordinates.
    ///
    /// # Errors
    ///
    /// - [`DataForSeoError::InvalidDepth`] before any network call.
    /// - [`DataForSeoError::Auth`] on credential rejection.
    /// - [`DataForSeoError::Api`] on a non-success envelope or task status.
    /// - [`DataForSeoError::Http`] / [`DataForSeoError::Deserialize`] on
    ///   transport or body-shape failures.
    pub async fn organic_rankings(
        &self,
        keyword: &str,
        location: &GeoLocation,
        device: Device,
        language_code: &str,
        depth: u32,
    ) -> Result<Vec<OrganicResult>, DataForSeoError> {
        self.check_depth(depth)?;

        let task = json!({
            "keyword": keyword,
            "location_coordinate": coordinate_param(location),
            "language_name": language_name(language_code),
            "device": device.to_string(),
            "depth": depth,
            "calculate_rectangles": false,
            "include_serp_info": true,
        });

        tracing::info!(keyword, device = %device, depth, "requesting organic rankings");
        let items = self.post_task(ORGANIC_PATH, &task).await?;

        let mut results: Vec<OrganicResult> = items
            .into_iter()
            .filter(|item| item.item_type == "organic")
            .filter_map(SerpItem::into_organic)
            .collect();
        results.truncate(depth as usize);
        tracing::info!(count = results.len(), "parsed organic results");
        Ok(results)
    }

    /// Fetches local-pack / maps rankings at the resolved coordinates.
    /// Depth is capped at 40 for this leg.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DataForSeoClient::organic_rankings`].
    pub async fn maps_rankings(
        &self,
        keyword: &str,
        location: &GeoLocation,
        device: Device,
        language_code: &str,
        depth: u32,
    ) -> Result<Vec<MapsResult>, DataForSeoError> {
        self.check_depth(depth)?;

        let task = json!({
            "keyword": keyword,
            "location_coordinate": coordinate_param(location),
            "language_name": language_name(language_code),
            "device": device.to_string(),
            "depth": depth.min(MAPS_DEPTH_CAP),
        });

        tracing::info!(keyword, device = %device, depth, "requesting maps rankings");
        let items = self.post_task(MAPS_PATH, &task).await?;

        let mut results: Vec<MapsResult> = items
            .into_iter()
            .filter(|item| item.item_type == "maps_paid" || item.item_type == "local_pack")
            .filter_map(SerpItem::into_maps)
            .collect();
        results.truncate(depth as usize);
        tracing::info!(count = results.len(), "parsed maps results");
        Ok(results)
    }

    /// Lightweight connectivity check for the status endpoint: a depth-1
    /// organic task against a fixed keyword.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the API is unreachable or
    /// rejects the request; `Ok(true)` means a fully successful envelope.
    pub async fn test_connection(&self) -> Result<bool, DataForSeoError> {
        let task = json!({
            "keyword": "test",
            "location_name": "United States",
            "language_name": "English",
            "device": "desktop",
            "depth": 1,
        });
        let url = self.endpoint(ORGANIC_PATH)?;
        let envelope = self.send_task(&url, &task).await?;
        Ok(envelope.status_code == STATUS_OK)
    }

    fn check_depth(&self, depth: u32) -> Result<(), DataForSeoError> {
        if depth == 0 || depth > self.max_depth {
            return Err(DataForSeoError::InvalidDepth {
                depth,
                max: self.max_depth,
            });
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, DataForSeoError> {
        self.base_url
            .join(path)
            .map_err(|e| DataForSeoError::Api(format!("invalid endpoint path '{path}': {e}")))
    }

    /// POSTs a single task and returns the items of its first result.
    async fn post_task(
        &self,
        path: &str,
        task: &serde_json::Value,
    ) -> Result<Vec<SerpItem>, DataForSeoError> {
        let url = self.endpoint(path)?;
        let envelope = self.send_task(&url, task).await?;

        let task_entry = envelope
            .tasks
            .into_iter()
            .next()
            .ok_or_else(|| DataForSeoError::Api("no tasks in response".to_string()))?;

        if is_auth_status(task_entry.status_code) {
            return Err(DataForSeoError::Auth(status_message(
                task_entry.status_code,
                task_entry.status_message.as_deref(),
            )));
        }
        if is_quota_status(task_entry.status_code) {
            return Err(DataForSeoError::Quota(status_message(
                task_entry.status_code,
                task_entry.status_message.as_deref(),
            )));
        }
        if task_entry.status_code != STATUS_OK {
            return Err(DataForSeoError::Api(status_message(
                task_entry.status_code,
                task_entry.status_message.as_deref(),
            )));
        }

        let items = task_entry
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|r| r.items)
            .unwrap_or_default();
        Ok(items)
    }

    /// Sends one task array-of-one with basic auth and parses the envelope.
    async fn send_task(
        &self,
        url: &Url,
        task: &serde_json::Value,
    ) -> Result<Envelope, DataForSeoError> {
        let response = self
            .client
            .post(url.clone())
            .basic_auth(&self.login, Some(&self.password))
            .json(&json!([task]))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DataForSeoError::Auth(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url.path()
            )));
        }
        if status == StatusCode::PAYMENT_REQUIRED || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataForSeoError::Quota(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url.path()
            )));
        }
        let response = response.error_for_status()?;

        let body = response.text().await?;
        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|e| DataForSeoError::Deserialize {
                context: url.path().to_string(),
                source: e,
            })?;

        if is_auth_status(envelope.status_code) {
            return Err(DataForSeoError::Auth(status_message(
                envelope.status_code,
                envelope.status_message.as_deref(),
            )));
        }
        if is_quota_status(envelope.status_code) {
            return Err(DataForSeoError::Quota(status_message(
                envelope.status_code,
                envelope.status_message.as_deref(),
            )));
        }
        if envelope.status_code != STATUS_OK {
            return Err(DataForSeoError::Api(status_message(
                envelope.status_code,
                envelope.status_message.as_deref(),
            )));
        }
        Ok(envelope)
    }
}

/// `"lat,lng,zoom"` as the task format expects.
fn coordinate_param(location: &GeoLocation) -> String {
    format!(
        "{},{},{COORDINATE_ZOOM}",
        location.latitude, location.longitude
    )
}

/// DataForSEO uses 401xx status codes for credential problems.
fn is_auth_status(status_code: u64) -> bool {
    (40_100..40_200).contains(&status_code)
}

/// 402xx status codes cover payment and money-limit problems,
/// e.g. 40201 "Money limit exceeded".
fn is_quota_status(status_code: u64) -> bool {
    (40_200..40_300).contains(&status_code)
}

fn status_message(status_code: u64, message: Option<&str>) -> String {
    match message {
        Some(m) => format!("{status_code}: {m}"),
        None => format!("status code {status_code}"),
    }
}
