//! Shared domain types for a single ranking check.
//!
//! Everything here is constructed once per request and treated as
//! immutable afterwards; nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form location as submitted by the client. At least one of
/// `address`, `pincode`, or `city` must be non-empty (enforced by
/// [`crate::validate::validate_request`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationInput {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl LocationInput {
    /// Joins the non-empty fields into one geocoding query string,
    /// in address → pincode → city → country order.
    #[must_use]
    pub fn query_string(&self) -> String {
        [&self.address, &self.pincode, &self.city, &self.country]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Mobile,
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Desktop => write!(f, "desktop"),
            Device::Mobile => write!(f, "mobile"),
        }
    }
}

/// Incoming ranking-check request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingRequest {
    pub keyword: String,
    pub location: LocationInput,
    #[serde(default)]
    pub device: Device,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Absent means "use the configured default depth".
    #[serde(default)]
    pub depth: Option<u32>,
}

fn default_language_code() -> String {
    "en".to_string()
}

/// Resolved coordinates plus place metadata, produced by the geocoding
/// chain and consumed read-only by the ranking client and the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Which provider in the fallback chain resolved this location.
    pub provider: String,
}

/// One organic SERP listing, in provider rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    pub position: u32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumb: Option<String>,
}

/// One local-pack / maps listing, in provider rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapsResult {
    pub position: u32,
    pub title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Full payload returned for one ranking check. Echoes the request,
/// embeds the resolved location, and carries both result legs plus any
/// partial-failure warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResponse {
    pub keyword: String,
    pub location: GeoLocation,
    pub device: Device,
    pub language_code: String,
    pub depth: u32,
    pub organic_results: Vec<OrganicResult>,
    pub maps_results: Vec<MapsResult>,
    /// Non-fatal notes, e.g. one ranking leg returning no data.
    pub warnings: Vec<String>,
    pub check_date: DateTime<Utc>,
    pub processing_time_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_query_string_joins_non_empty_fields() {
        let input = LocationInput {
            address: Some("New York, NY".to_string()),
            pincode: Some("10001".to_string()),
            city: None,
            country: Some("  ".to_string()),
        };
        assert_eq!(input.query_string(), "New York, NY, 10001");
    }

    #[test]
    fn device_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Device::Mobile).expect("serialize"),
            "\"mobile\""
        );
    }

    #[test]
    fn ranking_request_applies_serde_defaults() {
        let req: RankingRequest = serde_json::from_str(
            r#"{"keyword": "pizza", "location": {"address": "Boston"}}"#,
        )
        .expect("deserialize");
        assert_eq!(req.device, Device::Desktop);
        assert_eq!(req.language_code, "en");
        assert!(req.depth.is_none());
    }

    #[test]
    fn geo_location_omits_absent_optional_fields() {
        let loc = GeoLocation {
            address: "Boston, MA".to_string(),
            pincode: None,
            latitude: 42.36,
            longitude: -71.05,
            city: Some("Boston".to_string()),
            country: None,
            provider: "nominatim".to_string(),
        };
        let json = serde_json::to_string(&loc).expect("serialize");
        assert!(!json.contains("pincode"));
        assert!(json.contains("\"city\":\"Boston\""));
    }

    #[test]
    fn ranking_response_round_trips() {
        let response = RankingResponse {
            keyword: "pizza".to_string(),
            location: GeoLocation {
                address: "New York, NY".to_string(),
                pincode: Some("10001".to_string()),
                latitude: 40.75,
                longitude: -73.99,
                city: Some("New York".to_string()),
                country: Some("United States".to_string()),
                provider: "google".to_string(),
            },
            device: Device::Desktop,
            language_code: "en".to_string(),
            depth: 40,
            organic_results: vec![OrganicResult {
                position: 1,
                title: Some("Best Pizza".to_string()),
                description: None,
                url: Some("https://example.com/pizza".to_string()),
                domain: Some("example.com".to_string()),
                breadcrumb: None,
            }],
            maps_results: vec![],
            warnings: vec!["maps leg returned no data".to_string()],
            check_date: Utc::now(),
            processing_time_seconds: 1.25,
        };
        let json = serde_json::to_string(&response).expect("serialize");
        let parsed: RankingResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.organic_results, response.organic_results);
        assert_eq!(parsed.warnings.len(), 1);
    }
}
