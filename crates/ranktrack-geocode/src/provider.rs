//! The individual geocoding providers, modeled as tagged variants with a
//! single dispatch point. Each variant carries its own base URL so tests
//! can point any provider at a mock server.

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::GeocodeError;

pub const GOOGLE_BASE_URL: &str = "https://maps.googleapis.com";
pub const OPENCAGE_BASE_URL: &str = "https://api.opencagedata.com";
pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// One geocoding candidate, normalized across providers.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub latitude: f64,
    pub longitude: f64,
    pub display_address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Provider {
    Google { api_key: String, base_url: String },
    OpenCage { api_key: String, base_url: String },
    Nominatim { base_url: String },
}

impl Provider {
    #[must_use]
    pub fn google(api_key: String) -> Self {
        Provider::Google {
            api_key,
            base_url: GOOGLE_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn opencage(api_key: String) -> Self {
        Provider::OpenCage {
            api_key,
            base_url: OPENCAGE_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn nominatim() -> Self {
        Provider::Nominatim {
            base_url: NOMINATIM_BASE_URL.to_string(),
        }
    }

    /// Stable tag used in logs, the status report, and `GeoLocation.provider`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Google { .. } => "google",
            Provider::OpenCage { .. } => "opencage",
            Provider::Nominatim { .. } => "nominatim",
        }
    }

    /// Issues one geocoding request for `query` and returns the first
    /// candidate.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx status.
    /// - [`GeocodeError::UnexpectedResponse`] if the body does not match
    ///   the provider's documented shape.
    /// - [`GeocodeError::NoCandidates`] on a well-formed empty result set.
    pub async fn resolve(&self, client: &Client, query: &str) -> Result<Candidate, GeocodeError> {
        match self {
            Provider::Google { api_key, base_url } => {
                self.resolve_google(client, base_url, api_key, query).await
            }
            Provider::OpenCage { api_key, base_url } => {
                self.resolve_opencage(client, base_url, api_key, query).await
            }
            Provider::Nominatim { base_url } => {
                self.resolve_nominatim(client, base_url, query).await
            }
        }
    }

    async fn resolve_google(
        &self,
        client: &Client,
        base_url: &str,
        api_key: &str,
        query: &str,
    ) -> Result<Candidate, GeocodeError> {
        let url = build_url(
            self.name(),
            base_url,
            "maps/api/geocode/json",
            &[("address", query), ("key", api_key)],
        )?;
        let response: GoogleResponse = get_json(self.name(), client, url).await?;

        if response.status != "OK" {
            return Err(GeocodeError::NoCandidates {
                provider: self.name().to_string(),
                query: query.to_string(),
            });
        }
        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoCandidates {
                provider: self.name().to_string(),
                query: query.to_string(),
            })?;

        let mut city = None;
        let mut country = None;
        for component in &first.address_components {
            if component.types.iter().any(|t| t == "locality") {
                city = Some(component.long_name.clone());
            } else if component.types.iter().any(|t| t == "country") {
                country = Some(component.long_name.clone());
            }
        }

        Ok(Candidate {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
            display_address: first.formatted_address,
            city,
            country,
        })
    }

    async fn resolve_opencage(
        &self,
        client: &Client,
        base_url: &str,
        api_key: &str,
        query: &str,
    ) -> Result<Candidate, GeocodeError> {
        let url = build_url(
            self.name(),
            base_url,
            "geocode/v1/json",
            &[("q", query), ("key", api_key), ("limit", "1")],
        )?;
        let response: OpenCageResponse = get_json(self.name(), client, url).await?;

        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoCandidates {
                provider: self.name().to_string(),
                query: query.to_string(),
            })?;

        let components = first.components;
        Ok(Candidate {
            latitude: first.geometry.lat,
            longitude: first.geometry.lng,
            display_address: first.formatted,
            // OpenCage puts the settlement under city, town, or village
            // depending on place size.
            city: components.city.or(components.town).or(components.village),
            country: components.country,
        })
    }

    async fn resolve_nominatim(
        &self,
        client: &Client,
        base_url: &str,
        query: &str,
    ) -> Result<Candidate, GeocodeError> {
        let url = build_url(
            self.name(),
            base_url,
            "search",
            &[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ],
        )?;
        let places: Vec<NominatimPlace> = get_json(self.name(), client, url).await?;

        let first = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoCandidates {
                provider: self.name().to_string(),
                query: query.to_string(),
            })?;

        // Nominatim serializes coordinates as strings.
        let latitude = parse_coordinate(self.name(), "lat", &first.lat)?;
        let longitude = parse_coordinate(self.name(), "lon", &first.lon)?;

        let (mut city, mut country) = (None, None);
        if let Some(address) = first.address {
            city = address.city.or(address.town).or(address.village);
            country = address.country;
        }
        // Older instances omit addressdetails; fall back to the
        // display_name segments the way the comma-separated format lays
        // them out (settlement near the end, country last).
        if city.is_none() || country.is_none() {
            if let Some(display_name) = &first.display_name {
                let parts: Vec<&str> = display_name.split(", ").collect();
                if parts.len() >= 2 {
                    if country.is_none() {
                        country = parts.last().map(|s| (*s).to_string());
                    }
                    if city.is_none() {
                        city = Some(parts[parts.len().saturating_sub(3)].to_string());
                    }
                }
            }
        }

        Ok(Candidate {
            latitude,
            longitude,
            display_address: first.display_name,
            city,
            country,
        })
    }
}

fn build_url(
    provider: &str,
    base_url: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Url, GeocodeError> {
    let raw = format!("{}/{path}", base_url.trim_end_matches('/'));
    let mut url = Url::parse(&raw).map_err(|e| GeocodeError::UnexpectedResponse {
        provider: provider.to_string(),
        reason: format!("invalid base URL '{base_url}': {e}"),
    })?;
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

async fn get_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    client: &Client,
    url: Url,
) -> Result<T, GeocodeError> {
    let response = client.get(url).send().await?;
    let response = response.error_for_status()?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| GeocodeError::UnexpectedResponse {
        provider: provider.to_string(),
        reason: e.to_string(),
    })
}

fn parse_coordinate(provider: &str, field: &str, raw: &str) -> Result<f64, GeocodeError> {
    raw.parse::<f64>()
        .map_err(|e| GeocodeError::UnexpectedResponse {
            provider: provider.to_string(),
            reason: format!("non-numeric {field} \"{raw}\": {e}"),
        })
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    formatted_address: Option<String>,
    geometry: GoogleGeometry,
    #[serde(default)]
    address_components: Vec<GoogleAddressComponent>,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
struct GoogleLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GoogleAddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    formatted: Option<String>,
    geometry: OpenCageGeometry,
    #[serde(default)]
    components: OpenCageComponents,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OpenCageComponents {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_are_stable() {
        assert_eq!(Provider::google("k".to_string()).name(), "google");
        assert_eq!(Provider::opencage("k".to_string()).name(), "opencage");
        assert_eq!(Provider::nominatim().name(), "nominatim");
    }

    #[test]
    fn build_url_encodes_query_parameters() {
        let url = build_url(
            "nominatim",
            "https://nominatim.openstreetmap.org/",
            "search",
            &[("q", "New York, NY"), ("format", "json")],
        )
        .expect("url should build");
        assert!(
            url.as_str().contains("q=New+York%2C+NY") || url.as_str().contains("q=New%20York"),
            "query should be percent-encoded: {url}"
        );
    }

    #[test]
    fn parse_coordinate_rejects_garbage() {
        let err = parse_coordinate("nominatim", "lat", "not-a-float").expect_err("should fail");
        assert!(matches!(err, GeocodeError::UnexpectedResponse { .. }));
    }
}
