//! The fallback chain: tries providers in priority order and stops at
//! the first one that yields a usable candidate.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use ranktrack_core::models::{GeoLocation, LocationInput};
use ranktrack_core::AppConfig;

use crate::error::GeocodeError;
use crate::provider::Provider;

/// Fixed query used by reachability probes; any resolvable place works,
/// this one matches what every provider has indexed.
const PROBE_QUERY: &str = "New York, NY";

/// Reachability report for one provider, consumed by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub name: &'static str,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Geocoding client holding the HTTP client and the ordered provider chain.
pub struct GeocodeClient {
    client: Client,
    providers: Vec<Provider>,
}

impl GeocodeClient {
    /// Builds the provider chain from configuration: Google when a key is
    /// present, then OpenCage when a key is present, then the keyless
    /// Nominatim fallback which is always available.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        let mut providers = Vec::new();
        if let Some(key) = &config.google_maps_api_key {
            providers.push(Provider::google(key.clone()));
        }
        if let Some(key) = &config.opencage_api_key {
            providers.push(Provider::opencage(key.clone()));
        }
        providers.push(Provider::nominatim());

        Self::with_providers(providers, config.geocode_timeout_secs, &config.user_agent)
    }

    /// Builds a client with an explicit provider chain (for tests pointing
    /// providers at mock servers).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_providers(
        providers: Vec<Provider>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, providers })
    }

    /// Provider tags in chain order, for logging and the status report.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(Provider::name).collect()
    }

    /// Resolves a location to coordinates, trying each provider in order
    /// and stopping at the first success. A timeout, non-2xx response,
    /// malformed body, or empty candidate list counts as that provider's
    /// failure and moves on to the next one.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::AllProvidersFailed`] with the attempted
    /// provider list and the last underlying error once the chain is
    /// exhausted.
    pub async fn resolve(&self, location: &LocationInput) -> Result<GeoLocation, GeocodeError> {
        let query = location.query_string();
        let mut attempted = Vec::new();
        let mut last_error = String::from("no providers configured");

        for provider in &self.providers {
            attempted.push(provider.name().to_string());
            match provider.resolve(&self.client, &query).await {
                Ok(candidate) => {
                    tracing::info!(
                        provider = provider.name(),
                        latitude = candidate.latitude,
                        longitude = candidate.longitude,
                        "geocoded location"
                    );
                    return Ok(GeoLocation {
                        address: candidate.display_address.unwrap_or_else(|| query.clone()),
                        pincode: location.pincode.clone(),
                        latitude: candidate.latitude,
                        longitude: candidate.longitude,
                        city: candidate.city.or_else(|| location.city.clone()),
                        country: candidate.country.or_else(|| location.country.clone()),
                        provider: provider.name().to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "geocoding attempt failed");
                    last_error = e.to_string();
                }
            }
        }

        Err(GeocodeError::AllProvidersFailed {
            attempted,
            last_error,
        })
    }

    /// Probes every provider in the chain with a fixed query and reports
    /// per-provider reachability. Never fails; unreachable providers come
    /// back with `reachable: false` and an error string.
    pub async fn probe_all(&self) -> Vec<ProviderStatus> {
        let mut statuses = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let status = match provider.resolve(&self.client, PROBE_QUERY).await {
                Ok(_) => ProviderStatus {
                    name: provider.name(),
                    reachable: true,
                    error: None,
                },
                Err(e) => ProviderStatus {
                    name: provider.name(),
                    reachable: false,
                    error: Some(e.to_string()),
                },
            };
            statuses.push(status);
        }
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_keys(google: Option<&str>, opencage: Option<&str>) -> AppConfig {
        AppConfig {
            dataforseo_login: "login".to_string(),
            dataforseo_password: "password".to_string(),
            google_maps_api_key: google.map(ToOwned::to_owned),
            opencage_api_key: opencage.map(ToOwned::to_owned),
            env: ranktrack_core::Environment::Test,
            bind_addr: "127.0.0.1:8000".parse().expect("valid addr"),
            log_level: "info".to_string(),
            default_depth: 40,
            max_depth: 100,
            request_timeout_secs: 30,
            geocode_timeout_secs: 10,
            user_agent: "ranktrack-test/0.1".to_string(),
        }
    }

    #[test]
    fn chain_with_both_keys_orders_google_opencage_nominatim() {
        let client = GeocodeClient::from_config(&config_with_keys(Some("g"), Some("oc")))
            .expect("client should build");
        assert_eq!(client.provider_names(), vec!["google", "opencage", "nominatim"]);
    }

    #[test]
    fn chain_without_keys_is_nominatim_only() {
        let client =
            GeocodeClient::from_config(&config_with_keys(None, None)).expect("client should build");
        assert_eq!(client.provider_names(), vec!["nominatim"]);
    }

    #[test]
    fn chain_with_opencage_only_skips_google() {
        let client = GeocodeClient::from_config(&config_with_keys(None, Some("oc")))
            .expect("client should build");
        assert_eq!(client.provider_names(), vec!["opencage", "nominatim"]);
    }
}
