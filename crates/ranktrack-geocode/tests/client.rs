//! Integration tests for the geocoding fallback chain using wiremock.

use ranktrack_core::models::LocationInput;
use ranktrack_geocode::{GeocodeClient, GeocodeError, Provider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(providers: Vec<Provider>) -> GeocodeClient {
    GeocodeClient::with_providers(providers, 5, "ranktrack-test/0.1")
        .expect("client construction should not fail")
}

fn address_input(address: &str) -> LocationInput {
    LocationInput {
        address: Some(address.to_string()),
        ..LocationInput::default()
    }
}

fn google_ok_body() -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "results": [
            {
                "formatted_address": "New York, NY 10001, USA",
                "geometry": { "location": { "lat": 40.7506, "lng": -73.9971 } },
                "address_components": [
                    { "long_name": "New York", "short_name": "NY", "types": ["locality", "political"] },
                    { "long_name": "United States", "short_name": "US", "types": ["country", "political"] }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn google_success_parses_coordinates_and_components() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "New York, NY, 10001"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_ok_body()))
        .mount(&server)
        .await;

    let client = test_client(vec![Provider::Google {
        api_key: "g-key".to_string(),
        base_url: server.uri(),
    }]);
    let input = LocationInput {
        address: Some("New York, NY".to_string()),
        pincode: Some("10001".to_string()),
        ..LocationInput::default()
    };

    let location = client.resolve(&input).await.expect("should geocode");
    assert!((location.latitude - 40.7506).abs() < 1e-6);
    assert!((location.longitude - -73.9971).abs() < 1e-6);
    assert_eq!(location.address, "New York, NY 10001, USA");
    assert_eq!(location.city.as_deref(), Some("New York"));
    assert_eq!(location.country.as_deref(), Some("United States"));
    assert_eq!(location.pincode.as_deref(), Some("10001"));
    assert_eq!(location.provider, "google");
}

#[tokio::test]
async fn primary_failure_falls_back_to_secondary() {
    let google = MockServer::start().await;
    let opencage = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&google)
        .await;
    Mock::given(method("GET"))
        .and(path("/geocode/v1/json"))
        .and(query_param("key", "oc-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {
                    "formatted": "Boston, MA, United States of America",
                    "geometry": { "lat": 42.3601, "lng": -71.0589 },
                    "components": { "city": "Boston", "country": "United States of America" }
                }
            ]
        })))
        .mount(&opencage)
        .await;

    let client = test_client(vec![
        Provider::Google {
            api_key: "g-key".to_string(),
            base_url: google.uri(),
        },
        Provider::OpenCage {
            api_key: "oc-key".to_string(),
            base_url: opencage.uri(),
        },
    ]);

    let location = client
        .resolve(&address_input("Boston, MA"))
        .await
        .expect("fallback should succeed");
    assert_eq!(location.provider, "opencage");
    assert_eq!(location.city.as_deref(), Some("Boston"));
}

#[tokio::test]
async fn zero_candidates_from_primary_triggers_fallback() {
    let google = MockServer::start().await;
    let nominatim = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&google)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "lat": "51.5074",
                "lon": "-0.1278",
                "display_name": "London, Greater London, England, United Kingdom",
                "address": { "city": "London", "country": "United Kingdom" }
            }
        ])))
        .mount(&nominatim)
        .await;

    let client = test_client(vec![
        Provider::Google {
            api_key: "g-key".to_string(),
            base_url: google.uri(),
        },
        Provider::Nominatim {
            base_url: nominatim.uri(),
        },
    ]);

    let location = client
        .resolve(&address_input("London"))
        .await
        .expect("fallback should succeed");
    assert_eq!(location.provider, "nominatim");
    // Nominatim coordinates arrive as strings and must parse to floats.
    assert!((location.latitude - 51.5074).abs() < 1e-6);
    assert!((location.longitude - -0.1278).abs() < 1e-6);
}

#[tokio::test]
async fn all_providers_failing_reports_attempted_chain() {
    let google = MockServer::start().await;
    let nominatim = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&google)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&nominatim)
        .await;

    let client = test_client(vec![
        Provider::Google {
            api_key: "g-key".to_string(),
            base_url: google.uri(),
        },
        Provider::Nominatim {
            base_url: nominatim.uri(),
        },
    ]);

    let err = client
        .resolve(&address_input("Nowhere"))
        .await
        .expect_err("chain should be exhausted");
    match err {
        GeocodeError::AllProvidersFailed {
            attempted,
            last_error,
        } => {
            assert_eq!(attempted, vec!["google", "nominatim"]);
            assert!(!last_error.is_empty());
        }
        other => panic!("expected AllProvidersFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn probe_all_reports_partial_reachability() {
    let google = MockServer::start().await;
    let nominatim = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_ok_body()))
        .mount(&google)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&nominatim)
        .await;

    let client = test_client(vec![
        Provider::Google {
            api_key: "g-key".to_string(),
            base_url: google.uri(),
        },
        Provider::Nominatim {
            base_url: nominatim.uri(),
        },
    ]);

    let statuses = client.probe_all().await;
    assert_eq!(statuses.len(), 2);
    assert!(statuses[0].reachable, "google probe should succeed");
    assert!(statuses[0].error.is_none());
    assert!(!statuses[1].reachable, "nominatim probe should fail");
    assert!(statuses[1].error.is_some());
}
