//! Integration tests for `GeocodeClient` using wiremock HTTP mocks.

use punchmap_geocode::{AddressParts, GeocodeClient, GeocodeError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeocodeClient {
    GeocodeClient::with_base_url("test-agent/1.0", 10, base_url)
        .expect("client construction should not fail")
}

fn trenton_parts() -> AddressParts {
    AddressParts {
        housenumber: Some("12".to_string()),
        street: Some("Main St".to_string()),
        city: Some("Trenton".to_string()),
        state: Some("NJ".to_string()),
        postcode: Some("08601".to_string()),
        country: None,
    }
}

#[tokio::test]
async fn geocode_returns_first_result_coordinates() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "lat": "40.2170534", "lon": "-74.7429384", "display_name": "Trenton, NJ" },
        { "lat": "0.0", "lon": "0.0", "display_name": "decoy" }
    ]);

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "12, Main St, Trenton, NJ, 08601"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coords = client
        .geocode(&trenton_parts())
        .await
        .expect("call should succeed")
        .expect("should find coordinates");

    assert!((coords.latitude - 40.217_053_4).abs() < 1e-9);
    assert!((coords.longitude - (-74.742_938_4)).abs() < 1e-9);
}

#[tokio::test]
async fn geocode_empty_results_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coords = client.geocode(&trenton_parts()).await.unwrap();
    assert!(coords.is_none());
}

#[tokio::test]
async fn geocode_without_components_skips_the_request() {
    let server = MockServer::start().await;
    // No mock mounted: a request would 404 and fail the call.

    let client = test_client(&server.uri());
    let coords = client.geocode(&AddressParts::default()).await.unwrap();
    assert!(coords.is_none());
}

#[tokio::test]
async fn geocode_unparseable_coordinates_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "not-a-number", "lon": "-74.0" }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coords = client.geocode(&trenton_parts()).await.unwrap();
    assert!(coords.is_none());
}

#[tokio::test]
async fn geocode_surfaces_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.geocode(&trenton_parts()).await;
    assert!(matches!(result, Err(GeocodeError::Http(_))));
}

#[tokio::test]
async fn reverse_maps_country_and_state_names_to_codes() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "display_name": "12, Main Street, Example City, New Jersey, 08601, United States",
        "address": {
            "house_number": "12",
            "road": "Main Street",
            "city": "Example City",
            "state": "New Jersey",
            "postcode": "08601",
            "country": "United States"
        }
    });

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "40"))
        .and(query_param("lon", "-74"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = client
        .reverse(40.0, -74.0)
        .await
        .expect("call should succeed")
        .expect("should resolve an address");

    assert_eq!(resolved.state.as_deref(), Some("NJ"));
    assert_eq!(resolved.country.as_deref(), Some("US"));
    assert_eq!(resolved.city.as_deref(), Some("Example City"));
    assert_eq!(resolved.street.as_deref(), Some("Main Street"));
    assert_eq!(resolved.housenumber.as_deref(), Some("12"));
    assert_eq!(resolved.postcode.as_deref(), Some("08601"));
    assert!(resolved.address.starts_with("12, Main Street"));
}

#[tokio::test]
async fn reverse_uses_country_context_for_state_lookup() {
    let server = MockServer::start().await;

    // "Ontario" resolves via the CA table because country comes back first.
    let body = serde_json::json!({
        "display_name": "Toronto, Ontario, Canada",
        "address": {
            "town": "Toronto",
            "state": "Ontario",
            "country": "Canada"
        }
    });

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = client.reverse(43.65, -79.38).await.unwrap().unwrap();

    assert_eq!(resolved.country.as_deref(), Some("CA"));
    assert_eq!(resolved.state.as_deref(), Some("ON"));
    // town fills the city slot when city is absent
    assert_eq!(resolved.city.as_deref(), Some("Toronto"));
}

#[tokio::test]
async fn reverse_without_address_is_none() {
    let server = MockServer::start().await;

    // Open-ocean coordinates: the service answers 200 with an error body.
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "Unable to geocode"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = client.reverse(0.0, -160.0).await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn reverse_surfaces_malformed_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!DOCTYPE html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.reverse(40.0, -74.0).await;
    assert!(matches!(result, Err(GeocodeError::Deserialize { .. })));
}

#[tokio::test]
async fn reverse_falls_back_to_unknown_display_name() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "address": { "city": "Example City", "country": "United States" }
    });

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolved = client.reverse(40.0, -74.0).await.unwrap().unwrap();
    assert_eq!(resolved.address, "unknown");
    assert_eq!(resolved.country.as_deref(), Some("US"));
}
