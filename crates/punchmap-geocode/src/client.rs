//! HTTP client for a Nominatim-style forward/reverse geocoding service.
//!
//! Every request carries its own bounded timeout; a timed-out or failed call
//! surfaces as an error the caller logs and absorbs, never a crash. The
//! service's usage policy demands an identifying user agent and at most one
//! request per interval — pacing is the enrichment worker's job, not ours.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::names::{country_name_to_code, state_name_to_code};
use crate::types::{
    AddressParts, Coordinates, ResolvedAddress, ReverseResponse, SearchResult,
};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Fallback display string when the reverse endpoint omits `display_name`.
const UNKNOWN_ADDRESS: &str = "unknown";

/// Client for the geocoding service.
///
/// Use [`GeocodeClient::new`] for production or
/// [`GeocodeClient::with_base_url`] to point at a mock server in tests.
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a new client pointed at the public service.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(user_agent, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends the endpoint path instead of replacing a segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Forward geocode: address components → coordinates.
    ///
    /// Builds one free-text query from the non-empty components, asks the
    /// search endpoint for a single result, and returns its coordinates.
    /// Returns `Ok(None)` when there is nothing to query, the service finds
    /// no match, or the result's coordinates do not parse.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected JSON.
    pub async fn geocode(
        &self,
        parts: &AddressParts,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        let Some(query) = parts.to_query() else {
            tracing::warn!("cannot geocode: no address components available");
            return Ok(None);
        };

        let mut url = self.endpoint("search");
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        let body = self.request_text(&url).await?;
        let results: Vec<SearchResult> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;

        let Some(first) = results.first() else {
            tracing::warn!(query = %query, "no geocode results");
            return Ok(None);
        };

        match (first.lat.parse::<f64>(), first.lon.parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => Ok(Some(Coordinates {
                latitude,
                longitude,
            })),
            _ => {
                tracing::warn!(query = %query, "geocode result has unparseable coordinates");
                Ok(None)
            }
        }
    }

    /// Reverse geocode: coordinates → address components.
    ///
    /// Country and state names are mapped through the name→code tables; the
    /// country code is resolved first and passed as context so same-named
    /// regions in different countries resolve correctly. Returns `Ok(None)`
    /// when the service has no address for the coordinates.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected JSON.
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<ResolvedAddress>, GeocodeError> {
        let mut url = self.endpoint("reverse");
        url.query_pairs_mut()
            .append_pair("lat", &latitude.to_string())
            .append_pair("lon", &longitude.to_string())
            .append_pair("format", "json");

        let body = self.request_text(&url).await?;
        let response: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("reverse(lat={latitude}, lon={longitude})"),
                source: e,
            })?;

        let Some(addr) = response.address else {
            tracing::warn!(latitude, longitude, "no address for coordinates");
            return Ok(None);
        };

        // Country first: the state lookup needs it for disambiguation.
        let country = addr.country.as_deref().and_then(country_name_to_code);
        let state = addr
            .state
            .as_deref()
            .and_then(|s| state_name_to_code(s, country.as_deref()));

        Ok(Some(ResolvedAddress {
            address: response
                .display_name
                .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
            housenumber: addr.house_number,
            street: addr.road.or(addr.street),
            city: addr.city.or(addr.town).or(addr.village),
            state,
            country,
            postcode: addr.postcode,
        }))
    }

    fn endpoint(&self, path: &str) -> Url {
        // base_url always ends in '/', so join replaces nothing.
        self.base_url
            .join(path)
            .expect("endpoint path is a valid URL segment")
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and returns the body.
    async fn request_text(&self, url: &Url) -> Result<String, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}
