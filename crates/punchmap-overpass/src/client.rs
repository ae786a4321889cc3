//! HTTP client for an Overpass-style POI interpreter.
//!
//! One POST per bounding box, Overpass QL in the request body. The category
//! taxonomy (which amenity/shop values count as a "store") is fixed here and
//! deliberately narrow; bounding-box maths and dedup live elsewhere.

use std::time::Duration;

use reqwest::Client;

use crate::error::OverpassError;
use crate::types::OverpassResponse;

const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Amenity values that qualify as punchcard-eligible stores.
const AMENITY_FILTER: &str = "cafe|fast_food|restaurant|bar|pub";
/// Shop values that qualify as punchcard-eligible stores.
const SHOP_FILTER: &str = "bakery|convenience|deli|coffee|ice_cream";

/// Client for the Overpass interpreter endpoint.
///
/// Use [`OverpassClient::new`] for production or
/// [`OverpassClient::with_base_url`] to point at a mock server in tests.
pub struct OverpassClient {
    client: Client,
    base_url: String,
}

impl OverpassClient {
    /// Creates a new client pointed at the public Overpass interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`OverpassError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, OverpassError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom interpreter URL (for wiremock tests
    /// or a self-hosted instance).
    ///
    /// # Errors
    ///
    /// Returns [`OverpassError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, OverpassError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("punchmap/0.1 (store-discovery)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Query all qualifying POIs inside a bounding box.
    ///
    /// Bounds are degrees: `(south, west, north, east)`. Ways and relations
    /// are requested with `out center;` so they come back with a centroid.
    ///
    /// # Errors
    ///
    /// - [`OverpassError::Http`] on network failure or non-2xx HTTP status.
    /// - [`OverpassError::Deserialize`] if the body is not the expected JSON.
    pub async fn query_box(
        &self,
        min_lat: f64,
        min_lng: f64,
        max_lat: f64,
        max_lng: f64,
    ) -> Result<OverpassResponse, OverpassError> {
        let query = build_query(min_lat, min_lng, max_lat, max_lng);

        let response = self
            .client
            .post(&self.base_url)
            .body(query)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| OverpassError::Deserialize {
            context: format!("query_box({min_lat},{min_lng},{max_lat},{max_lng})"),
            source: e,
        })
    }
}

/// Assemble the Overpass QL statement for one bounding box.
fn build_query(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> String {
    let bbox = format!("({min_lat},{min_lng},{max_lat},{max_lng})");
    format!(
        "[out:json];\n(\n  \
         node[\"amenity\"~\"{AMENITY_FILTER}\"]{bbox};\n  \
         way[\"amenity\"~\"{AMENITY_FILTER}\"]{bbox};\n  \
         relation[\"amenity\"~\"{AMENITY_FILTER}\"]{bbox};\n  \
         node[\"shop\"~\"{SHOP_FILTER}\"]{bbox};\n  \
         way[\"shop\"~\"{SHOP_FILTER}\"]{bbox};\n  \
         relation[\"shop\"~\"{SHOP_FILTER}\"]{bbox};\n);\nout center;\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_query_includes_bbox_and_filters() {
        let query = build_query(-1.0, -2.0, 1.0, 2.0);
        assert!(query.contains("(-1,-2,1,2)"));
        assert!(query.contains("[out:json]"));
        assert!(query.contains("out center;"));
        assert!(query.contains(r#"node["amenity"~"cafe|fast_food|restaurant|bar|pub"]"#));
        assert!(query.contains(r#"way["shop"~"bakery|convenience|deli|coffee|ice_cream"]"#));
    }

    #[test]
    fn build_query_preserves_fractional_bounds() {
        let query = build_query(40.5, -74.25, 41.0, -73.75);
        assert!(query.contains("(40.5,-74.25,41,-73.75)"));
    }
}
