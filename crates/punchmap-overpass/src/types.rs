//! Wire types for the Overpass interpreter response.

use serde::Deserialize;

/// Top-level envelope returned by the interpreter endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// One raw element (node, way, or relation).
///
/// Nodes carry `lat`/`lon` directly; ways and relations queried with
/// `out center;` carry a `center` object instead. Every field is optional —
/// malformed elements are skipped per-record, never fatal to the batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    pub id: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<ElementCenter>,
    #[serde(default)]
    pub tags: ElementTags,
}

impl OverpassElement {
    /// Best coordinates for this element: node `lat`/`lon` first, then the
    /// `out center;` centroid for ways and relations.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => self.center.as_ref().map(|c| (c.lat, c.lon)),
        }
    }
}

/// Centroid attached to ways/relations by `out center;`.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementCenter {
    pub lat: f64,
    pub lon: f64,
}

/// The subset of OSM tags the pipeline reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementTags {
    pub name: Option<String>,
    #[serde(rename = "addr:housenumber")]
    pub housenumber: Option<String>,
    #[serde(rename = "addr:street")]
    pub street: Option<String>,
    #[serde(rename = "addr:city")]
    pub city: Option<String>,
    #[serde(rename = "addr:state")]
    pub state: Option<String>,
    #[serde(rename = "addr:postcode")]
    pub postcode: Option<String>,
}
