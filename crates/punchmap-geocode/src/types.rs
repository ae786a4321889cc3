//! Request and response types for the geocoding client.

use serde::Deserialize;

/// Structured address components used to build a forward-geocode query.
///
/// Components are joined `", "`-separated in a fixed order: house number,
/// street, city, state, postcode, country. Empty/absent parts are skipped.
#[derive(Debug, Clone, Default)]
pub struct AddressParts {
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

impl AddressParts {
    /// The single free-text query string, or `None` when no component is set.
    #[must_use]
    pub fn to_query(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.housenumber.as_deref(),
            self.street.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.postcode.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Coordinates returned by a forward geocode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A reverse-geocoded address, with country/state already normalized to
/// 2-letter codes.
#[derive(Debug, Clone, Default)]
pub struct ResolvedAddress {
    /// Full display string from the service, or `"unknown"`.
    pub address: String,
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
}

/// One entry of the forward-search response. The service returns coordinates
/// as strings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResult {
    pub lat: String,
    pub lon: String,
}

/// The reverse endpoint's envelope. `address` is absent when the service has
/// nothing for the coordinates (open ocean, etc.).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReverseResponse {
    pub display_name: Option<String>,
    pub address: Option<ReverseAddress>,
}

/// Component sub-fields of a reverse result. The service uses different keys
/// for settlement size (`city`/`town`/`village`) and street (`road`/`street`).
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ReverseAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}
