//! Name→code lookup tables for countries and states/provinces.
//!
//! The mapping data ships inside the binary (`include_str!`) and is parsed
//! once per table on first use. Keys are normalized — trimmed, lowercased,
//! internal whitespace collapsed — so `"  new   Jersey "` still resolves.
//! Unknown names resolve to `None` and log a warning; a missed lookup never
//! fails the enrichment operation that asked for it.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static COUNTRIES: OnceLock<HashMap<String, String>> = OnceLock::new();
static COUNTRY_CODES: OnceLock<HashSet<String>> = OnceLock::new();
static US_STATES: OnceLock<HashMap<String, String>> = OnceLock::new();
static CA_PROVINCES: OnceLock<HashMap<String, String>> = OnceLock::new();
static MX_STATES: OnceLock<HashMap<String, String>> = OnceLock::new();
static AU_STATES: OnceLock<HashMap<String, String>> = OnceLock::new();
static DE_STATES: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Normalize a name for lookup: trim, lowercase, collapse internal whitespace.
fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse an embedded JSON mapping into a normalized-key table.
///
/// The data files are compile-time constants, so a parse failure is a
/// programming error, not a runtime condition.
fn load_table(raw: &str, context: &str) -> HashMap<String, String> {
    let parsed: HashMap<String, String> = serde_json::from_str(raw)
        .unwrap_or_else(|e| panic!("embedded mapping {context} is invalid JSON: {e}"));

    parsed
        .into_iter()
        .filter_map(|(name, code)| {
            let normalized = normalize_name(&name);
            if normalized.is_empty() {
                None
            } else {
                Some((normalized, code))
            }
        })
        .collect()
}

fn countries() -> &'static HashMap<String, String> {
    COUNTRIES.get_or_init(|| load_table(include_str!("../data/countries.json"), "countries.json"))
}

fn country_codes() -> &'static HashSet<String> {
    COUNTRY_CODES.get_or_init(|| countries().values().cloned().collect())
}

fn us_states() -> &'static HashMap<String, String> {
    US_STATES.get_or_init(|| load_table(include_str!("../data/us-states.json"), "us-states.json"))
}

fn ca_provinces() -> &'static HashMap<String, String> {
    CA_PROVINCES
        .get_or_init(|| load_table(include_str!("../data/ca-provinces.json"), "ca-provinces.json"))
}

fn mx_states() -> &'static HashMap<String, String> {
    MX_STATES.get_or_init(|| load_table(include_str!("../data/mx-states.json"), "mx-states.json"))
}

fn au_states() -> &'static HashMap<String, String> {
    AU_STATES.get_or_init(|| load_table(include_str!("../data/au-states.json"), "au-states.json"))
}

fn de_states() -> &'static HashMap<String, String> {
    DE_STATES.get_or_init(|| load_table(include_str!("../data/de-states.json"), "de-states.json"))
}

/// Convert a country name to its ISO 3166-1 alpha-2 code.
///
/// Already-2-letter input is validated against the known code set and
/// returned uppercased, so the function is idempotent:
/// `country_name_to_code("US") == Some("US")`.
///
/// Unknown names return `None` and log a warning.
#[must_use]
pub fn country_name_to_code(country_name: &str) -> Option<String> {
    let trimmed = country_name.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().count() == 2 {
        let upper = trimmed.to_uppercase();
        if country_codes().contains(&upper) {
            return Some(upper);
        }
    }

    let normalized = normalize_name(trimmed);
    match countries().get(&normalized) {
        Some(code) => Some(code.clone()),
        None => {
            tracing::warn!(country = %country_name, "unknown country name");
            None
        }
    }
}

/// Convert a state/province name to its short code, using the country code
/// to pick the right regional table.
///
/// Already-2-letter input is returned uppercased as-is. Without a country
/// hint (or with one that has no table) the US, CA, MX, AU, and DE tables
/// are probed in that fixed order.
///
/// Unknown names return `None` and log a warning.
#[must_use]
pub fn state_name_to_code(state_name: &str, country_code: Option<&str>) -> Option<String> {
    let trimmed = state_name.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().count() == 2 {
        return Some(trimmed.to_uppercase());
    }

    let normalized = normalize_name(trimmed);

    let code = match country_code {
        Some("US") => us_states().get(&normalized),
        Some("CA") => ca_provinces().get(&normalized),
        Some("MX") => mx_states().get(&normalized),
        Some("AU") => au_states().get(&normalized),
        Some("DE") => de_states().get(&normalized),
        _ => us_states()
            .get(&normalized)
            .or_else(|| ca_provinces().get(&normalized))
            .or_else(|| mx_states().get(&normalized))
            .or_else(|| au_states().get(&normalized))
            .or_else(|| de_states().get(&normalized)),
    };

    match code {
        Some(code) => Some(code.clone()),
        None => {
            tracing::warn!(
                state = %state_name,
                country = country_code.unwrap_or("unknown"),
                "unknown state name"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_name("  New   Jersey "), "new jersey");
        assert_eq!(normalize_name("ONTARIO"), "ontario");
    }

    #[test]
    fn country_lookup_is_case_insensitive() {
        assert_eq!(country_name_to_code("united states").as_deref(), Some("US"));
        assert_eq!(country_name_to_code("FRANCE").as_deref(), Some("FR"));
    }

    #[test]
    fn country_lookup_accepts_common_variants() {
        assert_eq!(
            country_name_to_code("United States of America").as_deref(),
            Some("US")
        );
        assert_eq!(country_name_to_code("UK").as_deref(), Some("GB"));
    }

    #[test]
    fn country_code_input_is_idempotent() {
        assert_eq!(country_name_to_code("US").as_deref(), Some("US"));
        assert_eq!(country_name_to_code("de").as_deref(), Some("DE"));
    }

    #[test]
    fn unknown_country_returns_none() {
        assert_eq!(country_name_to_code("Atlantis"), None);
        assert_eq!(country_name_to_code("  "), None);
        // "ZQ" is not an assigned code; 2-letter inputs are validated.
        assert_eq!(country_name_to_code("ZQ"), None);
    }

    #[test]
    fn state_lookup_uses_country_context() {
        assert_eq!(
            state_name_to_code("California", Some("US")).as_deref(),
            Some("CA")
        );
        assert_eq!(
            state_name_to_code("Ontario", Some("CA")).as_deref(),
            Some("ON")
        );
        assert_eq!(
            state_name_to_code("Jalisco", Some("MX")).as_deref(),
            Some("JA")
        );
        assert_eq!(
            state_name_to_code("Queensland", Some("AU")).as_deref(),
            Some("QLD")
        );
        assert_eq!(
            state_name_to_code("Bayern", Some("DE")).as_deref(),
            Some("BY")
        );
    }

    #[test]
    fn state_lookup_without_hint_probes_us_first() {
        assert_eq!(state_name_to_code("New York", None).as_deref(), Some("NY"));
        // Not a US state; found by probing the CA table.
        assert_eq!(
            state_name_to_code("Saskatchewan", None).as_deref(),
            Some("SK")
        );
    }

    #[test]
    fn two_letter_state_passes_through_uppercased() {
        assert_eq!(state_name_to_code("nj", None).as_deref(), Some("NJ"));
        assert_eq!(state_name_to_code("NJ", Some("US")).as_deref(), Some("NJ"));
    }

    #[test]
    fn unknown_state_returns_none() {
        assert_eq!(state_name_to_code("Gotham", Some("US")), None);
        assert_eq!(state_name_to_code("Gotham", None), None);
    }
}
