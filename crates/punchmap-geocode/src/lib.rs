pub mod client;
pub mod error;
pub mod names;
pub mod types;

pub use client::GeocodeClient;
pub use error::GeocodeError;
pub use names::{country_name_to_code, state_name_to_code};
pub use types::{AddressParts, Coordinates, ResolvedAddress};
