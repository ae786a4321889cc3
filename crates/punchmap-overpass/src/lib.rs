pub mod client;
pub mod convert;
pub mod error;
pub mod types;

pub use client::OverpassClient;
pub use convert::{extract_candidates, StoreCandidate};
pub use error::OverpassError;
pub use types::{ElementTags, OverpassElement, OverpassResponse};
