pub mod boxmath;
pub mod engine;

pub use boxmath::{bounding_square, subtract, Rectangle, EARTH_RADIUS_KM};
pub use engine::{discover, DiscoveryStats, SearchError};
