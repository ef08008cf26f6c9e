//! Geographic primitives: radian coordinates and
//! great-circle distance between them.

/// Radius of the earth used for all distance calculations, in meters.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

#[doc(hidden)]
pub mod coord;
#[doc(hidden)]
pub mod error;
pub mod haversine;
pub mod linestring;

#[doc(inline)]
pub use coord::latlng::{degrees_to_radians, Radian, RoadPoint, Waypoint};
#[doc(inline)]
pub use error::GeoError;
#[doc(inline)]
pub use haversine::haversine;
#[doc(inline)]
pub use linestring::parse_linestring;
