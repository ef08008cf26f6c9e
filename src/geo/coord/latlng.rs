use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

use crate::geo::error::GeoError;
use crate::geo::haversine::haversine;

pub type Radian = f64;
pub type Degree = f64;

/// Converts an angle in degrees into radians.
#[inline]
pub fn degrees_to_radians(degrees: Degree) -> Radian {
    degrees.to_radians()
}

/// `RoadPoint`
/// A latitude, longitude pair in radians. Used for both the road
/// model geometry and the positions of a driven trace.
///
/// ```rust
/// use tollgate::geo::RoadPoint;
///
/// let point = RoadPoint::from_degree(50.615, 15.112).unwrap();
/// println!("Position: {:?}", point);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadPoint {
    pub lat: Radian,
    pub lon: Radian,
}

/// A position of a driven trace. Carries no timestamp of its own.
pub type Waypoint = RoadPoint;

impl RoadPoint {
    /// Constructs a new `RoadPoint` from a `lat` and `lon` in radians.
    pub const fn new(lat: Radian, lon: Radian) -> Self {
        RoadPoint { lat, lon }
    }

    pub fn from_degree(lat: Degree, lon: Degree) -> Result<Self, GeoError> {
        if !(-90f64..=90f64).contains(&lat) {
            return Err(GeoError::InvalidCoordinate(format!(
                "Latitude must be within -90 and 90. Given: {}",
                lat
            )));
        }

        if !(-180f64..=180f64).contains(&lon) {
            return Err(GeoError::InvalidCoordinate(format!(
                "Longitude must be within -180 and 180. Given: {}",
                lon
            )));
        }

        Ok(Self::from_degree_unchecked(lat, lon))
    }

    pub fn from_degree_unchecked(lat: Degree, lon: Degree) -> Self {
        RoadPoint {
            lat: degrees_to_radians(lat),
            lon: degrees_to_radians(lon),
        }
    }

    pub fn lat_degree(&self) -> Degree {
        self.lat.to_degrees()
    }

    pub fn lon_degree(&self) -> Degree {
        self.lon.to_degrees()
    }

    /// Haversine distance to `other`, in meters.
    #[inline]
    pub fn distance(&self, other: &RoadPoint) -> f64 {
        haversine(self.lat, self.lon, other.lat, other.lon)
    }
}

impl Debug for RoadPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT({} {})", self.lon_degree(), self.lat_degree())
    }
}

impl From<RoadPoint> for ::geo::Point {
    /// Format is: (x: lon, y: lat), in degrees.
    fn from(value: RoadPoint) -> Self {
        ::geo::Point::new(value.lon_degree(), value.lat_degree())
    }
}

impl TryFrom<::geo::Point> for RoadPoint {
    type Error = GeoError;

    fn try_from(point: ::geo::Point) -> Result<Self, Self::Error> {
        RoadPoint::from_degree(point.y(), point.x())
    }
}
