use ::geo::{Coord, LineString};
use wkt::TryFromWkt;

use crate::geo::{GeoError, RoadPoint};

/// Parses a WKT `LINESTRING` given in degrees (`x = lon`, `y = lat`)
/// into an ordered list of radian positions.
///
/// ```rust
/// use tollgate::geo::parse_linestring;
///
/// let points = parse_linestring("LINESTRING (15.112 50.615, 15.1122 50.6155)").unwrap();
/// assert_eq!(points.len(), 2);
/// ```
pub fn parse_linestring(text: &str) -> Result<Vec<RoadPoint>, GeoError> {
    let linestring = LineString::<f64>::try_from_wkt_str(text.trim())
        .map_err(|err| GeoError::MalformedWkt(err.to_string()))?;

    linestring
        .coords()
        .map(|Coord { x, y }| RoadPoint::from_degree(*y, *x))
        .collect()
}
