use crate::geo::EARTH_RADIUS;

/// Great-circle distance in meters between two positions
/// given in radians, using the haversine formula.
///
/// ```math
/// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
/// c = 2·atan2(√a, √(1-a))
/// d = R·c
/// ```
///
/// ### Example
/// ```rust
/// use tollgate::geo::haversine;
///
/// let distance = haversine(
///     0.8833989070424129, 0.2637513989411649,
///     0.8833961319689024, 0.2637535456961449,
/// );
///
/// assert!((distance - 19.70).abs() < 0.01);
/// ```
#[inline]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    // Rounding can push `a` past 1 for near-antipodal points
    let a = ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
        .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS * c
}
