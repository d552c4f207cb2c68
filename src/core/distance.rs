use crate::models::BoundingBox;

/// Earth's mean radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Hard geographic cutoff for matching; also where the location score hits zero
pub const MAX_MATCH_DISTANCE_MILES: f64 = 150.0;

/// Widens bounding boxes slightly so float error never drops a point on the edge
const BOX_PADDING: f64 = 1.01;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Great-circle distance in miles
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push near-antipodal pairs just past 1.0
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Calculate a bounding box that contains every point within `radius_miles`
/// of the center
///
/// Checking the box is a handful of comparisons, so it runs before Haversine
/// to discard far-away candidates. Boxes that would touch a pole or cross the
/// antimeridian span every longitude.
///
/// # Arguments
/// * `lat` - Center latitude in degrees
/// * `lon` - Center longitude in degrees
/// * `radius_miles` - Radius in miles
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_miles: f64) -> BoundingBox {
    let angular = radius_miles / EARTH_RADIUS_MILES;

    let lat_delta = angular.to_degrees() * BOX_PADDING;
    let min_lat = (lat - lat_delta).max(-90.0);
    let max_lat = (lat + lat_delta).min(90.0);

    // Widest longitude offset on the circle: asin(sin(d/R) / cos(lat))
    let sin_ratio = angular.sin() / lat.to_radians().cos();
    let (min_lon, max_lon) = if min_lat <= -90.0 || max_lat >= 90.0 || sin_ratio >= 1.0 {
        (-180.0, 180.0)
    } else {
        let lon_delta = sin_ratio.asin().to_degrees() * BOX_PADDING;
        if lon - lon_delta < -180.0 || lon + lon_delta > 180.0 {
            (-180.0, 180.0)
        } else {
            (lon - lon_delta, lon + lon_delta)
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat && lat <= bbox.max_lat && lon >= bbox.min_lon && lon <= bbox.max_lon
}
