use serde_json::Value;

use crate::geometry::parse_path;
use crate::point::Coordinate;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance on a sphere of radius [`EARTH_RADIUS_METERS`].
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();

    let h = (dphi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Sum of consecutive segment lengths of an open path, in meters.
pub fn compute_length(path: &[Coordinate]) -> f64 {
    if path.len() < 2 {
        return 0.0;
    }
    path.windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

pub fn length_from_payload(payload: &Value) -> f64 {
    compute_length(&parse_path(payload))
}

/// Length of the ring including the closing segment back to the first vertex.
pub fn compute_perimeter(ring: &[Coordinate]) -> f64 {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() >= 2 => {
            compute_length(ring) + haversine_distance(last, first)
        }
        _ => 0.0,
    }
}
