use std::f64::consts::PI;

use serde_json::Value;

use crate::geometry::{FeatureGeometry, LocationType};
use crate::point::Coordinate;

pub const METERS_PER_DEGREE_LAT: f64 = 111320.0;
pub const METERS_PER_DEGREE_LNG: f64 = 111320.0 * 0.991;

/// Area in square meters. Points are 0, circles are `π·r²`, rings go through
/// [`polygon_area`].
pub fn compute_area(geometry: &FeatureGeometry) -> f64 {
    match geometry {
        FeatureGeometry::Point(_) => 0.0,
        FeatureGeometry::Radius { radius, .. } => PI * radius * radius,
        FeatureGeometry::Polygon(ring) => polygon_area(ring),
    }
}

pub fn area_from_payload(location_type: LocationType, payload: &Value) -> f64 {
    compute_area(&FeatureGeometry::from_payload(location_type, payload))
}

/// Shoelace area of the implicitly closed ring, with (x, y) = (lat, lng) in
/// degrees, scaled to m² by fixed meters-per-degree factors.
///
/// This is an equirectangular approximation. The 0.991 longitude factor is
/// cos(~7.7°), so values are only accurate in the band around the village
/// latitude and drift by roughly `cos(lat) / 0.991` elsewhere. Stored areas
/// depend on it, see [`crate::reference::geodesic_area`] for a comparison.
pub fn polygon_area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    shoelace_degrees(ring) * METERS_PER_DEGREE_LAT * METERS_PER_DEGREE_LNG
}

fn shoelace_degrees(ring: &[Coordinate]) -> f64 {
    let mut signed = 0.0;
    for i in 0..ring.len() {
        let p1 = &ring[i];
        let p2 = &ring[(i + 1) % ring.len()];
        signed += p1.lat * p2.lng - p2.lat * p1.lng;
    }
    signed.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ring(points: &[(f64, f64)]) -> Vec<Coordinate> {
        points
            .iter()
            .map(|&(lat, lng)| Coordinate { lat, lng })
            .collect()
    }

    #[test]
    fn test_point_is_zero() {
        assert_eq!(compute_area(&FeatureGeometry::Point(None)), 0.0);
        assert_eq!(
            area_from_payload(LocationType::Point, &json!({"radius": 500})),
            0.0
        );
        assert_eq!(
            area_from_payload(LocationType::Point, &json!([[0, 0], [0, 1], [1, 1]])),
            0.0
        );
    }

    #[test]
    fn test_radius() {
        let area = area_from_payload(LocationType::Radius, &json!({"radius": 300}));
        assert!((area - 282743.338823).abs() < 1e-5);
        assert_eq!(area_from_payload(LocationType::Radius, &json!({})), 0.0);
    }

    #[test]
    fn test_degenerate_polygons() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&ring(&[(0.0, 0.0)])), 0.0);
        assert_eq!(polygon_area(&ring(&[(0.0, 0.0), (1.0, 1.0)])), 0.0);
        // collinear
        assert_eq!(polygon_area(&ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])), 0.0);
    }

    #[test]
    fn test_unit_square() {
        let square = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let expected = 111320.0 * (111320.0 * 0.991);
        assert!((polygon_area(&square) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_explicitly_closed_ring() {
        let open = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let mut closed = open.clone();
        closed.push(open[0]);
        assert_eq!(polygon_area(&open), polygon_area(&closed));
    }

    #[test]
    fn test_rotation_and_reversal() {
        let base = ring(&[
            (-7.540, 110.370),
            (-7.541, 110.376),
            (-7.546, 110.377),
            (-7.547, 110.371),
            (-7.543, 110.368),
        ]);
        let expected = polygon_area(&base);
        assert!(expected > 0.0);
        for k in 0..base.len() {
            let mut rotated = base.clone();
            rotated.rotate_left(k);
            assert!((polygon_area(&rotated) - expected).abs() < 1e-6 * expected);
            rotated.reverse();
            assert!((polygon_area(&rotated) - expected).abs() < 1e-6 * expected);
        }
    }
}
