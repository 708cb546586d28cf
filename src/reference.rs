use geo::algorithm::geodesic_area::GeodesicArea;
use geo::orient::Direction;
use geo::{Coord, Orient, Polygon};

use crate::point::Coordinate;

/// Ellipsoidal (WGS84) area of the ring in m², for comparison only.
pub fn geodesic_area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let coords: Vec<Coord<f64>> = ring.iter().map(|p| Coord { x: p.lng, y: p.lat }).collect();

    // exterior ring only, geo closes it
    let mut geo_polygon = Polygon::new(coords.into(), vec![]);
    geo_polygon = geo_polygon.orient(Direction::Default);

    geo_polygon.geodesic_area_unsigned()
}

/// Relative error of the stored planar approximation against [`geodesic_area`].
pub fn approximation_error(ring: &[Coordinate]) -> Option<f64> {
    let geodesic = geodesic_area(ring);
    if geodesic == 0.0 {
        return None;
    }
    Some(crate::area::polygon_area(ring) / geodesic - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lat: f64, lng: f64, size: f64) -> Vec<Coordinate> {
        vec![
            Coordinate { lat, lng },
            Coordinate { lat, lng: lng + size },
            Coordinate { lat: lat + size, lng: lng + size },
            Coordinate { lat: lat + size, lng },
        ]
    }

    #[test]
    fn test_close_near_village_latitude() {
        let ring = square(-7.55, 110.37, 0.01);
        let err = approximation_error(&ring).unwrap();
        assert!(err.abs() < 0.02, "error {}", err);
    }

    #[test]
    fn test_drifts_far_from_village_latitude() {
        let ring = square(60.0, 10.0, 0.01);
        let err = approximation_error(&ring).unwrap();
        assert!(err > 0.5, "error {}", err);
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(geodesic_area(&square(0.0, 0.0, 0.1)[..2]), 0.0);
        assert!(approximation_error(&[]).is_none());
    }
}
