use core::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 position as stored by the village records: latitude first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Returns `None` for non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Coordinate { lat, lng })
    }

    pub fn lng_lat(&self) -> (f64, f64) {
        (self.lng, self.lat)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wgs(lat: {:.5}, lng: {:.5})", self.lat, self.lng)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl BoundingBox {
    pub fn from(p1: &Coordinate, p2: &Coordinate) -> Self {
        let min = Coordinate {
            lat: p1.lat.min(p2.lat),
            lng: p1.lng.min(p2.lng),
        };
        let max = Coordinate {
            lat: p1.lat.max(p2.lat),
            lng: p1.lng.max(p2.lng),
        };
        Self { min, max }
    }

    /// Smallest box holding every coordinate, `None` when there are none.
    pub fn enclosing<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        Some(iter.fold(BoundingBox::from(first, first), |bbox, c| {
            bbox.union(&BoundingBox::from(c, c))
        }))
    }

    pub fn union(&self, other: &Self) -> Self {
        BoundingBox::from(
            &Coordinate {
                lat: self.min.lat.min(other.min.lat),
                lng: self.min.lng.min(other.min.lng),
            },
            &Coordinate {
                lat: self.max.lat.max(other.max.lat),
                lng: self.max.lng.max(other.max.lng),
            },
        )
    }

    /// Grows the box by `meters` on every side using the fixed scale factors.
    pub fn expand_meters(&self, meters: f64) -> Self {
        let dlat = meters / crate::area::METERS_PER_DEGREE_LAT;
        let dlng = meters / crate::area::METERS_PER_DEGREE_LNG;
        BoundingBox {
            min: Coordinate {
                lat: self.min.lat - dlat,
                lng: self.min.lng - dlng,
            },
            max: Coordinate {
                lat: self.max.lat + dlat,
                lng: self.max.lng + dlng,
            },
        }
    }

    pub fn contains(&self, c: &Coordinate) -> bool {
        c.lng >= self.min.lng
            && c.lng <= self.max.lng
            && c.lat >= self.min.lat
            && c.lat <= self.max.lat
    }

    pub fn width(&self) -> f64 {
        self.max.lng - self.min.lng
    }

    pub fn height(&self) -> f64 {
        self.max.lat - self.min.lat
    }

    /// GeoJSON order: `[west, south, east, north]`.
    pub fn to_geojson(&self) -> Vec<f64> {
        vec![self.min.lng, self.min.lat, self.max.lng, self.max.lat]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bbox(min: {}, max: {})", self.min, self.max)
    }
}
