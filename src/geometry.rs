use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::TagError;
use crate::point::{BoundingBox, Coordinate};

/// Selects which area formula applies to a record (`tipe_lokasi`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Point,
    Polygon,
    Radius,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Point => "point",
            LocationType::Polygon => "polygon",
            LocationType::Radius => "radius",
        }
    }
}

impl FromStr for LocationType {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "point" | "titik" => Ok(LocationType::Point),
            "polygon" | "area" => Ok(LocationType::Polygon),
            "radius" | "circle" | "lingkaran" => Ok(LocationType::Radius),
            _ => Err(TagError::UnknownTag {
                kind: "location type",
                tag: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed `lokasi_data`. Malformed payloads are already reduced to their
/// degenerate form here, so everything downstream is total.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureGeometry {
    Point(Option<Coordinate>),
    Polygon(Vec<Coordinate>),
    Radius {
        center: Option<Coordinate>,
        radius: f64,
    },
}

impl FeatureGeometry {
    pub fn from_payload(location_type: LocationType, payload: &Value) -> Self {
        // text columns hold the JSON document as a string
        if let Value::String(s) = payload {
            return match serde_json::from_str::<Value>(s) {
                Ok(inner) if !inner.is_string() => Self::from_payload(location_type, &inner),
                _ => {
                    log::debug!("{}: payload string is not JSON", location_type);
                    Self::degenerate(location_type)
                }
            };
        }
        match location_type {
            LocationType::Point => FeatureGeometry::Point(parse_coordinate(payload)),
            LocationType::Radius => {
                let center = payload.get("center").and_then(parse_coordinate);
                let radius = match payload.get("radius").and_then(parse_number) {
                    Some(r) if r.is_finite() && r >= 0.0 => r,
                    Some(r) => {
                        log::debug!("radius: unusable radius {}, using 0", r);
                        0.0
                    }
                    None => {
                        log::debug!("radius: no numeric radius in payload, using 0");
                        0.0
                    }
                };
                FeatureGeometry::Radius { center, radius }
            }
            LocationType::Polygon => FeatureGeometry::Polygon(parse_path(payload)),
        }
    }

    /// The zero-area form of each location type.
    pub fn degenerate(location_type: LocationType) -> Self {
        match location_type {
            LocationType::Point => FeatureGeometry::Point(None),
            LocationType::Polygon => FeatureGeometry::Polygon(Vec::new()),
            LocationType::Radius => FeatureGeometry::Radius {
                center: None,
                radius: 0.0,
            },
        }
    }

    pub fn location_type(&self) -> LocationType {
        match self {
            FeatureGeometry::Point(_) => LocationType::Point,
            FeatureGeometry::Polygon(_) => LocationType::Polygon,
            FeatureGeometry::Radius { .. } => LocationType::Radius,
        }
    }

    pub fn area(&self) -> f64 {
        crate::area::compute_area(self)
    }

    /// Outline length: ring perimeter, circle circumference, 0 for points.
    pub fn perimeter(&self) -> f64 {
        match self {
            FeatureGeometry::Point(_) => 0.0,
            FeatureGeometry::Polygon(ring) => crate::length::compute_perimeter(ring),
            FeatureGeometry::Radius { radius, .. } => 2.0 * std::f64::consts::PI * radius,
        }
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        match self {
            FeatureGeometry::Point(p) => p.as_ref().map(|c| BoundingBox::from(c, c)),
            FeatureGeometry::Polygon(ring) => BoundingBox::enclosing(ring),
            FeatureGeometry::Radius { center, radius } => center
                .as_ref()
                .map(|c| BoundingBox::from(c, c).expand_meters(*radius)),
        }
    }

    /// Back to the stored payload shape (`[lat, lng]` pairs for rings).
    pub fn to_payload(&self) -> Value {
        match self {
            FeatureGeometry::Point(Some(c)) => serde_json::json!({ "lat": c.lat, "lng": c.lng }),
            FeatureGeometry::Point(None) => Value::Null,
            FeatureGeometry::Polygon(ring) => {
                Value::Array(ring.iter().map(|c| serde_json::json!([c.lat, c.lng])).collect())
            }
            FeatureGeometry::Radius { center, radius } => match center {
                Some(c) => serde_json::json!({
                    "center": { "lat": c.lat, "lng": c.lng },
                    "radius": radius,
                }),
                None => serde_json::json!({ "radius": radius }),
            },
        }
    }
}

fn parse_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// `[lat, lng]` or `{lat, lng}` (`lon` accepted for `lng`).
pub fn parse_coordinate(v: &Value) -> Option<Coordinate> {
    let (lat, lng) = match v {
        Value::Array(pair) if pair.len() == 2 => {
            (parse_number(&pair[0])?, parse_number(&pair[1])?)
        }
        Value::Object(map) => {
            let lat = map.get("lat").and_then(parse_number)?;
            let lng = map
                .get("lng")
                .or_else(|| map.get("lon"))
                .and_then(parse_number)?;
            (lat, lng)
        }
        _ => return None,
    };
    Coordinate::new(lat, lng)
}

/// A ring or path payload. One malformed vertex makes the whole sequence empty.
pub fn parse_path(v: &Value) -> Vec<Coordinate> {
    let Value::Array(items) = v else {
        log::debug!("path: payload is not an array");
        return Vec::new();
    };
    let parsed: Option<Vec<Coordinate>> = items.iter().map(parse_coordinate).collect();
    parsed.unwrap_or_else(|| {
        log::debug!("path: malformed vertex among {} items", items.len());
        Vec::new()
    })
}
