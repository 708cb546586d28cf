use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::json;

use crate::area::{METERS_PER_DEGREE_LAT, METERS_PER_DEGREE_LNG};
use crate::format::{format_area, format_length};
use crate::geometry::FeatureGeometry;
use crate::length::compute_length;
use crate::point::{BoundingBox, Coordinate};

/// Anything the map layer draws: an area-bearing geometry or an open path (roads, tracks).
#[derive(Clone, Debug, PartialEq)]
pub enum MapShape {
    Area(FeatureGeometry),
    Path(Vec<Coordinate>),
}

impl MapShape {
    pub fn area(&self) -> f64 {
        match self {
            MapShape::Area(g) => g.area(),
            MapShape::Path(_) => 0.0,
        }
    }

    /// Path length, or the outline length of an area.
    pub fn length(&self) -> f64 {
        match self {
            MapShape::Area(g) => g.perimeter(),
            MapShape::Path(p) => compute_length(p),
        }
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        match self {
            MapShape::Area(g) => g.bbox(),
            MapShape::Path(p) => BoundingBox::enclosing(p),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MapShape::Area(g) => g.location_type().as_str(),
            MapShape::Path(_) => "path",
        }
    }
}

fn position(c: &Coordinate) -> Vec<f64> {
    let (lng, lat) = c.lng_lat();
    vec![lng, lat]
}

fn closed_ring(ring: &[Coordinate]) -> Vec<Vec<f64>> {
    let mut positions: Vec<Vec<f64>> = ring.iter().map(position).collect();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            positions.push(position(first));
        }
    }
    positions
}

fn to_geometry(shape: &MapShape) -> Option<geojson::Geometry> {
    let value = match shape {
        MapShape::Area(FeatureGeometry::Point(p)) => geojson::Value::Point(position(p.as_ref()?)),
        MapShape::Area(FeatureGeometry::Radius { center, .. }) => {
            geojson::Value::Point(position(center.as_ref()?))
        }
        MapShape::Area(FeatureGeometry::Polygon(ring)) if ring.len() >= 3 => {
            geojson::Value::Polygon(vec![closed_ring(ring)])
        }
        MapShape::Path(path) if path.len() >= 2 => {
            geojson::Value::LineString(path.iter().map(position).collect())
        }
        _ => return None,
    };
    Some(geojson::Geometry::new(value))
}

/// GeoJSON feature for the map layer, `[lng, lat]` positions, styled with `color`.
/// Circles stay points with a `radius` property for the client to draw.
pub fn to_feature(shape: &MapShape, color: &str, mut properties: JsonObject) -> Feature {
    properties.insert("stroke".to_string(), json!(color));
    properties.insert("kind".to_string(), json!(shape.kind()));
    match shape {
        MapShape::Area(g) => {
            properties.insert("fill".to_string(), json!(color));
            properties.insert("area".to_string(), json!(g.area()));
            properties.insert("area_label".to_string(), json!(format_area(g.area())));
            if let FeatureGeometry::Radius { radius, .. } = g {
                properties.insert("radius".to_string(), json!(radius));
            }
        }
        MapShape::Path(p) => {
            let length = compute_length(p);
            properties.insert("length".to_string(), json!(length));
            properties.insert("length_label".to_string(), json!(format_length(length)));
        }
    }
    Feature {
        bbox: shape.bbox().map(|b| b.to_geojson()),
        geometry: to_geometry(shape),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn to_feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Static SVG preview of styled shapes. Longitudes are scaled by the same
/// meters-per-degree ratio the area formula uses, so shapes keep proportions.
pub struct SvgPreview {
    bbox: BoundingBox,
    size: f64,
    padding: f64,
    elements: Vec<String>,
}

impl SvgPreview {
    pub fn init(bbox: &BoundingBox, size: f64) -> Self {
        Self {
            bbox: *bbox,
            size,
            padding: 0.1,
            elements: Vec::new(),
        }
    }

    pub fn add(&mut self, shape: &MapShape, color: &str) {
        match shape {
            MapShape::Area(FeatureGeometry::Polygon(ring)) => self.add_polygon(ring, color),
            MapShape::Area(FeatureGeometry::Radius {
                center: Some(c),
                radius,
            }) => self.add_circle(c, *radius, color),
            MapShape::Area(FeatureGeometry::Point(Some(c))) => self.add_circle(c, 0.0, color),
            MapShape::Path(path) => self.add_path(path, color),
            _ => log::trace!("svg: nothing to draw for {}", shape.kind()),
        }
    }

    pub fn add_polygon(&mut self, ring: &[Coordinate], fill: &str) {
        if ring.len() < 3 {
            return;
        }
        let p = format!(
            r#"<polygon points="{}" fill="{}" fill-opacity="0.5" stroke="{}" stroke-width="2"/>"#,
            self.points(ring),
            fill,
            fill
        );
        self.elements.push(p);
    }

    pub fn add_path(&mut self, path: &[Coordinate], stroke: &str) {
        if path.len() < 2 {
            return;
        }
        let p = format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="3"/>"#,
            self.points(path),
            stroke
        );
        self.elements.push(p);
    }

    /// Radius in meters; points are drawn with a fixed marker size.
    pub fn add_circle(&mut self, center: &Coordinate, radius: f64, fill: &str) {
        let (cx, cy) = self.transform(center);
        let r = (radius / METERS_PER_DEGREE_LAT * self.scale()).max(3.0);
        let p = format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="0.5" stroke="{}" stroke-width="2"/>"#,
            cx, cy, r, fill, fill
        );
        self.elements.push(p);
    }

    pub fn render(&self) -> String {
        let mut svg = format!(
            r#"<svg width="{0:.0}" height="{0:.0}" xmlns="http://www.w3.org/2000/svg">"#,
            self.size
        );
        svg.push('\n');
        for e in &self.elements {
            svg.push_str(e);
            svg.push('\n');
        }
        svg.push_str("</svg>");
        svg
    }

    fn points(&self, coords: &[Coordinate]) -> String {
        coords
            .iter()
            .map(|c| {
                let (x, y) = self.transform(c);
                format!("{:.2},{:.2}", x, y)
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn aspect(&self) -> f64 {
        METERS_PER_DEGREE_LNG / METERS_PER_DEGREE_LAT
    }

    fn width(&self) -> f64 {
        self.bbox.width() * self.aspect()
    }

    fn height(&self) -> f64 {
        self.bbox.height()
    }

    /// Pixels per degree of latitude.
    fn scale(&self) -> f64 {
        let padded_width = self.width() * (1.0 + 2.0 * self.padding);
        let padded_height = self.height() * (1.0 + 2.0 * self.padding);
        let extent = padded_width.max(padded_height);
        if extent > 0.0 { self.size / extent } else { 1.0 }
    }

    fn transform(&self, c: &Coordinate) -> (f64, f64) {
        let x = ((c.lng - self.bbox.min.lng) * self.aspect() + self.width() * self.padding)
            * self.scale();
        let y =
            self.size - (c.lat - self.bbox.min.lat + self.height() * self.padding) * self.scale();
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    #[test]
    fn test_polygon_feature_is_closed_lng_lat() {
        let ring = vec![c(-7.54, 110.37), c(-7.54, 110.38), c(-7.55, 110.38)];
        let shape = MapShape::Area(FeatureGeometry::Polygon(ring));
        let f = to_feature(&shape, "#166534", JsonObject::new());
        let geometry = f.geometry.unwrap();
        match geometry.value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings[0].len(), 4);
                assert_eq!(rings[0][0], vec![110.37, -7.54]);
                assert_eq!(rings[0][0], rings[0][3]);
            }
            other => panic!("unexpected {:?}", other),
        }
        let props = f.properties.unwrap();
        assert_eq!(props["fill"], json!("#166534"));
        assert_eq!(props["kind"], json!("polygon"));
        assert_eq!(f.bbox, Some(vec![110.37, -7.55, 110.38, -7.54]));
    }

    #[test]
    fn test_radius_feature() {
        let shape = MapShape::Area(FeatureGeometry::Radius {
            center: Some(c(-7.542, 110.375)),
            radius: 300.0,
        });
        let f = to_feature(&shape, "#dc2626", JsonObject::new());
        assert_eq!(
            f.geometry.unwrap().value,
            geojson::Value::Point(vec![110.375, -7.542])
        );
        let props = f.properties.unwrap();
        assert_eq!(props["radius"], json!(300.0));
        assert_eq!(props["area_label"], json!("28,27 ha"));
    }

    #[test]
    fn test_path_feature() {
        let shape = MapShape::Path(vec![c(0.0, 0.0), c(0.0, 0.01)]);
        let f = to_feature(&shape, "#3b82f6", JsonObject::new());
        let props = f.properties.unwrap();
        assert_eq!(props["length_label"], json!("1.11 km"));
        assert!(props.get("fill").is_none());
    }

    #[test]
    fn test_degenerate_has_no_geometry() {
        let shape = MapShape::Area(FeatureGeometry::Polygon(vec![]));
        let f = to_feature(&shape, "#9ca3af", JsonObject::new());
        assert!(f.geometry.is_none());
        assert!(f.bbox.is_none());
    }

    #[test]
    fn test_svg_render() {
        let ring = vec![c(-7.54, 110.37), c(-7.54, 110.38), c(-7.55, 110.38)];
        let bbox = BoundingBox::enclosing(&ring).unwrap();
        let mut svg = SvgPreview::init(&bbox, 500.0);
        svg.add(&MapShape::Area(FeatureGeometry::Polygon(ring)), "#166534");
        svg.add(&MapShape::Area(FeatureGeometry::Point(None)), "#000000");
        let out = svg.render();
        assert!(out.starts_with("<svg width=\"500\""));
        assert_eq!(out.matches("<polygon").count(), 1);
        assert!(out.ends_with("</svg>"));
    }
}
