use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::ReportConfig;
use crate::geometry::FeatureGeometry;
use crate::map::MapShape;
use crate::point::Coordinate;

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedFeature {
    pub name: String,
    pub category: Option<String>,
    pub shape: MapShape,
}

/// All-or-nothing, like stored payloads: one bad vertex empties the sequence.
fn coordinates<I>(lng_lat: I) -> Vec<Coordinate>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    lng_lat
        .into_iter()
        .map(|(lng, lat)| Coordinate::new(lat, lng))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

mod locjson {
    use super::*;
    use geojson::{GeoJson, Geometry, JsonObject, Value};

    pub fn read(content: &str, config: &ReportConfig) -> Result<Vec<ImportedFeature>> {
        let geojson: GeoJson = content.parse().context("invalid GeoJSON")?;
        let ret = match geojson {
            GeoJson::FeatureCollection(collection) => collection
                .features
                .iter()
                .enumerate()
                .filter_map(|(i, feature)| {
                    let geometry = feature.geometry.as_ref()?;
                    feature_from(geometry, feature.properties.as_ref(), i, config)
                })
                .collect(),
            GeoJson::Feature(feature) => match &feature.geometry {
                Some(geometry) => feature_from(geometry, feature.properties.as_ref(), 0, config)
                    .into_iter()
                    .collect(),
                None => vec![],
            },
            GeoJson::Geometry(geometry) => feature_from(&geometry, None, 0, config)
                .into_iter()
                .collect(),
        };
        Ok(ret)
    }

    fn positions(ps: &[Vec<f64>]) -> Vec<Coordinate> {
        coordinates(ps.iter().map(|p| {
            if p.len() >= 2 {
                (p[0], p[1])
            } else {
                (f64::NAN, f64::NAN)
            }
        }))
    }

    fn string_property(properties: Option<&JsonObject>, key: &str) -> Option<String> {
        match properties?.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn feature_from(
        geometry: &Geometry,
        properties: Option<&JsonObject>,
        index: usize,
        config: &ReportConfig,
    ) -> Option<ImportedFeature> {
        let shape = match &geometry.value {
            Value::Polygon(rings) => {
                MapShape::Area(FeatureGeometry::Polygon(positions(rings.first()?)))
            }
            Value::MultiPolygon(polygons) => {
                // first exterior ring only
                let ring = polygons.first()?.first()?;
                MapShape::Area(FeatureGeometry::Polygon(positions(ring)))
            }
            Value::LineString(line) => MapShape::Path(positions(line)),
            Value::Point(p) => {
                let center = positions(std::slice::from_ref(p)).first().copied();
                let radius = properties
                    .and_then(|props| props.get("radius"))
                    .and_then(|r| r.as_f64());
                match radius {
                    Some(radius) => MapShape::Area(FeatureGeometry::Radius {
                        center,
                        radius: if radius.is_finite() && radius >= 0.0 { radius } else { 0.0 },
                    }),
                    None => MapShape::Area(FeatureGeometry::Point(center)),
                }
            }
            _ => {
                log::debug!("geojson: skipping unsupported geometry of feature {}", index + 1);
                return None;
            }
        };
        let name = string_property(properties, "nama")
            .or_else(|| string_property(properties, "name"))
            .unwrap_or_else(|| format!("feature {}", index + 1));
        Some(ImportedFeature {
            name,
            category: string_property(properties, &config.category_property),
            shape,
        })
    }
}

mod lockml {
    use super::*;
    use kml::Kml;
    use kml::types::Geometry;

    fn collect(kml: &Kml, ret: &mut Vec<ImportedFeature>) {
        match kml {
            Kml::KmlDocument(doc) => doc.elements.iter().for_each(|e| collect(e, ret)),
            Kml::Document { elements, .. } => elements.iter().for_each(|e| collect(e, ret)),
            Kml::Folder(z) => z.elements.iter().for_each(|e| collect(e, ret)),
            Kml::Placemark(p) => {
                let shape = match &p.geometry {
                    Some(Geometry::Polygon(poly)) => MapShape::Area(FeatureGeometry::Polygon(
                        coordinates(poly.outer.coords.iter().map(|c| (c.x, c.y))),
                    )),
                    Some(Geometry::LineString(ls)) => {
                        MapShape::Path(coordinates(ls.coords.iter().map(|c| (c.x, c.y))))
                    }
                    Some(Geometry::Point(pt)) => MapShape::Area(FeatureGeometry::Point(
                        Coordinate::new(pt.coord.y, pt.coord.x),
                    )),
                    _ => return,
                };
                ret.push(ImportedFeature {
                    name: p
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("placemark {}", ret.len() + 1)),
                    category: None,
                    shape,
                });
            }
            _ => {}
        }
    }

    pub fn read(content: &str) -> Result<Vec<ImportedFeature>> {
        let kml: Kml = content
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid KML: {:?}", e))?;
        let mut ret = Vec::new();
        collect(&kml, &mut ret);
        Ok(ret)
    }
}

mod locgpx {
    use super::*;
    use gpx::{Gpx, Waypoint};
    use std::io::Cursor;

    fn path(points: &[Waypoint]) -> Vec<Coordinate> {
        coordinates(points.iter().map(|w| (w.point().x(), w.point().y())))
    }

    pub fn read(content: &str) -> Result<Vec<ImportedFeature>> {
        let gpx: Gpx = gpx::read(Cursor::new(content)).context("invalid GPX")?;

        let mut ret = Vec::new();
        for (i, track) in gpx.tracks.iter().enumerate() {
            for segment in &track.segments {
                ret.push(ImportedFeature {
                    name: track
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("track {}", i + 1)),
                    category: track.type_.clone(),
                    shape: MapShape::Path(path(&segment.points)),
                });
            }
        }
        for (i, route) in gpx.routes.iter().enumerate() {
            ret.push(ImportedFeature {
                name: route
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("route {}", i + 1)),
                category: route.type_.clone(),
                shape: MapShape::Path(path(&route.points)),
            });
        }
        for (i, w) in gpx.waypoints.iter().enumerate() {
            ret.push(ImportedFeature {
                name: w.name.clone().unwrap_or_else(|| format!("waypoint {}", i + 1)),
                category: w.type_.clone(),
                shape: MapShape::Area(FeatureGeometry::Point(Coordinate::new(
                    w.point().y(),
                    w.point().x(),
                ))),
            });
        }
        Ok(ret)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

pub fn is_supported(path: &Path) -> bool {
    matches!(
        extension(path).as_deref(),
        Some("geojson" | "json" | "kml" | "gpx")
    )
}

/// Parses already-loaded file content; the format is picked by `extension`.
pub fn parse_features(
    extension: &str,
    content: &str,
    config: &ReportConfig,
) -> Result<Vec<ImportedFeature>> {
    match extension {
        "geojson" | "json" => locjson::read(content, config),
        "kml" => lockml::read(content),
        "gpx" => locgpx::read(content),
        other => anyhow::bail!("unsupported file type: {:?}", other),
    }
}

pub fn read_features(filename: &Path, config: &ReportConfig) -> Result<Vec<ImportedFeature>> {
    let content = fs::read_to_string(filename)
        .with_context(|| format!("cannot read {}", filename.display()))?;
    let ext = extension(filename).unwrap_or_default();
    let ret = parse_features(&ext, &content, config)
        .with_context(|| format!("while reading {}", filename.display()))?;
    log::info!("{}: {} features", filename.display(), ret.len());
    Ok(ret)
}

/// Files are read directly, directories are walked for supported files.
pub fn read_paths<P: AsRef<Path>>(
    paths: &[P],
    config: &ReportConfig,
) -> Result<Vec<ImportedFeature>> {
    let mut ret = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            ret.extend(read_features(path, config)?);
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            if entry.file_type().is_file() && is_supported(entry.path()) {
                ret.extend(read_features(entry.path(), config)?);
            }
        }
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"nama": "Sawah Utara", "kategori": "pertanian"},
                "geometry": {"type": "Polygon", "coordinates": [[[110.37, -7.54], [110.38, -7.54], [110.38, -7.55], [110.37, -7.54]]]}
            },
            {
                "type": "Feature",
                "properties": {"nama": "Posko", "radius": 300},
                "geometry": {"type": "Point", "coordinates": [110.375, -7.542]}
            },
            {
                "type": "Feature",
                "properties": {"kategori": "desa"},
                "geometry": {"type": "LineString", "coordinates": [[110.37, -7.54], [110.38, -7.54]]}
            }
        ]
    }"#;

    #[test]
    fn test_geojson_features() {
        let features = parse_features("geojson", GEOJSON, &ReportConfig::default()).unwrap();
        assert_eq!(features.len(), 3);

        assert_eq!(features[0].name, "Sawah Utara");
        assert_eq!(features[0].category.as_deref(), Some("pertanian"));
        match &features[0].shape {
            MapShape::Area(FeatureGeometry::Polygon(ring)) => {
                assert_eq!(ring[0], Coordinate { lat: -7.54, lng: 110.37 });
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            features[1].shape,
            MapShape::Area(FeatureGeometry::Radius {
                center: Coordinate::new(-7.542, 110.375),
                radius: 300.0
            })
        );

        assert_eq!(features[2].name, "feature 3");
        assert_eq!(features[2].shape.kind(), "path");
    }

    #[test]
    fn test_category_property_from_config() {
        let config = ReportConfig {
            category_property: "nama".to_string(),
            ..ReportConfig::default()
        };
        let features = parse_features("geojson", GEOJSON, &config).unwrap();
        assert_eq!(features[1].category.as_deref(), Some("Posko"));
    }

    #[test]
    fn test_kml_placemarks() {
        let content = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <name>Batas Dusun</name>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>110.37,-7.54,0 110.38,-7.54,0 110.38,-7.55,0 110.37,-7.54,0</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#;
        let features = parse_features("kml", content, &ReportConfig::default()).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Batas Dusun");
        assert!(features[0].shape.area() > 0.0);
    }

    #[test]
    fn test_unsupported() {
        assert!(parse_features("shp", "", &ReportConfig::default()).is_err());
        assert!(is_supported(Path::new("a/b/desa.GeoJSON")));
        assert!(!is_supported(Path::new("a/b/desa.shp")));
    }

    #[test]
    fn test_bad_vertex_empties_ring() {
        assert!(coordinates(vec![(110.0, -7.0), (200.0, -7.0)]).is_empty());
        assert_eq!(coordinates(vec![(110.0, -7.0)]).len(), 1);
    }
}
