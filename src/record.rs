use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::{FeatureGeometry, LocationType};

/// A stored entity carrying a geometry and a derived area column.
pub trait GeoRecord {
    fn location_type(&self) -> LocationType;
    fn location_data(&self) -> &Value;
    fn set_area(&mut self, area: f64);

    fn geometry(&self) -> FeatureGeometry {
        FeatureGeometry::from_payload(self.location_type(), self.location_data())
    }
}

/// Must run on every create and update, the client-sent area is never kept.
pub fn recompute_area<R: GeoRecord>(record: &mut R) -> f64 {
    let area = record.geometry().area();
    record.set_area(area);
    area
}

/// Row shape shared by the geometry-bearing tables (disasters, zones, facilities).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kategori: Option<String>,
    pub tipe_lokasi: LocationType,
    #[serde(default)]
    pub lokasi_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luas: Option<f64>,
}

impl GeoRecord for FeatureRecord {
    fn location_type(&self) -> LocationType {
        self.tipe_lokasi
    }

    fn location_data(&self) -> &Value {
        &self.lokasi_data
    }

    fn set_area(&mut self, area: f64) {
        self.luas = Some(area);
    }
}

impl FeatureRecord {
    pub fn label(&self) -> String {
        match (&self.nama, self.id) {
            (Some(nama), _) => nama.clone(),
            (None, Some(id)) => format!("#{}", id),
            (None, None) => "(unnamed)".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recomputed {
    pub label: String,
    pub previous: Option<f64>,
    pub area: f64,
}

impl Recomputed {
    /// Stored value absent or off by more than a centimeter².
    pub fn changed(&self) -> bool {
        match self.previous {
            Some(p) => (p - self.area).abs() > 1e-4,
            None => true,
        }
    }
}

pub fn recompute_all(records: &mut [FeatureRecord]) -> Vec<Recomputed> {
    records
        .iter_mut()
        .map(|r| {
            let previous = r.luas;
            let area = recompute_area(r);
            let ret = Recomputed {
                label: r.label(),
                previous,
                area,
            };
            if ret.changed() {
                log::info!("{}: luas {:?} -> {:.2}", ret.label, previous, area);
            } else {
                log::trace!("{}: luas unchanged", ret.label);
            }
            ret
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_area_is_overwritten() {
        let mut r: FeatureRecord = serde_json::from_value(json!({
            "nama": "Zona A",
            "tipe_lokasi": "polygon",
            "lokasi_data": [[0, 0], [1]],
            "luas": 5000
        }))
        .unwrap();
        assert_eq!(recompute_area(&mut r), 0.0);
        assert_eq!(r.luas, Some(0.0));
    }

    #[test]
    fn test_recompute_all_reports_changes() {
        let mut records = vec![
            FeatureRecord {
                id: Some(1),
                nama: None,
                kategori: None,
                tipe_lokasi: LocationType::Point,
                lokasi_data: json!({"lat": -7.5, "lng": 110.3}),
                luas: Some(0.0),
            },
            FeatureRecord {
                id: Some(2),
                nama: None,
                kategori: None,
                tipe_lokasi: LocationType::Radius,
                lokasi_data: json!({"radius": 10}),
                luas: None,
            },
        ];
        let report = recompute_all(&mut records);
        assert!(!report[0].changed());
        assert!(report[1].changed());
        assert_eq!(report[1].label, "#2");
        assert!((records[1].luas.unwrap() - 314.159265).abs() < 1e-5);
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let r: FeatureRecord =
            serde_json::from_value(json!({"tipe_lokasi": "radius"})).unwrap();
        assert_eq!(r.lokasi_data, Value::Null);
        assert_eq!(r.geometry().area(), 0.0);
    }
}
