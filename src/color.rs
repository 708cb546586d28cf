//! Fixed map colors per land-use category, danger level and road class.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TagError;

pub const LAND_USE_FALLBACK: &str = "#9ca3af";
pub const ROAD_FALLBACK: &str = "#3b82f6";
/// Unknown danger levels get the neutral land-use gray.
pub const DANGER_FALLBACK: &str = LAND_USE_FALLBACK;

/// Lowercase, trimmed, with spaces and dashes as underscores.
fn normalize(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn unknown(kind: &'static str, tag: &str) -> TagError {
    TagError::UnknownTag {
        kind,
        tag: tag.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandUse {
    Permukiman,
    Pertanian,
    Perkebunan,
    Hutan,
    Perairan,
    FasilitasUmum,
    LahanKosong,
}

impl LandUse {
    pub const ALL: [LandUse; 7] = [
        LandUse::Permukiman,
        LandUse::Pertanian,
        LandUse::Perkebunan,
        LandUse::Hutan,
        LandUse::Perairan,
        LandUse::FasilitasUmum,
        LandUse::LahanKosong,
    ];

    pub fn color(&self) -> &'static str {
        match self {
            LandUse::Permukiman => "#f59e0b",
            LandUse::Pertanian => "#84cc16",
            LandUse::Perkebunan => "#16a34a",
            LandUse::Hutan => "#166534",
            LandUse::Perairan => "#0ea5e9",
            LandUse::FasilitasUmum => "#8b5cf6",
            LandUse::LahanKosong => "#d6d3d1",
        }
    }
}

impl FromStr for LandUse {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "permukiman" | "pemukiman" | "residential" => Ok(LandUse::Permukiman),
            "pertanian" | "sawah" | "agriculture" => Ok(LandUse::Pertanian),
            "perkebunan" | "kebun" | "plantation" => Ok(LandUse::Perkebunan),
            "hutan" | "forest" => Ok(LandUse::Hutan),
            "perairan" | "sungai" | "water" => Ok(LandUse::Perairan),
            "fasilitas_umum" | "fasum" | "public_facility" => Ok(LandUse::FasilitasUmum),
            "lahan_kosong" | "kosong" | "vacant" => Ok(LandUse::LahanKosong),
            _ => Err(unknown("land use", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DangerLevel {
    Rendah,
    Sedang,
    Tinggi,
    Kritis,
}

impl DangerLevel {
    pub fn color(&self) -> &'static str {
        match self {
            DangerLevel::Rendah => "#22c55e",
            DangerLevel::Sedang => "#eab308",
            DangerLevel::Tinggi => "#f97316",
            DangerLevel::Kritis => "#dc2626",
        }
    }
}

impl FromStr for DangerLevel {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "rendah" | "low" => Ok(DangerLevel::Rendah),
            "sedang" | "medium" => Ok(DangerLevel::Sedang),
            "tinggi" | "high" => Ok(DangerLevel::Tinggi),
            "kritis" | "sangat_tinggi" | "critical" => Ok(DangerLevel::Kritis),
            _ => Err(unknown("danger level", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Nasional,
    Provinsi,
    Kabupaten,
    Desa,
    Lingkungan,
    Setapak,
}

impl RoadClass {
    pub fn color(&self) -> &'static str {
        match self {
            RoadClass::Nasional => "#dc2626",
            RoadClass::Provinsi => "#f97316",
            RoadClass::Kabupaten => "#eab308",
            RoadClass::Desa => "#6366f1",
            RoadClass::Lingkungan => "#64748b",
            RoadClass::Setapak => "#a16207",
        }
    }
}

impl FromStr for RoadClass {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "nasional" | "jalan_nasional" | "national" => Ok(RoadClass::Nasional),
            "provinsi" | "jalan_provinsi" | "provincial" => Ok(RoadClass::Provinsi),
            "kabupaten" | "jalan_kabupaten" | "regency" => Ok(RoadClass::Kabupaten),
            "desa" | "jalan_desa" | "village" => Ok(RoadClass::Desa),
            "lingkungan" | "jalan_lingkungan" | "local" => Ok(RoadClass::Lingkungan),
            "setapak" | "jalan_setapak" | "footpath" => Ok(RoadClass::Setapak),
            _ => Err(unknown("road class", s)),
        }
    }
}

pub fn land_use_color(tag: &str) -> &'static str {
    tag.parse::<LandUse>()
        .map(|c| c.color())
        .unwrap_or(LAND_USE_FALLBACK)
}

pub fn danger_color(tag: &str) -> &'static str {
    match tag.parse::<DangerLevel>() {
        Ok(level) => level.color(),
        Err(e) => {
            log::warn!("{}, using {}", e, DANGER_FALLBACK);
            DANGER_FALLBACK
        }
    }
}

pub fn road_color(tag: &str) -> &'static str {
    tag.parse::<RoadClass>()
        .map(|c| c.color())
        .unwrap_or(ROAD_FALLBACK)
}

/// Which lookup table a category tag belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorScheme {
    LandUse,
    Danger,
    Road,
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColorScheme::LandUse => "land-use",
            ColorScheme::Danger => "danger",
            ColorScheme::Road => "road",
        };
        f.write_str(s)
    }
}

pub fn color_for(scheme: ColorScheme, tag: &str) -> &'static str {
    match scheme {
        ColorScheme::LandUse => land_use_color(tag),
        ColorScheme::Danger => danger_color(tag),
        ColorScheme::Road => road_color(tag),
    }
}
