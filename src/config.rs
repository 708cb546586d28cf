use std::env;

use crate::color::ColorScheme;

pub const CATEGORY_PROPERTY_ENV: &str = "DESA_GEO_CATEGORY_PROPERTY";
pub const SVG_SIZE_ENV: &str = "DESA_GEO_SVG_SIZE";

/// Settings for importing files and rendering reports.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Feature property holding the land-use / danger / road tag.
    pub category_property: String,
    pub scheme: ColorScheme,
    pub svg_size: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            category_property: "kategori".to_string(),
            scheme: ColorScheme::LandUse,
            svg_size: 500.0,
        }
    }
}

impl ReportConfig {
    /// Defaults overridden by the environment; unusable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ret = Self::default();
        if let Some(p) = lookup(CATEGORY_PROPERTY_ENV).filter(|p| !p.trim().is_empty()) {
            ret.category_property = p.trim().to_string();
        }
        if let Some(s) = lookup(SVG_SIZE_ENV) {
            match s.trim().parse::<f64>() {
                Ok(size) if size.is_finite() && size > 0.0 => ret.svg_size = size,
                _ => log::warn!("{}: ignoring {:?}", SVG_SIZE_ENV, s),
            }
        }
        ret
    }
}
