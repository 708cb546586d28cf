#![cfg(target_arch = "wasm32")]

//! Browser bindings for the live preview on the map editor. They call the
//! same functions as the save path, so previewed and stored values match.

use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

use crate::color::{ColorScheme, color_for};
use crate::format::{format_area, format_length};
use crate::geometry::{FeatureGeometry, LocationType, parse_path};
use crate::length::compute_length;

#[derive(Serialize)]
struct AreaPreview {
    area: f64,
    label: String,
}

#[derive(Serialize)]
struct LengthPreview {
    length: f64,
    label: String,
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn payload(data: JsValue) -> serde_json::Value {
    from_value(data).unwrap_or_else(|e| {
        log::debug!("wasm: undecodable payload ({}), treating as empty", e);
        serde_json::Value::Null
    })
}

/// Unknown location types preview as points (area 0).
#[wasm_bindgen]
pub fn preview_area(location_type: &str, data: JsValue) -> Result<JsValue, JsValue> {
    let location_type = location_type.parse().unwrap_or(LocationType::Point);
    let area = FeatureGeometry::from_payload(location_type, &payload(data)).area();
    let preview = AreaPreview {
        area,
        label: format_area(area),
    };
    to_value(&preview).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn preview_length(path: JsValue) -> Result<JsValue, JsValue> {
    let length = compute_length(&parse_path(&payload(path)));
    let preview = LengthPreview {
        length,
        label: format_length(length),
    };
    to_value(&preview).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = formatArea)]
pub fn format_area_js(area: Option<f64>) -> String {
    format_area(area)
}

#[wasm_bindgen(js_name = formatLength)]
pub fn format_length_js(length: f64) -> String {
    format_length(length)
}

/// `scheme` is `"land-use"`, `"danger"` or `"road"`.
#[wasm_bindgen(js_name = colorFor)]
pub fn color_for_js(scheme: &str, tag: &str) -> String {
    let scheme = match scheme {
        "danger" => ColorScheme::Danger,
        "road" => ColorScheme::Road,
        _ => ColorScheme::LandUse,
    };
    color_for(scheme, tag).to_string()
}
