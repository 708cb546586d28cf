//! Area, length, display formatting and map colors for village GIS records.
//!
//! The same functions back the server-side recompute-on-save path, the CLI
//! and the browser bundle (see `wasm`), so stored and previewed values agree.

pub mod area;
pub mod color;
pub mod config;
pub mod format;
pub mod geometry;
pub mod length;
pub mod map;
pub mod point;
pub mod read_polygon;
pub mod record;
pub mod reference;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use area::{area_from_payload, compute_area};
pub use format::{format_area, format_length};
pub use geometry::{FeatureGeometry, LocationType};
pub use length::{compute_length, compute_perimeter};
pub use point::Coordinate;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TagError {
    #[error("unknown {kind} tag: {tag:?}")]
    UnknownTag { kind: &'static str, tag: String },
}
