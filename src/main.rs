use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use desa_geo::color::{ColorScheme, color_for};
use desa_geo::config::ReportConfig;
use desa_geo::format::{format_area, format_length};
use desa_geo::geometry::{FeatureGeometry, LocationType, parse_path};
use desa_geo::length::compute_length;
use desa_geo::map::{self, MapShape, SvgPreview};
use desa_geo::read_polygon;
use desa_geo::record::{FeatureRecord, recompute_all};
use desa_geo::reference;

#[derive(Parser)]
#[command(about = "Area, length and map colors for village GIS records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Area of a stored location payload
    Area {
        #[arg(long = "type")]
        location_type: LocationType,
        /// lokasi_data as JSON
        #[arg(long)]
        data: String,
    },
    /// Great-circle length of a `[[lat, lng], ...]` path
    Length {
        #[arg(long)]
        path: String,
    },
    /// Map color for a category tag
    Color {
        #[arg(long, value_enum, default_value_t = ColorScheme::LandUse)]
        scheme: ColorScheme,
        tag: String,
    },
    /// Recompute `luas` for a JSON array of records
    Recompute {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Area and length table for GeoJSON / KML / GPX files or directories
    Report {
        paths: Vec<PathBuf>,
        #[arg(long)]
        svg: Option<PathBuf>,
        #[arg(long)]
        geojson: Option<PathBuf>,
        #[arg(long)]
        category_property: Option<String>,
        #[arg(long, value_enum)]
        scheme: Option<ColorScheme>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();
    match args.command {
        Command::Area {
            location_type,
            data,
        } => {
            let payload: serde_json::Value =
                serde_json::from_str(&data).context("--data is not JSON")?;
            let geometry = FeatureGeometry::from_payload(location_type, &payload);
            let area = geometry.area();
            println!("{:.2} m² ({})", area, format_area(area));
        }
        Command::Length { path } => {
            let payload: serde_json::Value =
                serde_json::from_str(&path).context("--path is not JSON")?;
            let length = compute_length(&parse_path(&payload));
            println!("{:.2} m ({})", length, format_length(length));
        }
        Command::Color { scheme, tag } => println!("{}", color_for(scheme, &tag)),
        Command::Recompute { input, output } => recompute(&input, output.as_deref())?,
        Command::Report {
            paths,
            svg,
            geojson,
            category_property,
            scheme,
        } => {
            let mut config = ReportConfig::from_env();
            if let Some(p) = category_property {
                config.category_property = p;
            }
            if let Some(s) = scheme {
                config.scheme = s;
            }
            report(&paths, &config, svg.as_deref(), geojson.as_deref())?;
        }
    }
    Ok(())
}

fn recompute(input: &Path, output: Option<&Path>) -> Result<()> {
    let content =
        fs::read_to_string(input).with_context(|| format!("cannot read {}", input.display()))?;
    let mut records: Vec<FeatureRecord> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a list of records", input.display()))?;
    let results = recompute_all(&mut records);
    let changed = results.iter().filter(|r| r.changed()).count();
    log::info!("{} records, {} changed", results.len(), changed);

    let json = serde_json::to_string_pretty(&records)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn report(
    paths: &[PathBuf],
    config: &ReportConfig,
    svg: Option<&Path>,
    geojson_out: Option<&Path>,
) -> Result<()> {
    let features = read_polygon::read_paths(paths, config)?;
    if features.is_empty() {
        log::warn!("no features found");
        return Ok(());
    }

    println!(
        "{:<30} {:<8} {:>14} {:>14} {:>9} {:>12}",
        "name", "kind", "area", "geodesic", "dev", "length"
    );
    for f in &features {
        let (geodesic, deviation) = match &f.shape {
            MapShape::Area(FeatureGeometry::Polygon(ring)) => (
                format_area(reference::geodesic_area(ring)),
                reference::approximation_error(ring)
                    .map(|e| format!("{:+.2}%", e * 100.0))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            _ => ("-".to_string(), "-".to_string()),
        };
        println!(
            "{:<30} {:<8} {:>14} {:>14} {:>9} {:>12}",
            f.name,
            f.shape.kind(),
            format_area(f.shape.area()),
            geodesic,
            deviation,
            format_length(f.shape.length())
        );
    }

    let color =
        |category: &Option<String>| color_for(config.scheme, category.as_deref().unwrap_or(""));

    if let Some(path) = geojson_out {
        let collection = map::to_feature_collection(
            features
                .iter()
                .map(|f| {
                    let mut properties = geojson::JsonObject::new();
                    properties.insert("nama".to_string(), f.name.clone().into());
                    if let Some(c) = &f.category {
                        properties.insert(config.category_property.clone(), c.clone().into());
                    }
                    map::to_feature(&f.shape, color(&f.category), properties)
                })
                .collect(),
        );
        fs::write(path, serde_json::to_string_pretty(&collection)?)
            .with_context(|| format!("cannot write {}", path.display()))?;
        log::info!("geojson: {}", path.display());
    }

    if let Some(path) = svg {
        let bbox = features
            .iter()
            .filter_map(|f| f.shape.bbox())
            .reduce(|a, b| a.union(&b));
        let Some(bbox) = bbox else {
            log::warn!("svg: nothing to draw");
            return Ok(());
        };
        let mut preview = SvgPreview::init(&bbox, config.svg_size);
        for f in &features {
            preview.add(&f.shape, color(&f.category));
        }
        fs::write(path, preview.render())
            .with_context(|| format!("cannot write {}", path.display()))?;
        log::info!("svg: {} ({})", path.display(), bbox);
    }
    Ok(())
}
