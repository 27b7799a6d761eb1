//! GeoJSON loader, enabled with the `geojson` Cargo feature (on by default).
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use wf_core::RoutingConfig;
//! use wf_spatial::loader::load_geojson_file;
//!
//! let campus = load_geojson_file(Path::new("foothill.json"), &RoutingConfig::default())?;
//! ```
//!
//! # What is loaded
//!
//! Every `LineString` / `MultiLineString` feature becomes walk-network edges,
//! one undirected segment per consecutive coordinate pair, classified by
//! [`classify`].  Polygon features tagged as the campus (`boundary=campus`,
//! `campus=yes`, or `amenity=college|university`) form the [`ServiceArea`].
//! Everything else (buildings, lots, points) is ignored here; places come from
//! the static catalog.

use std::path::Path;

use geojson::{Feature, GeoJson, Value};
use tracing::{debug, info, warn};

use wf_core::{Coordinate, PathType, RoutingConfig};

use crate::boundary::ServiceArea;
use crate::network::{WalkNetwork, WalkNetworkBuilder};
use crate::SpatialError;

// ── Public entry points ───────────────────────────────────────────────────────

/// Network and boundary derived from one feature collection.
pub struct LoadedCampus {
    pub network: WalkNetwork,
    /// `None` if the collection carries no campus polygon.
    pub service_area: Option<ServiceArea>,
}

/// Load a campus from a GeoJSON file.
///
/// # Errors
///
/// Returns [`SpatialError::Io`] on file errors and
/// [`SpatialError::GeoJson`] on parse errors.
pub fn load_geojson_file(path: &Path, config: &RoutingConfig) -> Result<LoadedCampus, SpatialError> {
    let src = std::fs::read_to_string(path)?;
    info!(path = %path.display(), bytes = src.len(), "loading campus GeoJSON");
    load_geojson_str(&src, config)
}

/// Load a campus from GeoJSON text (a `FeatureCollection` or single `Feature`).
pub fn load_geojson_str(src: &str, config: &RoutingConfig) -> Result<LoadedCampus, SpatialError> {
    let features = match src.parse::<GeoJson>().map_err(|e| SpatialError::GeoJson(e.to_string()))? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(SpatialError::GeoJson(
                "expected a Feature or FeatureCollection, got a bare geometry".into(),
            ));
        }
    };

    let mut builder = WalkNetworkBuilder::new().with_weld_tolerance(config.weld_tolerance_m);
    let mut service_area: Option<ServiceArea> = None;
    let mut lines = 0usize;

    for feature in &features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let tags = collect_tags(feature);

        match &geometry.value {
            Value::LineString(line) => {
                builder.add_polyline(&positions(line)?, classify(&tags));
                lines += 1;
            }
            Value::MultiLineString(parts) => {
                let path_type = classify(&tags);
                for line in parts {
                    builder.add_polyline(&positions(line)?, path_type);
                }
                lines += 1;
            }
            Value::Polygon(rings) if is_campus(&tags) => {
                add_area_part(&mut service_area, rings)?;
            }
            Value::MultiPolygon(polys) if is_campus(&tags) => {
                for rings in polys {
                    add_area_part(&mut service_area, rings)?;
                }
            }
            _ => {}
        }
    }

    if service_area.is_none() {
        warn!("no campus boundary polygon found; membership will be unavailable");
    }

    let network = builder.build();
    info!(
        features = features.len(),
        lines,
        nodes = network.node_count(),
        half_edges = network.edge_count(),
        "loaded walk network"
    );

    Ok(LoadedCampus { network, service_area })
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// Classify a line feature from its string tags.
///
/// Priority: waterway > steps > inclined footway > footway > elevator >
/// service road > anything else.
pub fn classify(tags: &[(&str, &str)]) -> PathType {
    let get = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

    if get("waterway").is_some() {
        return PathType::Waterway;
    }

    let highway = get("highway").unwrap_or("");
    if highway == "steps" {
        return PathType::Stairs;
    }

    let walkable = matches!(highway, "footway" | "path" | "pedestrian") || get("foot") == Some("yes");
    if walkable {
        let inclined = get("incline").is_some_and(|v| !matches!(v, "no" | "0" | "0%"));
        return if inclined { PathType::SteepFootway } else { PathType::Footway };
    }

    if get("elevator") == Some("yes") || highway == "elevator" {
        return PathType::Elevator;
    }
    if highway == "service" {
        return PathType::ServiceRoad;
    }
    PathType::Road
}

fn is_campus(tags: &[(&str, &str)]) -> bool {
    tags.iter().any(|&(k, v)| {
        matches!(
            (k, v),
            ("boundary", "campus") | ("campus", "yes") | ("amenity", "college") | ("amenity", "university")
        )
    })
}

/// String-valued properties only; numbers and nested objects carry no
/// classification signal.
fn collect_tags(feature: &Feature) -> Vec<(&str, &str)> {
    feature
        .properties
        .iter()
        .flat_map(|props| props.iter())
        .filter_map(|(k, v)| v.as_str().map(|s| (k.as_str(), s)))
        .collect()
}

fn positions(line: &[Vec<f64>]) -> Result<Vec<Coordinate>, SpatialError> {
    line.iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Ok(Coordinate::new(*lon, *lat)),
            _ => Err(SpatialError::GeoJson(format!("position with {} components", p.len()))),
        })
        .collect()
}

fn add_area_part(area: &mut Option<ServiceArea>, rings: &[Vec<Vec<f64>>]) -> Result<(), SpatialError> {
    let Some((outer, inner)) = rings.split_first() else {
        return Ok(());
    };
    let exterior = positions(outer)?;
    let holes = inner.iter().map(|r| positions(r)).collect::<Result<Vec<_>, _>>()?;

    match area {
        Some(existing) => existing.push_part(&exterior, &holes)?,
        None => *area = Some(ServiceArea::with_holes(&exterior, &holes)?),
    }
    debug!(holes = holes.len(), "added campus boundary part");
    Ok(())
}
