//! Embedded demo campus: a handful of footways, one stair, one ramp, one
//! elevator, a stream, and the campus boundary.
//!
//! Every catalog entry point below is also a vertex of the GeoJSON lines, so
//! places resolve by exact lookup.

use wf_core::{Coordinate, WfResult};
use wf_session::{LotClass, Place, PlaceCatalog};

pub const LIBRARY_WEST:  Coordinate = Coordinate { lon: -122.1268, lat: 37.3615 };
pub const LIBRARY_EAST:  Coordinate = Coordinate { lon: -122.1262, lat: 37.3616 };
pub const LIBRARY_UPPER: Coordinate = Coordinate { lon: -122.12615, lat: 37.36165 };
pub const GYM:           Coordinate = Coordinate { lon: -122.1275, lat: 37.3620 };
pub const HILLTOP:       Coordinate = Coordinate { lon: -122.1262, lat: 37.3624 };
pub const LOT_1B:        Coordinate = Coordinate { lon: -122.1256931, lat: 37.3609855 };
pub const LOT_1D:        Coordinate = Coordinate { lon: -122.1254695, lat: 37.3618776 };
pub const STAFF_LOT:     Coordinate = Coordinate { lon: -122.1250, lat: 37.3612 };

pub const CAMPUS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "highway": "footway", "name": "Quad walk" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1256931, 37.3609855], [-122.1262, 37.3612], [-122.1262, 37.3616] ] } },
    { "type": "Feature", "properties": { "highway": "footway" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1268, 37.3615], [-122.1262, 37.3616] ] } },
    { "type": "Feature", "properties": { "highway": "path" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1268, 37.3615], [-122.1272, 37.3618], [-122.1275, 37.3620] ] } },
    { "type": "Feature", "properties": { "highway": "steps" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1262, 37.3616], [-122.1262, 37.3624] ] } },
    { "type": "Feature", "properties": { "highway": "footway", "surface": "asphalt" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1262, 37.3616], [-122.1257, 37.3620], [-122.1257, 37.3623], [-122.1262, 37.3624] ] } },
    { "type": "Feature", "properties": { "highway": "service" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1254695, 37.3618776], [-122.1257, 37.3620] ] } },
    { "type": "Feature", "properties": { "highway": "footway" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1262, 37.3612], [-122.1250, 37.3612] ] } },
    { "type": "Feature", "properties": { "highway": "elevator" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1262, 37.3616], [-122.12615, 37.36165] ] } },
    { "type": "Feature", "properties": { "waterway": "stream", "name": "Adobe Creek" },
      "geometry": { "type": "LineString", "coordinates": [
        [-122.1280, 37.3605], [-122.1262, 37.3604], [-122.1245, 37.3603] ] } },
    { "type": "Feature", "properties": { "building": "yes", "name": "Library" },
      "geometry": { "type": "Polygon", "coordinates": [[
        [-122.1269, 37.3614], [-122.1261, 37.3614], [-122.1261, 37.3617], [-122.1269, 37.3617], [-122.1269, 37.3614] ]] } },
    { "type": "Feature", "properties": { "amenity": "college", "name": "Foothill College" },
      "geometry": { "type": "Polygon", "coordinates": [[
        [-122.1290, 37.3598], [-122.1240, 37.3598], [-122.1240, 37.3630], [-122.1290, 37.3630], [-122.1290, 37.3598] ]] } }
  ]
}"#;

pub fn catalog() -> WfResult<PlaceCatalog> {
    PlaceCatalog::from_places([
        Place::new("Library", vec![LIBRARY_WEST, LIBRARY_EAST])?
            .with_link("https://foothill.edu/library"),
        Place::new("Library Level 2", vec![LIBRARY_UPPER])?.with_floor(2),
        Place::new("Gym", vec![GYM])?,
        Place::new("Hilltop Hall", vec![HILLTOP])?,
        Place::new("Lot 1-B", vec![LOT_1B])?.with_lot(LotClass::Student),
        Place::new("Lot 1-D", vec![LOT_1D])?
            .with_lot(LotClass::Student)
            .with_highlightable(false),
        Place::new("Staff Lot", vec![STAFF_LOT])?.with_lot(LotClass::Staff),
    ])
}
