//! Parsing of polygon and session input

use anyhow::{bail, Context, Result};
use geojson::{GeoJson, Value};
use polydraw_core::error::PolydrawError;
use polydraw_core::models::{DrawnPolygon, DrawnShape, LatLng};
use polydraw_core::toolbar::DrawEvent;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Parse a ring given as "lng,lat lng,lat ..."
pub fn parse_ring(text: &str) -> Result<Vec<LatLng>> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, pair)| {
            let (lng, lat) = pair
                .split_once(',')
                .with_context(|| format!("Vertex {} ('{}') is not a lng,lat pair", i, pair))?;
            let lng: f64 =
                lng.trim().parse().with_context(|| format!("Vertex {}: invalid longitude '{}'", i, lng))?;
            let lat: f64 =
                lat.trim().parse().with_context(|| format!("Vertex {}: invalid latitude '{}'", i, lat))?;
            Ok(LatLng::from_lng_lat(lng, lat))
        })
        .collect()
}

/// Read a polygon from a GeoJSON file
pub fn read_geojson_polygon(path: &Path) -> Result<DrawnPolygon> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read GeoJSON file: {}", path.display()))?;
    let geojson: GeoJson = text
        .parse()
        .with_context(|| format!("Failed to parse GeoJSON: {}", path.display()))?;

    let geometry = match geojson {
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::Feature(feature) => feature.geometry.context("Feature has no geometry")?,
        GeoJson::FeatureCollection(collection) => {
            if collection.features.len() != 1 {
                bail!(
                    "FeatureCollection must hold exactly one feature, found {}",
                    collection.features.len()
                );
            }
            collection
                .features
                .into_iter()
                .next()
                .and_then(|feature| feature.geometry)
                .context("Feature has no geometry")?
        }
    };

    match geometry.value {
        Value::Polygon(coords) => Ok(DrawnPolygon::from_geojson_coords(&coords)?),
        other => bail!("Expected a Polygon geometry, found {}", geometry_type_name(&other)),
    }
}

fn geometry_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// One line of a recorded drawing session
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum SessionEvent {
    Created { shape: DrawnShape },
    Edited { rings: Vec<Vec<LatLng>> },
    Deleted,
    Clear,
    Confirm,
    Pan { lat: f64, lng: f64 },
    Zoom { level: u8 },
}

impl SessionEvent {
    /// Toolbar event carried by this line, if it is one
    pub fn into_draw_event(self) -> Option<DrawEvent> {
        match self {
            SessionEvent::Created { shape } => Some(DrawEvent::Created(shape)),
            SessionEvent::Edited { rings } => Some(DrawEvent::Edited(rings)),
            SessionEvent::Deleted => Some(DrawEvent::Deleted),
            _ => None,
        }
    }
}

/// Parse a JSON-lines session; blank lines and `#` comments are skipped
pub fn parse_session(text: &str) -> Result<Vec<(usize, SessionEvent)>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            let event = serde_json::from_str(line)
                .with_context(|| format!("Line {}: invalid session event", line_no))?;
            Ok((line_no, event))
        })
        .collect()
}

/// Require typed-in or file polygons to enclose an area before drawing them
pub fn ensure_area(polygon: DrawnPolygon) -> Result<DrawnPolygon> {
    if let Some(err) = polygon.validate().errors.into_iter().next() {
        return Err(PolydrawError::InvalidPolygon { location: err.location, reason: err.reason }.into());
    }
    Ok(polygon)
}

/// Build the created-shape for a polygon read from input
pub fn polygon_shape(polygon: &DrawnPolygon) -> DrawnShape {
    DrawnShape::Polygon { rings: polygon.rings().to_vec() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_ring() {
        let ring = parse_ring("0,0 0,1  1,1 1,0").unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[1], LatLng::new(1.0, 0.0));
    }

    #[test]
    fn test_parse_ring_reports_bad_vertex() {
        let err = parse_ring("0,0 nope 1,1").unwrap_err();
        assert!(err.to_string().contains("Vertex 1"));

        assert!(parse_ring("0,0 1,x").is_err());
    }

    #[test]
    fn test_read_geojson_feature() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type":"Feature","properties":{{}},"geometry":{{"type":"Polygon","coordinates":[[[-116.5,43.5],[-116.0,43.5],[-116.0,44.0],[-116.5,43.5]]]}}}}"#
        )
        .unwrap();

        let polygon = read_geojson_polygon(file.path()).unwrap();
        assert_eq!(polygon.vertex_count(), 3);
        assert_eq!(polygon.exterior()[0], LatLng::new(43.5, -116.5));
    }

    #[test]
    fn test_read_geojson_rejects_points() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"type":"Point","coordinates":[0.0,0.0]}}"#).unwrap();

        let err = read_geojson_polygon(file.path()).unwrap_err();
        assert!(err.to_string().contains("Expected a Polygon"));
    }

    #[test]
    fn test_ensure_area_rejects_collinear_ring() {
        let polygon = DrawnPolygon::new(vec![parse_ring("10,10 11,11 12,12").unwrap()]).unwrap();
        let err = ensure_area(polygon).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PolydrawError>(),
            Some(PolydrawError::InvalidPolygon { .. })
        ));
        assert!(err.to_string().contains("non-zero area"));

        let square = DrawnPolygon::new(vec![parse_ring("0,0 1,0 1,1 0,1").unwrap()]).unwrap();
        assert!(ensure_area(square).is_ok());
    }

    #[test]
    fn test_parse_session() {
        let text = r#"
# draw, fix, submit
{"event":"pan","lat":43.6,"lng":-116.2}
{"event":"created","shape":{"kind":"polygon","rings":[[{"lat":0,"lng":0},{"lat":1,"lng":0},{"lat":1,"lng":1}]]}}
{"event":"clear"}
{"event":"confirm"}
"#;
        let events = parse_session(text).unwrap();

        assert_eq!(events.len(), 4);
        assert_eq!(events[0].0, 3);
        assert!(matches!(events[1].1, SessionEvent::Created { .. }));
        assert!(matches!(events[3].1, SessionEvent::Confirm));
    }

    #[test]
    fn test_parse_session_reports_line() {
        let err = parse_session("{\"event\":\"clear\"}\n{\"event\":\"explode\"}").unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }
}
