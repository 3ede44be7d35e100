//! Polygon geometry as the drawing toolbar reports it and as the backend
//! receives it.
//!
//! The toolbar hands over vertices as unclosed `LatLng` rings. On export the
//! rings are closed, flipped to `[lng, lat]` order and rounded, which is the
//! GeoJSON polygon coordinate layout the submission endpoint expects.

use geo::{BoundingRect, Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{PolydrawError, Result};
use crate::validation::{validate_coordinates, validate_rings, ValidationResult};

/// Decimal places kept when exporting coordinates (Leaflet's `toGeoJSON` default).
pub const DEFAULT_COORDINATE_PRECISION: u32 = 6;

/// Most decimal places an f64 degree value can meaningfully carry
pub const MAX_COORDINATE_PRECISION: u32 = 15;

/// GeoJSON polygon coordinates: rings of `[lng, lat]` positions, each ring closed.
pub type PolygonCoords = geojson::PolygonType;

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a GeoJSON-ordered `[lng, lat]` pair
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<LatLng> for Coord<f64> {
    fn from(p: LatLng) -> Self {
        Coord { x: p.lng, y: p.lat }
    }
}

/// The single polygon a user has drawn.
///
/// The first ring is the outer boundary, any further rings are holes. Rings
/// are stored open (no repeated closing vertex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnPolygon {
    rings: Vec<Vec<LatLng>>,
}

impl DrawnPolygon {
    /// Create a polygon from toolbar rings.
    ///
    /// Any geometry with finite coordinates is accepted, including slivers
    /// and rings with fewer than 3 vertices; use [`Self::validate`] to check
    /// for a usable area. A trailing vertex equal to the ring's first vertex
    /// is dropped so that closed and open input produce the same polygon.
    pub fn new(rings: Vec<Vec<LatLng>>) -> Result<Self> {
        let rings: Vec<Vec<LatLng>> = rings.into_iter().map(open_ring).collect();

        let validation = validate_coordinates(&rings);
        if let Some(err) = validation.errors.into_iter().next() {
            return Err(PolydrawError::InvalidPolygon {
                location: err.location,
                reason: err.reason,
            });
        }

        Ok(Self { rings })
    }

    /// Convenience constructor for a polygon without holes
    pub fn from_vertices(vertices: Vec<LatLng>) -> Result<Self> {
        Self::new(vec![vertices])
    }

    /// Build from GeoJSON polygon coordinates (`[lng, lat]` positions).
    pub fn from_geojson_coords(coords: &PolygonCoords) -> Result<Self> {
        let mut rings = Vec::with_capacity(coords.len());
        for (i, ring) in coords.iter().enumerate() {
            let mut vertices = Vec::with_capacity(ring.len());
            for (j, position) in ring.iter().enumerate() {
                if position.len() < 2 {
                    return Err(PolydrawError::InvalidPolygon {
                        location: format!("ring[{}][{}]", i, j),
                        reason: format!(
                            "Position must have at least 2 values, found {}",
                            position.len()
                        ),
                    });
                }
                vertices.push(LatLng::from_lng_lat(position[0], position[1]));
            }
            rings.push(vertices);
        }
        Self::new(rings)
    }

    /// Check that the polygon encloses an area: an exterior ring, at least
    /// 3 distinct vertices per ring and a non-zero exterior area
    pub fn validate(&self) -> ValidationResult {
        validate_rings(&self.rings)
    }

    pub fn rings(&self) -> &[Vec<LatLng>] {
        &self.rings
    }

    pub fn exterior(&self) -> &[LatLng] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Export as GeoJSON polygon coordinates, closing every ring.
    ///
    /// `precision` is the number of decimals kept per ordinate; `None`
    /// exports full precision.
    pub fn to_geojson_coords(&self, precision: Option<u32>) -> PolygonCoords {
        self.rings
            .iter()
            .map(|ring| {
                let mut positions: Vec<Vec<f64>> = ring
                    .iter()
                    .map(|p| vec![round_to(p.lng, precision), round_to(p.lat, precision)])
                    .collect();
                if let Some(first) = positions.first().cloned() {
                    positions.push(first);
                }
                positions
            })
            .collect()
    }

    /// Convert to a `geo` polygon (x = longitude, y = latitude)
    pub fn to_geo(&self) -> Polygon<f64> {
        let mut rings = self
            .rings
            .iter()
            .map(|ring| LineString::new(ring.iter().copied().map(Coord::from).collect()));
        let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
        Polygon::new(exterior, rings.collect())
    }

    /// Bounding rectangle in degrees
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.to_geo().bounding_rect()
    }
}

fn open_ring(mut ring: Vec<LatLng>) -> Vec<LatLng> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Round like Leaflet's `formatNum`: halves go toward +inf (`Math.round`)
/// and a zero result is always positive, matching `JSON.stringify(-0)`.
fn round_to(value: f64, precision: Option<u32>) -> f64 {
    let Some(decimals) = precision else {
        return value;
    };

    let pow = 10f64.powi(decimals.min(MAX_COORDINATE_PRECISION) as i32);
    let scaled = value * pow;
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 { floor + 1.0 } else { floor };

    let result = rounded / pow;
    if result == 0.0 {
        0.0
    } else {
        result
    }
}
