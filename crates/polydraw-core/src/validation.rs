use geo::{Area, Coord, LineString, Polygon};

use crate::models::LatLng;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }
}

/// Check that every vertex is a usable coordinate.
///
/// This is the only check applied to toolbar geometry: whatever the user
/// finished drawing is held, however thin.
pub fn validate_coordinates(rings: &[Vec<LatLng>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    for (i, ring) in rings.iter().enumerate() {
        for (j, vertex) in ring.iter().enumerate() {
            if !vertex.is_finite() {
                result.add_error(
                    format!("{}[{}]", ring_location(i), j),
                    "Coordinates must be finite".to_string(),
                );
            }
        }
    }

    result
}

/// Validate open polygon rings as an area of interest.
///
/// Ring 0 is the exterior; it must exist and enclose a non-zero area.
pub fn validate_rings(rings: &[Vec<LatLng>]) -> ValidationResult {
    if rings.is_empty() {
        let mut result = ValidationResult::valid();
        result.add_error("Polygon".to_string(), "Polygon must have an exterior ring".to_string());
        return result;
    }

    let mut result = validate_coordinates(rings);

    for (i, ring) in rings.iter().enumerate() {
        let distinct = distinct_vertices(ring);
        if distinct < 3 {
            result.add_error(
                ring_location(i),
                format!("Ring must have at least 3 distinct vertices, found {}", distinct),
            );
        }
    }

    if result.is_valid {
        let exterior = LineString::new(rings[0].iter().copied().map(Coord::from).collect());
        if Polygon::new(exterior, vec![]).unsigned_area() == 0.0 {
            result.add_error(
                ring_location(0),
                "Polygon exterior must enclose a non-zero area".to_string(),
            );
        }
    }

    result
}

fn ring_location(index: usize) -> String {
    if index == 0 {
        "Polygon exterior".to_string()
    } else {
        format!("Polygon interior[{}]", index - 1)
    }
}

fn distinct_vertices(ring: &[LatLng]) -> usize {
    let mut seen: Vec<LatLng> = Vec::with_capacity(ring.len());
    for vertex in ring {
        if !seen.contains(vertex) {
            seen.push(*vertex);
        }
    }
    seen.len()
}
