use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::LatLng;

/// Shape families a drawing toolbar can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Polygon,
    Polyline,
    Rectangle,
    Circle,
    Marker,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Polygon,
        ShapeKind::Polyline,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Marker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Marker => "marker",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shape as finished by the drawing toolbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawnShape {
    /// Outer ring first, holes after; rings are unclosed
    Polygon { rings: Vec<Vec<LatLng>> },
    Polyline { vertices: Vec<LatLng> },
    Rectangle { south_west: LatLng, north_east: LatLng },
    Circle { center: LatLng, radius_m: f64 },
    Marker { position: LatLng },
}

impl DrawnShape {
    pub fn polygon(vertices: Vec<LatLng>) -> Self {
        DrawnShape::Polygon { rings: vec![vertices] }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            DrawnShape::Polygon { .. } => ShapeKind::Polygon,
            DrawnShape::Polyline { .. } => ShapeKind::Polyline,
            DrawnShape::Rectangle { .. } => ShapeKind::Rectangle,
            DrawnShape::Circle { .. } => ShapeKind::Circle,
            DrawnShape::Marker { .. } => ShapeKind::Marker,
        }
    }
}
