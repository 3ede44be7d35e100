pub mod geometry;
pub mod map;
pub mod shape;

pub use geometry::{
    DrawnPolygon, LatLng, PolygonCoords, DEFAULT_COORDINATE_PRECISION, MAX_COORDINATE_PRECISION,
};
pub use map::{MapView, TileCoord, TileLayer};
pub use shape::{DrawnShape, ShapeKind};
