//! Map viewport and base tile layer.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::geometry::LatLng;

pub const DEFAULT_CENTER: LatLng = LatLng { lat: 37.7749, lng: -122.4194 };
pub const DEFAULT_ZOOM: u8 = 6;
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 19;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "Map data © OpenStreetMap contributors";

/// Web-mercator latitude limit; tiles do not extend past it.
const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Viewport over the world map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    center: LatLng,
    zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl MapView {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn pan_to(&mut self, center: LatLng) {
        self.center = center;
    }

    /// Set the zoom level, clamped to the view's limits. Returns the applied level.
    pub fn set_zoom(&mut self, zoom: u8) -> u8 {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.zoom
    }

    pub fn zoom_in(&mut self) -> u8 {
        self.set_zoom(self.zoom.saturating_add(1))
    }

    pub fn zoom_out(&mut self) -> u8 {
        self.set_zoom(self.zoom.saturating_sub(1))
    }

    /// Tile containing the view center at the current zoom
    pub fn center_tile(&self) -> TileCoord {
        TileCoord::containing(self.center, self.zoom)
    }
}

/// Slippy-map tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Tile containing `point` at zoom `z` (spherical mercator)
    pub fn containing(point: LatLng, z: u8) -> Self {
        let n = 2f64.powi(z as i32);
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let lng = (point.lng + 180.0).rem_euclid(360.0);

        let x = (lng / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();

        let max = n - 1.0;
        Self { z, x: x.clamp(0.0, max) as u32, y: y.clamp(0.0, max) as u32 }
    }
}

/// Base layer of pre-rendered tiles fetched from a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self::openstreetmap()
    }
}

impl TileLayer {
    pub fn new(url_template: impl Into<String>, attribution: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: attribution.into(),
        }
    }

    pub fn openstreetmap() -> Self {
        Self::new(OSM_TILE_URL, OSM_ATTRIBUTION)
    }

    /// Resolve the URL of one tile.
    ///
    /// The `{s}` subdomain rotates on `(x + y) mod subdomains` so neighbouring
    /// tiles are spread across hosts.
    pub fn tile_url(&self, tile: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let index = (tile.x as u64 + tile.y as u64) % self.subdomains.len() as u64;
            self.subdomains[index as usize].as_str()
        };

        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}
