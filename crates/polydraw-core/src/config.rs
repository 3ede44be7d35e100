use crate::error::{PolydrawError, Result};
use crate::models::map::{DEFAULT_CENTER, DEFAULT_ZOOM, OSM_ATTRIBUTION, OSM_TILE_URL};
use crate::models::{
    LatLng, MapView, TileLayer, DEFAULT_COORDINATE_PRECISION, MAX_COORDINATE_PRECISION,
};
use crate::widget::WidgetConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_SUBMIT_PATH: &str = "/draw_polygon";
pub const DEFAULT_RESULT_PATH: &str = "/result";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the polygon widget and its HTTP client
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub center_lat: ConfigValue<f64>,
    pub center_lng: ConfigValue<f64>,
    pub zoom: ConfigValue<u8>,
    pub tile_url: ConfigValue<String>,
    pub attribution: ConfigValue<String>,
    pub submit_path: ConfigValue<String>,
    pub result_path: ConfigValue<String>,
    pub base_url: ConfigValue<String>,
    pub timeout_secs: ConfigValue<u64>,
    pub coordinate_precision: ConfigValue<u32>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            center_lat: ConfigValue::new(DEFAULT_CENTER.lat, ConfigSource::Default),
            center_lng: ConfigValue::new(DEFAULT_CENTER.lng, ConfigSource::Default),
            zoom: ConfigValue::new(DEFAULT_ZOOM, ConfigSource::Default),
            tile_url: ConfigValue::new(OSM_TILE_URL.to_string(), ConfigSource::Default),
            attribution: ConfigValue::new(OSM_ATTRIBUTION.to_string(), ConfigSource::Default),
            submit_path: ConfigValue::new(DEFAULT_SUBMIT_PATH.to_string(), ConfigSource::Default),
            result_path: ConfigValue::new(DEFAULT_RESULT_PATH.to_string(), ConfigSource::Default),
            base_url: ConfigValue::new(DEFAULT_BASE_URL.to_string(), ConfigSource::Default),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            coordinate_precision: ConfigValue::new(
                DEFAULT_COORDINATE_PRECISION,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| PolydrawError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| PolydrawError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(map) = file_config.map {
            if let Some(lat) = map.center_lat {
                self.center_lat.update(lat, ConfigSource::File);
            }
            if let Some(lng) = map.center_lng {
                self.center_lng.update(lng, ConfigSource::File);
            }
            if let Some(zoom) = map.zoom {
                self.zoom.update(zoom, ConfigSource::File);
            }
            if let Some(tile_url) = map.tile_url {
                self.tile_url.update(tile_url, ConfigSource::File);
            }
            if let Some(attribution) = map.attribution {
                self.attribution.update(attribution, ConfigSource::File);
            }
        }

        if let Some(endpoint) = file_config.endpoint {
            if let Some(base_url) = endpoint.base_url {
                self.base_url.update(base_url, ConfigSource::File);
            }
            if let Some(submit_path) = endpoint.submit_path {
                self.submit_path.update(submit_path, ConfigSource::File);
            }
            if let Some(result_path) = endpoint.result_path {
                self.result_path.update(result_path, ConfigSource::File);
            }
            if let Some(timeout_secs) = endpoint.timeout_secs {
                self.timeout_secs.update(timeout_secs, ConfigSource::File);
            }
        }

        if let Some(precision) = file_config.coordinate_precision {
            if precision > MAX_COORDINATE_PRECISION {
                return Err(precision_out_of_range(precision));
            }
            self.coordinate_precision.update(precision, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // POLYDRAW_BASE_URL
        if let Ok(base_url) = env::var("POLYDRAW_BASE_URL") {
            self.base_url.update(base_url, ConfigSource::Environment);
        }

        // POLYDRAW_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("POLYDRAW_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => self.timeout_secs.update(timeout, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid POLYDRAW_TIMEOUT_SECS value '{}': expected whole seconds",
                    timeout_str
                ),
            }
        }

        // POLYDRAW_ZOOM
        if let Ok(zoom_str) = env::var("POLYDRAW_ZOOM") {
            match parse_zoom(&zoom_str) {
                Ok(zoom) => self.zoom.update(zoom, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid POLYDRAW_ZOOM value '{}': expected integer between 0 and 19",
                    zoom_str
                ),
            }
        }

        // POLYDRAW_TILE_URL
        if let Ok(tile_url) = env::var("POLYDRAW_TILE_URL") {
            self.tile_url.update(tile_url, ConfigSource::Environment);
        }

        // POLYDRAW_PRECISION
        if let Ok(precision_str) = env::var("POLYDRAW_PRECISION") {
            match precision_str.parse::<u32>() {
                Ok(precision) if precision <= MAX_COORDINATE_PRECISION => {
                    self.coordinate_precision.update(precision, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid POLYDRAW_PRECISION value '{}': expected decimals between 0 and 15",
                    precision_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url.update(base_url, ConfigSource::Cli);
        }

        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs.update(timeout_secs, ConfigSource::Cli);
        }

        if let Some(zoom) = overrides.zoom {
            self.zoom.update(zoom, ConfigSource::Cli);
        }
    }

    /// Check values that would only fail later, at submit time
    pub fn validate(&self) -> Result<()> {
        for (key, path) in
            [("submit_path", &self.submit_path.value), ("result_path", &self.result_path.value)]
        {
            if !path.starts_with('/') {
                return Err(PolydrawError::ConfigInvalid {
                    key: key.to_string(),
                    reason: format!("'{}' must be an absolute path starting with '/'", path),
                });
            }
        }

        let base_url = &self.base_url.value;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PolydrawError::ConfigInvalid {
                key: "base_url".to_string(),
                reason: format!("'{}' must start with http:// or https://", base_url),
            });
        }

        let missing: Vec<&str> = ["{z}", "{x}", "{y}"]
            .into_iter()
            .filter(|placeholder| !self.tile_url.value.contains(*placeholder))
            .collect();
        if !missing.is_empty() {
            return Err(PolydrawError::ConfigInvalid {
                key: "tile_url".to_string(),
                reason: format!(
                    "Tile URL template must contain {{z}}, {{x}} and {{y}}; missing {}",
                    missing.join(", ")
                ),
            });
        }

        if self.coordinate_precision.value > MAX_COORDINATE_PRECISION {
            return Err(precision_out_of_range(self.coordinate_precision.value));
        }

        Ok(())
    }

    /// Resolve the settings the widget itself needs
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            view: MapView::new(
                LatLng::new(self.center_lat.value, self.center_lng.value),
                self.zoom.value,
            ),
            tiles: TileLayer::new(self.tile_url.value.clone(), self.attribution.value.clone()),
            submit_path: self.submit_path.value.clone(),
            result_path: self.result_path.value.clone(),
            coordinate_precision: Some(self.coordinate_precision.value),
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut map = BTreeMap::new();

        map.insert(
            "center".to_string(),
            (
                format!("{}, {}", self.center_lat.value, self.center_lng.value),
                self.center_lat.source.max_by_precedence(self.center_lng.source),
            ),
        );
        map.insert("zoom".to_string(), (self.zoom.value.to_string(), self.zoom.source));
        map.insert("tile_url".to_string(), (self.tile_url.value.clone(), self.tile_url.source));
        map.insert(
            "attribution".to_string(),
            (self.attribution.value.clone(), self.attribution.source),
        );
        map.insert(
            "submit_path".to_string(),
            (self.submit_path.value.clone(), self.submit_path.source),
        );
        map.insert(
            "result_path".to_string(),
            (self.result_path.value.clone(), self.result_path.source),
        );
        map.insert("base_url".to_string(), (self.base_url.value.clone(), self.base_url.source));
        map.insert(
            "timeout_secs".to_string(),
            (self.timeout_secs.value.to_string(), self.timeout_secs.source),
        );
        map.insert(
            "coordinate_precision".to_string(),
            (self.coordinate_precision.value.to_string(), self.coordinate_precision.source),
        );

        map
    }
}

impl ConfigSource {
    fn max_by_precedence(self, other: ConfigSource) -> ConfigSource {
        if other.precedence() > self.precedence() {
            other
        } else {
            self
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
struct FileConfig {
    map: Option<MapSection>,
    endpoint: Option<EndpointSection>,
    coordinate_precision: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct MapSection {
    center_lat: Option<f64>,
    center_lng: Option<f64>,
    zoom: Option<u8>,
    tile_url: Option<String>,
    attribution: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct EndpointSection {
    base_url: Option<String>,
    submit_path: Option<String>,
    result_path: Option<String>,
    timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub zoom: Option<u8>,
}

/// Parse a zoom level from string
pub fn parse_zoom(s: &str) -> Result<u8> {
    match s.trim().parse::<u8>() {
        Ok(zoom) if zoom <= crate::models::map::MAX_ZOOM => Ok(zoom),
        _ => Err(PolydrawError::ConfigInvalid {
            key: "zoom".to_string(),
            reason: format!("Invalid zoom level: {}. Use an integer between 0 and 19", s),
        }),
    }
}

fn precision_out_of_range(precision: u32) -> PolydrawError {
    PolydrawError::ConfigInvalid {
        key: "coordinate_precision".to_string(),
        reason: format!(
            "{} decimals requested; use a value between 0 and {}",
            precision, MAX_COORDINATE_PRECISION
        ),
    }
}
