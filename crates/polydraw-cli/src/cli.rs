use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// polydraw - draw one polygon on a web map and submit it
#[derive(Parser, Debug)]
#[command(name = "polydraw")]
#[command(about = "Single-polygon selection widget for web maps", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Answer submissions locally instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend origin the endpoint paths are resolved against
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Initial zoom level of the map view (0-19)
    #[arg(long, global = true)]
    pub zoom: Option<u8>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw one polygon and confirm it against the backend
    Submit(SubmitArgs),

    /// Replay a recorded drawing session (JSON lines)
    Replay(ReplayArgs),

    /// Print the URL of a map tile
    TileUrl(TileUrlArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// Polygon ring as "lng,lat lng,lat ..." (repeat for holes; first is the exterior)
    #[arg(long = "ring", value_name = "COORDS", conflicts_with = "geojson")]
    pub rings: Vec<String>,

    /// GeoJSON file holding a Polygon geometry, Feature, or single-feature FeatureCollection
    #[arg(long, value_name = "PATH")]
    pub geojson: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Session file, one JSON event per line
    pub path: PathBuf,

    /// Keep replaying after an event is rejected
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Parser, Debug)]
pub struct TileUrlArgs {
    /// Zoom level
    pub z: u8,

    /// Tile column
    pub x: u32,

    /// Tile row
    pub y: u32,
}
