use crate::cli::TileUrlArgs;
use crate::output::OutputWriter;
use anyhow::{bail, Result};
use polydraw_core::config::LayeredConfig;
use polydraw_core::models::TileCoord;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TileUrlOutput {
    url: String,
    attribution: String,
}

pub fn execute(args: TileUrlArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if args.z > 30 {
        bail!("Zoom {} is out of range", args.z);
    }
    let tiles_per_side = 1u64 << args.z;
    if u64::from(args.x) >= tiles_per_side || u64::from(args.y) >= tiles_per_side {
        bail!(
            "Tile {}/{}/{} does not exist: x and y must be below {} at zoom {}",
            args.z,
            args.x,
            args.y,
            tiles_per_side,
            args.z
        );
    }

    let tiles = config.widget_config().tiles;
    let url = tiles.tile_url(TileCoord::new(args.z, args.x, args.y));

    if output.is_json() {
        output.result(TileUrlOutput { url, attribution: tiles.attribution })
    } else {
        println!("{}", url);
        Ok(())
    }
}
