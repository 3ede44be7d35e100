use crate::output::OutputWriter;
use anyhow::Result;
use polydraw_core::config::{ConfigSource, LayeredConfig};
use polydraw_core::toolbar::{DrawingToolbar, LeafletDrawToolbar};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

#[derive(Serialize)]
struct ConfigOutput {
    values: BTreeMap<String, ConfigEntry>,
    center_tile: String,
    toolbar: Vec<String>,
}

#[derive(Serialize)]
struct ConfigEntry {
    value: String,
    source: ConfigSource,
}

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let map = config.to_inspection_map();
    let widget_config = config.widget_config();
    let tile = widget_config.view.center_tile();
    let center_tile = widget_config.tiles.tile_url(tile);
    let toolbar: Vec<String> = LeafletDrawToolbar::default()
        .capabilities()
        .iter()
        .map(|capability| format!("{:?}", capability))
        .collect();

    if output.is_json() {
        let values = map
            .into_iter()
            .map(|(key, (value, source))| (key, ConfigEntry { value, source }))
            .collect();
        return output.result(ConfigOutput { values, center_tile, toolbar });
    }

    output.section("Configuration");
    let rows: Vec<ConfigRow> = map
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();
    output.table(rows);

    output.section("Map");
    output.kv("Center tile", center_tile);
    output.kv("Toolbar", toolbar.join(", "));
    Ok(())
}
