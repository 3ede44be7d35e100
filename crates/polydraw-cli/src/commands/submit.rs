//! Submit command implementation

use super::Page;
use crate::cli::SubmitArgs;
use crate::errors;
use crate::input::{ensure_area, parse_ring, polygon_shape, read_geojson_polygon};
use crate::output::OutputWriter;
use anyhow::{bail, Result};
use polydraw_core::config::LayeredConfig;
use polydraw_core::error::SubmitError;
use polydraw_core::models::{DrawnPolygon, DrawnShape};
use polydraw_core::ports::PolygonSubmitter;
use polydraw_core::{ConfirmOutcome, NO_POLYGON_ALERT};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SubmitOutput {
    location: String,
    vertex_count: usize,
    polygon_coords: geojson::PolygonType,
    dry_run: bool,
}

pub async fn execute(
    args: SubmitArgs,
    config: &LayeredConfig,
    submitter: &dyn PolygonSubmitter,
    output: &OutputWriter,
    dry_run: bool,
) -> Result<()> {
    let mut page = Page::open(config);

    if let Some(shape) = read_shape(&args)? {
        page.widget.on_created(shape)?;
    }

    let (vertex_count, polygon_coords) = match page.widget.drawn_polygon() {
        Some(polygon) => {
            let coords = polygon.to_geojson_coords(Some(config.coordinate_precision.value));
            output.section("Polygon");
            output.kv("Vertices", polygon.vertex_count());
            output.kv("Rings", polygon.rings().len());
            if let Some(bounds) = polygon.bounds() {
                output.kv(
                    "Bounds",
                    format!(
                        "{:.6}, {:.6} → {:.6}, {:.6}",
                        bounds.min().x,
                        bounds.min().y,
                        bounds.max().x,
                        bounds.max().y
                    ),
                );
            }
            (polygon.vertex_count(), coords)
        }
        None => (0, Vec::new()),
    };

    if dry_run {
        output.info("Dry run: the submission will not leave this machine");
    }

    match page.widget.confirm(submitter).await? {
        ConfirmOutcome::NothingDrawn => {
            bail!(errors::CliError::new(NO_POLYGON_ALERT)
                .with_suggestion("Pass a ring: polydraw submit --ring \"lng,lat lng,lat lng,lat\"")
                .with_suggestion("Or a file: polydraw submit --geojson area.geojson")
                .with_help("Run: polydraw submit --help"))
        }
        ConfirmOutcome::Navigated { location } => {
            output.success(format!("Polygon submitted; page moved to {}", location));
            output.result(SubmitOutput { location, vertex_count, polygon_coords, dry_run })
        }
        ConfirmOutcome::Failed(err) => match err {
            SubmitError::Transport(reason) => {
                bail!(errors::backend_unreachable(&config.base_url.value, &reason))
            }
            other => bail!(errors::backend_rejected(&other.to_string())),
        },
    }
}

fn read_shape(args: &SubmitArgs) -> Result<Option<DrawnShape>> {
    let polygon = if let Some(ref path) = args.geojson {
        read_geojson_polygon(path)?
    } else if args.rings.is_empty() {
        return Ok(None);
    } else {
        let rings = args.rings.iter().map(|ring| parse_ring(ring)).collect::<Result<Vec<_>>>()?;
        DrawnPolygon::new(rings)?
    };

    Ok(Some(polygon_shape(&ensure_area(polygon)?)))
}
