//! Replay command implementation

use super::Page;
use crate::cli::ReplayArgs;
use crate::input::{parse_session, SessionEvent};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use polydraw_core::config::LayeredConfig;
use polydraw_core::models::LatLng;
use polydraw_core::ports::{Navigator, PolygonSubmitter};
use polydraw_core::ConfirmOutcome;
use serde::Serialize;
use std::fs;

#[derive(Debug, Serialize)]
struct ReplayOutput {
    events: usize,
    rejected: usize,
    alerts: Vec<String>,
    location: String,
    state: String,
    center: LatLng,
    zoom: u8,
}

pub async fn execute(
    args: ReplayArgs,
    config: &LayeredConfig,
    submitter: &dyn PolygonSubmitter,
    output: &OutputWriter,
) -> Result<()> {
    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read session file: {}", args.path.display()))?;
    let events = parse_session(&text)?;

    let mut page = Page::open(config);
    let mut rejected = 0;

    output.section("Replay");
    for (line_no, event) in &events {
        match apply(&mut page, event.clone(), submitter).await {
            Ok(Some(note)) => output.info(format!("line {}: {}", line_no, note)),
            Ok(None) => {}
            Err(err) if args.keep_going => {
                rejected += 1;
                output.warning(format!("line {}: {}", line_no, err));
            }
            Err(err) => return Err(err).with_context(|| format!("Line {} was rejected", line_no)),
        }
    }

    let alerts = page.notifier.alerts();
    let location = page.navigator.current_location();
    let state = format!("{:?}", page.widget.state());

    output.section("Page");
    output.kv("Location", &location);
    output.kv("Widget", &state);
    output.kv("View", format!("{}, {} @ z{}", page.widget.map().center().lat, page.widget.map().center().lng, page.widget.map().zoom()));
    for alert in &alerts {
        output.warning(format!("alert: {}", alert));
    }

    output.result(ReplayOutput {
        events: events.len(),
        rejected,
        alerts,
        location,
        state,
        center: page.widget.map().center(),
        zoom: page.widget.map().zoom(),
    })
}

/// Apply one event; returns a note worth showing
async fn apply(
    page: &mut Page,
    event: SessionEvent,
    submitter: &dyn PolygonSubmitter,
) -> Result<Option<String>> {
    match event {
        SessionEvent::Pan { lat, lng } => {
            page.widget.map_mut().pan_to(LatLng::new(lat, lng));
            Ok(None)
        }
        SessionEvent::Zoom { level } => {
            let applied = page.widget.map_mut().set_zoom(level);
            Ok((applied != level).then(|| format!("zoom {} clamped to {}", level, applied)))
        }
        SessionEvent::Clear => {
            page.widget.clear()?;
            Ok(None)
        }
        SessionEvent::Confirm => match page.widget.confirm(submitter).await? {
            ConfirmOutcome::NothingDrawn => Ok(Some("confirm with nothing drawn".to_string())),
            ConfirmOutcome::Navigated { location } => Ok(Some(format!("submitted, navigated to {}", location))),
            ConfirmOutcome::Failed(err) => Ok(Some(format!("submission failed: {}", err))),
        },
        draw => {
            if let Some(event) = draw.into_draw_event() {
                page.widget.handle_event(event)?;
            }
            Ok(None)
        }
    }
}
