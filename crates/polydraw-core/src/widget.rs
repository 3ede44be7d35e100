//! The polygon drawing widget.
//!
//! One `PolygonWidget` is built per page. It owns the map view, the base tile
//! layer and the drawing layer, and holds at most one drawn polygon. All
//! handlers take `&mut self` and run to completion; the only suspension point
//! is the submission round-trip, which happens between
//! [`PolygonWidget::begin_submission`] and [`PolygonWidget::finish_submission`].

use std::sync::Arc;

use crate::error::{PolydrawError, Result, SubmitError};
use crate::layer::{DrawingLayer, LayerId};
use crate::models::{
    DrawnPolygon, DrawnShape, LatLng, MapView, TileLayer, DEFAULT_COORDINATE_PRECISION,
};
use crate::ports::{Navigator, Notifier, PolygonPayload, PolygonSubmitter, Submission};
use crate::toolbar::{DrawEvent, DrawingToolbar, LeafletDrawToolbar};

/// Alert shown when confirm is pressed with nothing drawn
pub const NO_POLYGON_ALERT: &str = "Please draw a polygon first!";

/// Static settings of a widget instance
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub view: MapView,
    pub tiles: TileLayer,
    pub submit_path: String,
    pub result_path: String,
    /// Decimals kept per exported ordinate; `None` keeps full precision
    pub coordinate_precision: Option<u32>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            view: MapView::default(),
            tiles: TileLayer::default(),
            submit_path: crate::config::DEFAULT_SUBMIT_PATH.to_string(),
            result_path: crate::config::DEFAULT_RESULT_PATH.to_string(),
            coordinate_precision: Some(DEFAULT_COORDINATE_PRECISION),
        }
    }
}

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Empty,
    Drawn,
    Submitting,
    /// The page navigated to the result view; the widget is done
    Submitted,
}

/// What a confirm led to
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// Nothing was drawn; the user was alerted and no request was made
    NothingDrawn,
    /// The backend accepted the polygon and the page moved on
    Navigated { location: String },
    /// The request failed; the user was alerted and may retry
    Failed(SubmitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Submitting,
    Submitted,
}

pub struct PolygonWidget {
    map: MapView,
    tiles: TileLayer,
    layer: DrawingLayer,
    toolbar: Box<dyn DrawingToolbar>,
    drawn: Option<LayerId>,
    phase: Phase,
    submit_path: String,
    result_path: String,
    precision: Option<u32>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl PolygonWidget {
    /// Build a widget with a polygon-only Leaflet.draw toolbar
    pub fn new(
        config: WidgetConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        tracing::debug!(
            center_lat = config.view.center().lat,
            center_lng = config.view.center().lng,
            zoom = config.view.zoom(),
            "Initializing polygon widget"
        );

        Self {
            map: config.view,
            tiles: config.tiles,
            layer: DrawingLayer::new(),
            toolbar: Box::new(LeafletDrawToolbar::default()),
            drawn: None,
            phase: Phase::Idle,
            submit_path: config.submit_path,
            result_path: config.result_path,
            precision: config.coordinate_precision,
            notifier,
            navigator,
        }
    }

    /// Replace the drawing toolbar
    pub fn with_toolbar(mut self, toolbar: Box<dyn DrawingToolbar>) -> Self {
        self.toolbar = toolbar;
        self
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapView {
        &mut self.map
    }

    pub fn tiles(&self) -> &TileLayer {
        &self.tiles
    }

    pub fn toolbar(&self) -> &dyn DrawingToolbar {
        self.toolbar.as_ref()
    }

    pub fn layer(&self) -> &DrawingLayer {
        &self.layer
    }

    /// The polygon currently held, if any
    pub fn drawn_polygon(&self) -> Option<&DrawnPolygon> {
        self.drawn.and_then(|id| self.layer.get(id))
    }

    pub fn drawn_layer_id(&self) -> Option<LayerId> {
        self.drawn
    }

    pub fn state(&self) -> WidgetState {
        match self.phase {
            Phase::Submitted => WidgetState::Submitted,
            Phase::Submitting => WidgetState::Submitting,
            Phase::Idle if self.drawn.is_some() => WidgetState::Drawn,
            Phase::Idle => WidgetState::Empty,
        }
    }

    /// Dispatch one toolbar event
    pub fn handle_event(&mut self, event: DrawEvent) -> Result<()> {
        match event {
            DrawEvent::Created(shape) => self.on_created(shape).map(|_| ()),
            DrawEvent::Edited(rings) => self.on_edited(rings).map(|_| ()),
            DrawEvent::Deleted => self.on_deleted().map(|_| ()),
        }
    }

    /// A shape was finished on the toolbar.
    ///
    /// Any previously held polygon is discarded so the layer shows exactly
    /// the new one. The geometry is taken as drawn; only non-finite
    /// coordinates are refused.
    pub fn on_created(&mut self, shape: DrawnShape) -> Result<LayerId> {
        self.ensure_open()?;

        let kind = shape.kind();
        if !self.toolbar.allows(kind) {
            return Err(PolydrawError::ShapeNotAllowed { kind });
        }

        let rings = match shape {
            DrawnShape::Polygon { rings } => rings,
            DrawnShape::Rectangle { south_west, north_east } => {
                vec![rectangle_ring(south_west, north_east)]
            }
            _ => return Err(PolydrawError::ShapeNotAllowed { kind }),
        };
        let polygon = DrawnPolygon::new(rings)?;

        if self.drawn.is_some() {
            self.layer.clear_layers();
        }
        let id = self.layer.add_layer(polygon);
        self.drawn = Some(id);

        tracing::debug!(layer = id.0, kind = %kind, "Polygon drawn");
        Ok(id)
    }

    /// The edit tool reshaped the held polygon. Returns `false` when there
    /// was nothing to edit.
    pub fn on_edited(&mut self, rings: Vec<Vec<LatLng>>) -> Result<bool> {
        self.ensure_open()?;

        if !self.toolbar.options().edit.edit {
            tracing::warn!(toolbar = self.toolbar.name(), "Edit event from a toolbar without an edit tool");
            return Ok(false);
        }

        let Some(id) = self.drawn else {
            return Ok(false);
        };
        let polygon = DrawnPolygon::new(rings)?;

        match self.layer.get_mut(id) {
            Some(held) => {
                *held = polygon;
                tracing::debug!(layer = id.0, "Polygon edited");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The remove tool deleted the held polygon. Returns whether one was held.
    pub fn on_deleted(&mut self) -> Result<bool> {
        self.ensure_open()?;

        if !self.toolbar.options().edit.remove {
            tracing::warn!(toolbar = self.toolbar.name(), "Delete event from a toolbar without a remove tool");
            return Ok(false);
        }

        match self.drawn.take() {
            Some(id) => {
                self.layer.remove_layer(id);
                tracing::debug!(layer = id.0, "Polygon removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clear trigger: empty the drawing layer and forget the held polygon
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_open()?;

        self.layer.clear_layers();
        self.drawn = None;
        Ok(())
    }

    /// First half of confirm.
    ///
    /// With nothing drawn the user is alerted and `None` is returned. With a
    /// polygon held, the widget enters `Submitting` and hands back the POST to
    /// perform; it must be completed with [`Self::finish_submission`].
    pub fn begin_submission(&mut self) -> Result<Option<Submission>> {
        self.ensure_open()?;
        if self.phase == Phase::Submitting {
            return Err(PolydrawError::SubmissionInFlight);
        }

        let Some(polygon) = self.drawn_polygon() else {
            self.notifier.alert(NO_POLYGON_ALERT);
            return Ok(None);
        };

        let polygon_coords = polygon.to_geojson_coords(self.precision);
        let coordinates = serde_json::to_string(&polygon_coords)
            .map_err(|e| PolydrawError::Serialization(e.to_string()))?;
        tracing::info!(coordinates = %coordinates, "Polygon Coordinates");

        self.phase = Phase::Submitting;
        Ok(Some(Submission {
            path: self.submit_path.clone(),
            payload: PolygonPayload { polygon_coords },
        }))
    }

    /// Second half of confirm: act on the backend's answer.
    ///
    /// Success navigates to the result view and closes the widget. Failure
    /// alerts the user and returns the widget to its pre-confirm state.
    pub fn finish_submission(
        &mut self,
        outcome: std::result::Result<serde_json::Value, SubmitError>,
    ) -> Result<ConfirmOutcome> {
        if self.phase != Phase::Submitting {
            return Err(PolydrawError::NoSubmissionPending);
        }

        match outcome {
            Ok(_) => {
                self.navigator.navigate(&self.result_path);
                self.phase = Phase::Submitted;
                tracing::info!(location = %self.result_path, "Polygon submitted");
                Ok(ConfirmOutcome::Navigated { location: self.result_path.clone() })
            }
            Err(err) => {
                self.phase = Phase::Idle;
                tracing::warn!(error = %err, "Polygon submission failed");
                self.notifier.alert(&format!("Failed to submit polygon: {}", err));
                Ok(ConfirmOutcome::Failed(err))
            }
        }
    }

    /// Confirm trigger: submit the held polygon and act on the answer
    pub async fn confirm(&mut self, submitter: &dyn PolygonSubmitter) -> Result<ConfirmOutcome> {
        let Some(submission) = self.begin_submission()? else {
            return Ok(ConfirmOutcome::NothingDrawn);
        };

        let response = submitter.submit(&submission).await;
        self.finish_submission(response)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.phase == Phase::Submitted {
            return Err(PolydrawError::Closed { location: self.navigator.current_location() });
        }
        Ok(())
    }
}

/// Rectangle corners in drawing order, starting at the south-west corner
fn rectangle_ring(south_west: LatLng, north_east: LatLng) -> Vec<LatLng> {
    vec![
        south_west,
        LatLng::new(north_east.lat, south_west.lng),
        north_east,
        LatLng::new(south_west.lat, north_east.lng),
    ]
}

impl std::fmt::Debug for PolygonWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonWidget")
            .field("map", &self.map)
            .field("toolbar", &self.toolbar.name())
            .field("drawn", &self.drawn)
            .field("layers", &self.layer.len())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{DryRunSubmitter, RecordingNavigator, RecordingNotifier};
    use crate::models::ShapeKind;
    use crate::toolbar::{DrawOptions, EditOptions, ToolbarOptions};

    fn widget() -> (PolygonWidget, RecordingNotifier, RecordingNavigator) {
        let notifier = RecordingNotifier::new();
        let navigator = RecordingNavigator::starting_at("/draw_polygon");
        let widget = PolygonWidget::new(
            WidgetConfig::default(),
            Arc::new(notifier.clone()),
            Arc::new(navigator.clone()),
        );
        (widget, notifier, navigator)
    }

    fn square(origin: f64) -> DrawnShape {
        DrawnShape::polygon(vec![
            LatLng::new(origin, origin),
            LatLng::new(origin + 1.0, origin),
            LatLng::new(origin + 1.0, origin + 1.0),
            LatLng::new(origin, origin + 1.0),
        ])
    }

    #[test]
    fn test_initial_state() {
        let (widget, _, _) = widget();
        assert_eq!(widget.state(), WidgetState::Empty);
        assert!(widget.layer().is_empty());
        assert_eq!(widget.map().zoom(), 6);
        assert_eq!(widget.toolbar().name(), "leaflet-draw");
    }

    #[test]
    fn test_redraw_replaces_previous_polygon() {
        let (mut widget, _, _) = widget();
        let first = widget.on_created(square(0.0)).unwrap();
        let second = widget.on_created(square(5.0)).unwrap();

        assert_ne!(first, second);
        assert_eq!(widget.layer().len(), 1);
        assert_eq!(widget.drawn_layer_id(), Some(second));
        assert_eq!(widget.drawn_polygon().unwrap().exterior()[0], LatLng::new(5.0, 5.0));
    }

    #[test]
    fn test_disabled_shape_is_rejected() {
        let (mut widget, _, _) = widget();
        let err = widget
            .on_created(DrawnShape::Marker { position: LatLng::new(1.0, 1.0) })
            .unwrap_err();

        assert!(matches!(err, PolydrawError::ShapeNotAllowed { kind: ShapeKind::Marker }));
        assert_eq!(widget.state(), WidgetState::Empty);
    }

    #[test]
    fn test_rectangle_is_held_as_polygon_when_enabled() {
        let (widget, _, _) = widget();
        let options = ToolbarOptions {
            draw: DrawOptions { rectangle: true, ..DrawOptions::polygon_only() },
            edit: EditOptions::default(),
        };
        let mut widget = widget.with_toolbar(Box::new(LeafletDrawToolbar::new(options)));

        widget
            .on_created(DrawnShape::Rectangle {
                south_west: LatLng::new(0.0, 0.0),
                north_east: LatLng::new(1.0, 2.0),
            })
            .unwrap();

        let coords = widget.drawn_polygon().unwrap().to_geojson_coords(Some(6));
        assert_eq!(coords[0].len(), 5);
        assert_eq!(coords[0][2], vec![2.0, 1.0]);
    }

    #[test]
    fn test_degenerate_drawing_replaces_previous() {
        let (mut widget, _, _) = widget();
        widget.on_created(square(0.0)).unwrap();

        let collinear = DrawnShape::polygon(vec![
            LatLng::new(10.0, 10.0),
            LatLng::new(11.0, 11.0),
            LatLng::new(12.0, 12.0),
        ]);
        widget.on_created(collinear).unwrap();

        assert_eq!(widget.layer().len(), 1);
        let submission = widget.begin_submission().unwrap().unwrap();
        assert_eq!(
            submission.payload.polygon_coords,
            vec![vec![
                vec![10.0, 10.0],
                vec![11.0, 11.0],
                vec![12.0, 12.0],
                vec![10.0, 10.0],
            ]]
        );
    }

    #[test]
    fn test_non_finite_drawing_keeps_previous() {
        let (mut widget, _, _) = widget();
        widget.on_created(square(0.0)).unwrap();

        let broken = DrawnShape::polygon(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(f64::NAN, 1.0),
            LatLng::new(1.0, 1.0),
        ]);
        assert!(matches!(widget.on_created(broken), Err(PolydrawError::InvalidPolygon { .. })));
        assert_eq!(widget.drawn_polygon().unwrap().exterior()[0], LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (mut widget, _, _) = widget();
        widget.clear().unwrap();
        assert_eq!(widget.state(), WidgetState::Empty);

        widget.on_created(square(0.0)).unwrap();
        widget.clear().unwrap();
        assert_eq!(widget.state(), WidgetState::Empty);
        assert!(widget.layer().is_empty());
        assert!(widget.drawn_polygon().is_none());
    }

    #[test]
    fn test_edit_replaces_rings() {
        let (mut widget, _, _) = widget();
        assert!(!widget.on_edited(vec![vec![LatLng::new(0.0, 0.0)]]).unwrap());

        let id = widget.on_created(square(0.0)).unwrap();
        let edited = widget
            .on_edited(vec![vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(3.0, 0.0),
                LatLng::new(0.0, 3.0),
            ]])
            .unwrap();

        assert!(edited);
        assert_eq!(widget.drawn_layer_id(), Some(id));
        assert_eq!(widget.drawn_polygon().unwrap().vertex_count(), 3);
    }

    #[test]
    fn test_delete_forgets_polygon() {
        let (mut widget, notifier, _) = widget();
        widget.on_created(square(0.0)).unwrap();

        assert!(widget.on_deleted().unwrap());
        assert!(!widget.on_deleted().unwrap());
        assert_eq!(widget.begin_submission().unwrap(), None);
        assert_eq!(notifier.last_alert().as_deref(), Some(NO_POLYGON_ALERT));
    }

    #[test]
    fn test_delete_ignored_without_remove_tool() {
        let (widget, _, _) = widget();
        let options = ToolbarOptions {
            draw: DrawOptions::polygon_only(),
            edit: EditOptions { edit: true, remove: false },
        };
        let mut widget = widget.with_toolbar(Box::new(LeafletDrawToolbar::new(options)));
        widget.on_created(square(0.0)).unwrap();

        widget.handle_event(DrawEvent::Deleted).unwrap();
        assert!(!widget.on_deleted().unwrap());
        assert_eq!(widget.state(), WidgetState::Drawn);
        assert_eq!(widget.layer().len(), 1);
    }

    #[test]
    fn test_edit_ignored_without_edit_tool() {
        let (widget, _, _) = widget();
        let options = ToolbarOptions {
            draw: DrawOptions::polygon_only(),
            edit: EditOptions { edit: false, remove: true },
        };
        let mut widget = widget.with_toolbar(Box::new(LeafletDrawToolbar::new(options)));
        widget.on_created(square(0.0)).unwrap();

        let moved = vec![vec![LatLng::new(5.0, 5.0), LatLng::new(6.0, 5.0), LatLng::new(5.0, 6.0)]];
        assert!(!widget.on_edited(moved).unwrap());
        assert_eq!(widget.drawn_polygon().unwrap().vertex_count(), 4);

        assert!(widget.on_deleted().unwrap());
        assert_eq!(widget.state(), WidgetState::Empty);
    }

    #[test]
    fn test_confirm_without_polygon_alerts() {
        let (mut widget, notifier, navigator) = widget();

        assert_eq!(widget.begin_submission().unwrap(), None);
        assert_eq!(notifier.alerts(), vec![NO_POLYGON_ALERT]);
        assert_eq!(navigator.current_location(), "/draw_polygon");
        assert_eq!(widget.state(), WidgetState::Empty);
    }

    #[test]
    fn test_second_confirm_while_in_flight_is_rejected() {
        let (mut widget, _, _) = widget();
        widget.on_created(square(0.0)).unwrap();

        let submission = widget.begin_submission().unwrap().unwrap();
        assert_eq!(submission.path, "/draw_polygon");
        assert_eq!(widget.state(), WidgetState::Submitting);
        assert!(matches!(widget.begin_submission(), Err(PolydrawError::SubmissionInFlight)));
    }

    #[test]
    fn test_redraw_during_flight_does_not_touch_payload() {
        let (mut widget, _, _) = widget();
        widget.on_created(square(0.0)).unwrap();
        let submission = widget.begin_submission().unwrap().unwrap();

        widget.on_created(square(7.0)).unwrap();
        assert_eq!(submission.payload.polygon_coords[0][0], vec![0.0, 0.0]);
        assert_eq!(widget.state(), WidgetState::Submitting);
    }

    #[test]
    fn test_finish_without_pending_submission() {
        let (mut widget, _, _) = widget();
        let err = widget.finish_submission(Ok(serde_json::json!({}))).unwrap_err();
        assert!(matches!(err, PolydrawError::NoSubmissionPending));
    }

    #[test]
    fn test_failure_alerts_and_allows_retry() {
        let (mut widget, notifier, navigator) = widget();
        widget.on_created(square(0.0)).unwrap();
        widget.begin_submission().unwrap();

        let outcome = widget
            .finish_submission(Err(SubmitError::Status { status: 500, body: "boom".to_string() }))
            .unwrap();

        assert!(matches!(outcome, ConfirmOutcome::Failed(SubmitError::Status { status: 500, .. })));
        assert_eq!(widget.state(), WidgetState::Drawn);
        assert_eq!(navigator.current_location(), "/draw_polygon");
        assert!(notifier.last_alert().unwrap().starts_with("Failed to submit polygon:"));
        assert!(widget.begin_submission().unwrap().is_some());
    }

    #[test]
    fn test_success_navigates_and_closes() {
        let (mut widget, _, navigator) = widget();
        widget.on_created(square(0.0)).unwrap();
        widget.begin_submission().unwrap();

        let outcome = widget.finish_submission(Ok(serde_json::json!({"message": "ok"}))).unwrap();

        assert_eq!(outcome, ConfirmOutcome::Navigated { location: "/result".to_string() });
        assert_eq!(navigator.current_location(), "/result");
        assert_eq!(widget.state(), WidgetState::Submitted);
        assert!(matches!(widget.clear(), Err(PolydrawError::Closed { .. })));
        assert!(matches!(widget.on_created(square(1.0)), Err(PolydrawError::Closed { .. })));
    }

    #[tokio::test]
    async fn test_confirm_round_trip() {
        let (mut widget, _, navigator) = widget();
        let submitter = DryRunSubmitter::new();

        assert_eq!(widget.confirm(&submitter).await.unwrap(), ConfirmOutcome::NothingDrawn);
        assert!(submitter.submissions().is_empty());

        widget.on_created(square(0.0)).unwrap();
        let outcome = widget.confirm(&submitter).await.unwrap();

        assert_eq!(outcome, ConfirmOutcome::Navigated { location: "/result".to_string() });
        assert_eq!(submitter.submissions().len(), 1);
        assert_eq!(navigator.history(), vec!["/draw_polygon", "/result"]);
    }
}
