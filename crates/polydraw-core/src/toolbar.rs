//! Drawing toolbar capability.
//!
//! The toolbar is supplied by an external geometry-editing component (for
//! example Leaflet.draw in a browser). The widget only needs to know which
//! tools it exposes and to receive the events it emits.

use serde::{Deserialize, Serialize};

use crate::models::{DrawnShape, LatLng, ShapeKind};

/// Per-shape draw tool switches, mirroring Leaflet.draw's `draw` options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOptions {
    pub polygon: bool,
    pub polyline: bool,
    pub rectangle: bool,
    pub circle: bool,
    pub marker: bool,
}

impl DrawOptions {
    /// Polygon creation only
    pub fn polygon_only() -> Self {
        Self {
            polygon: true,
            polyline: false,
            rectangle: false,
            circle: false,
            marker: false,
        }
    }

    pub fn allows(&self, kind: ShapeKind) -> bool {
        match kind {
            ShapeKind::Polygon => self.polygon,
            ShapeKind::Polyline => self.polyline,
            ShapeKind::Rectangle => self.rectangle,
            ShapeKind::Circle => self.circle,
            ShapeKind::Marker => self.marker,
        }
    }
}

/// Edit tool switches, mirroring Leaflet.draw's `edit` options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOptions {
    pub edit: bool,
    pub remove: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self { edit: true, remove: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarOptions {
    pub draw: DrawOptions,
    pub edit: EditOptions,
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        Self { draw: DrawOptions::polygon_only(), edit: EditOptions::default() }
    }
}

/// Tools a toolbar can put in front of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarCapability {
    Draw(ShapeKind),
    Edit,
    Remove,
}

/// Event emitted by a drawing toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// A shape was finished
    Created(DrawnShape),
    /// The edit tool reshaped the held polygon; new rings, unclosed
    Edited(Vec<Vec<LatLng>>),
    /// The remove tool deleted the held polygon
    Deleted,
}

/// A pluggable drawing/editing component
pub trait DrawingToolbar: Send + Sync {
    /// Name of the backing component, for diagnostics
    fn name(&self) -> &str;

    fn options(&self) -> &ToolbarOptions;

    fn allows(&self, kind: ShapeKind) -> bool {
        self.options().draw.allows(kind)
    }

    fn capabilities(&self) -> Vec<ToolbarCapability> {
        let options = self.options();
        let mut capabilities: Vec<ToolbarCapability> = ShapeKind::ALL
            .iter()
            .copied()
            .filter(|kind| options.draw.allows(*kind))
            .map(ToolbarCapability::Draw)
            .collect();
        if options.edit.edit {
            capabilities.push(ToolbarCapability::Edit);
        }
        if options.edit.remove {
            capabilities.push(ToolbarCapability::Remove);
        }
        capabilities
    }
}

/// Leaflet.draw-style toolbar bound to the widget's drawing layer
#[derive(Debug, Clone, Default)]
pub struct LeafletDrawToolbar {
    options: ToolbarOptions,
}

impl LeafletDrawToolbar {
    pub fn new(options: ToolbarOptions) -> Self {
        Self { options }
    }
}

impl DrawingToolbar for LeafletDrawToolbar {
    fn name(&self) -> &str {
        "leaflet-draw"
    }

    fn options(&self) -> &ToolbarOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toolbar_is_polygon_only() {
        let toolbar = LeafletDrawToolbar::default();

        assert!(toolbar.allows(ShapeKind::Polygon));
        for kind in [ShapeKind::Polyline, ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Marker]
        {
            assert!(!toolbar.allows(kind), "{} should be disabled", kind);
        }
        assert_eq!(
            toolbar.capabilities(),
            vec![
                ToolbarCapability::Draw(ShapeKind::Polygon),
                ToolbarCapability::Edit,
                ToolbarCapability::Remove,
            ]
        );
    }

    #[test]
    fn test_options_deserialize_leaflet_layout() {
        let json = r#"{
            "draw": {"polygon": true, "polyline": false, "rectangle": true, "circle": false, "marker": false},
            "edit": {"edit": true, "remove": false}
        }"#;
        let options: ToolbarOptions = serde_json::from_str(json).unwrap();
        let toolbar = LeafletDrawToolbar::new(options);

        assert!(toolbar.allows(ShapeKind::Rectangle));
        assert!(!toolbar.capabilities().contains(&ToolbarCapability::Remove));
    }
}
