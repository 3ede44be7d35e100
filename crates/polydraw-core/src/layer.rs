//! Drawing layer: the map overlay group that holds user-drawn shapes.

use crate::models::DrawnPolygon;

/// Identifier of an overlay inside a [`DrawingLayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Overlay container owned by the widget.
///
/// Ids are never reused, so a replaced overlay can be told apart from its
/// successor even when the geometry is identical.
#[derive(Debug, Default)]
pub struct DrawingLayer {
    overlays: Vec<(LayerId, DrawnPolygon)>,
    next_id: u64,
}

impl DrawingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, polygon: DrawnPolygon) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.overlays.push((id, polygon));
        id
    }

    /// Remove one overlay, returning it if it was present
    pub fn remove_layer(&mut self, id: LayerId) -> Option<DrawnPolygon> {
        let index = self.overlays.iter().position(|(existing, _)| *existing == id)?;
        Some(self.overlays.remove(index).1)
    }

    pub fn clear_layers(&mut self) {
        self.overlays.clear();
    }

    pub fn get(&self, id: LayerId) -> Option<&DrawnPolygon> {
        self.overlays.iter().find(|(existing, _)| *existing == id).map(|(_, p)| p)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut DrawnPolygon> {
        self.overlays.iter_mut().find(|(existing, _)| *existing == id).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.overlays.iter().map(|(id, _)| *id)
    }
}
