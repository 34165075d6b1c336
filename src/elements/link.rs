//! Link element type.

use serde::{Deserialize, Serialize};

use super::Bounded;
use crate::geometry::Rect;

/// A clickable link area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkElement {
    /// Active area of the link
    pub bbox: Rect,
    /// Link target
    pub uri: String,
}

impl LinkElement {
    /// Create a link element.
    pub fn new(bbox: Rect, uri: impl Into<String>) -> Self {
        Self {
            bbox,
            uri: uri.into(),
        }
    }
}

impl Bounded for LinkElement {
    fn bbox(&self) -> Rect {
        self.bbox
    }

    fn translate_y(&mut self, dy: f32) {
        self.bbox = self.bbox.translate_y(dy);
    }
}
