//! Image element type.

use serde::{Deserialize, Serialize};

use super::Bounded;
use crate::geometry::Rect;

/// An image placed on the page.
///
/// Only the placement matters for ordering; the image data itself stays with
/// the upstream parser and is referenced through `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    /// Bounding box where the image is placed
    pub bbox: Rect,
    /// Reference to the image data (file name, object id, ...)
    #[serde(default)]
    pub source: Option<String>,
    /// Alternative text for accessibility
    #[serde(default)]
    pub alt_text: Option<String>,
}

impl ImageElement {
    /// Create an image element at `bbox`.
    pub fn new(bbox: Rect) -> Self {
        Self {
            bbox,
            source: None,
            alt_text: None,
        }
    }

    /// Set the data reference.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set alternative text for accessibility.
    pub fn with_alt_text(mut self, text: impl Into<String>) -> Self {
        self.alt_text = Some(text.into());
        self
    }
}

impl Bounded for ImageElement {
    fn bbox(&self) -> Rect {
        self.bbox
    }

    fn translate_y(&mut self, dy: f32) {
        self.bbox = self.bbox.translate_y(dy);
    }
}
