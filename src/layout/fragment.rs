//! Text fragments and their ingestion.
//!
//! Upstream parsers hand over loosely-populated [`RawFragment`] records. They
//! are normalized exactly once into [`TextFragment`]s, after which every stage
//! can rely on finite geometry, a positive font size and non-empty text.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_FONT_SIZE;
use crate::error::Error;
use crate::geometry::Rect;
use crate::pipeline::PageContext;

/// Bounding box as reported by the upstream parser; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBox {
    /// Top edge
    pub top: Option<f32>,
    /// Left edge
    pub left: Option<f32>,
    /// Width
    pub width: Option<f32>,
    /// Height
    pub height: Option<f32>,
}

/// A positioned text record straight from the upstream parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFragment {
    /// Text content
    pub text: Option<String>,
    /// Position on the page
    pub bounding_box: Option<RawBox>,
    /// Font size in points
    pub font_size: Option<f32>,
    /// Font family name
    pub font_family: Option<String>,
}

impl RawFragment {
    /// Convenience constructor for a fully-populated record.
    pub fn new(text: &str, left: f32, top: f32, width: f32, height: f32, font_size: f32) -> Self {
        Self {
            text: Some(text.to_string()),
            bounding_box: Some(RawBox {
                top: Some(top),
                left: Some(left),
                width: Some(width),
                height: Some(height),
            }),
            font_size: Some(font_size),
            font_family: None,
        }
    }

    /// Set the font family.
    pub fn with_family(mut self, family: &str) -> Self {
        self.font_family = Some(family.to_string());
        self
    }
}

/// A normalized, fully-populated text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFragment {
    /// Text content
    pub text: String,
    /// Position on the page
    pub bbox: Rect,
    /// Font size in points (always positive)
    pub font_size: f32,
    /// Font family, if known
    pub font_family: Option<String>,
}

impl TextFragment {
    /// Create a fragment from already-valid values.
    pub fn new(text: impl Into<String>, bbox: Rect, font_size: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
            font_family: None,
        }
    }

    /// Set the font family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Number of non-whitespace characters, used as the weight in font statistics.
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Normalize an upstream record.
    ///
    /// Returns `None` for whitespace-only text. Missing or invalid geometry
    /// becomes zero, a missing or invalid font size becomes 12, and each such
    /// repair is recorded in `ctx` as a [`Error::MalformedFragment`].
    pub fn normalize(raw: RawFragment, index: usize, ctx: &mut PageContext) -> Option<Self> {
        let text = raw.text.unwrap_or_default();
        if text.trim().is_empty() {
            log::trace!("page {}: skipping blank fragment {}", ctx.page_index(), index);
            return None;
        }

        let mut problems: Vec<&'static str> = Vec::new();

        let bbox = match raw.bounding_box {
            Some(b) => {
                let left = coordinate(b.left, "left", &mut problems);
                let top = coordinate(b.top, "top", &mut problems);
                let width = extent(b.width, "width", &mut problems);
                let height = extent(b.height, "height", &mut problems);
                Rect::new(left, top, width, height)
            },
            None => {
                problems.push("missing bounding box");
                Rect::zero()
            },
        };

        let font_size = match raw.font_size {
            Some(size) if size.is_finite() && size > 0.0 => size,
            Some(_) => {
                problems.push("invalid font size");
                DEFAULT_FONT_SIZE
            },
            None => {
                problems.push("missing font size");
                DEFAULT_FONT_SIZE
            },
        };

        let font_family = raw
            .font_family
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        if !problems.is_empty() {
            ctx.record(Error::MalformedFragment {
                page: ctx.page_index(),
                index,
                reason: problems.join(", "),
            });
        }

        Some(Self {
            text,
            bbox,
            font_size,
            font_family,
        })
    }
}

fn coordinate(value: Option<f32>, name: &'static str, problems: &mut Vec<&'static str>) -> f32 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => {
            problems.push(name);
            0.0
        },
    }
}

fn extent(value: Option<f32>, name: &'static str, problems: &mut Vec<&'static str>) -> f32 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            problems.push(name);
            0.0
        },
    }
}

/// Normalize every record of a page, dropping blank ones.
pub fn ingest_fragments(raw: Vec<RawFragment>, ctx: &mut PageContext) -> Vec<TextFragment> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, r)| TextFragment::normalize(r, i, ctx))
        .collect()
}
