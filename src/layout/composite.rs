//! Composite text blocks.
//!
//! A composite is one or more fragments merged into a single semantic block.
//! Its geometry and font statistics are always derived from its members.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::layout::fragment::TextFragment;
use crate::layout::heading_detector::SemanticType;

/// Identifier of a composite, unique within one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompositeId {
    /// Page that created the composite
    pub page: usize,
    /// Creation sequence number on that page
    pub seq: usize,
}

/// A block of text built from one or more fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composite {
    /// Identifier
    pub id: CompositeId,
    /// Member texts joined by single spaces
    pub text: String,
    /// Formatted variant of `text` (identical on creation)
    pub formatted_text: String,
    /// Minimal box enclosing all members
    pub bbox: Rect,
    /// Character-weighted mean font size of the members
    pub font_size: f32,
    /// Character-weighted dominant font family of the members
    pub font_family: Option<String>,
    /// Heading level or paragraph; paragraph until classified
    pub semantic_type: SemanticType,
    /// Whether more than one fragment was merged
    pub composed: bool,
    /// Members in reading order
    pub source_fragments: Vec<TextFragment>,
}

impl Composite {
    /// Build a composite from members that are already in reading order.
    ///
    /// # Panics
    ///
    /// Never; an empty member list yields an empty composite with a zero box.
    pub fn from_fragments(id: CompositeId, members: Vec<TextFragment>) -> Self {
        let text = members
            .iter()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let bbox = Rect::union_all(members.iter().map(|f| &f.bbox)).unwrap_or_default();
        let font_size = weighted_font_size(members.iter().map(|f| (f.char_count(), f.font_size)))
            .unwrap_or(0.0);
        let font_family = dominant_family(&members);

        Self {
            id,
            formatted_text: text.clone(),
            text,
            bbox,
            font_size,
            font_family,
            semantic_type: SemanticType::Paragraph,
            composed: members.len() > 1,
            source_fragments: members,
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Number of non-whitespace characters.
    pub fn char_count(&self) -> usize {
        self.source_fragments.iter().map(TextFragment::char_count).sum()
    }

    /// Check whether the composite was classified as a heading.
    pub fn is_heading(&self) -> bool {
        self.semantic_type.is_heading()
    }

    /// Collapse the composite back into a single fragment.
    pub fn to_fragment(&self) -> TextFragment {
        TextFragment {
            text: self.text.clone(),
            bbox: self.bbox,
            font_size: self.font_size,
            font_family: self.font_family.clone(),
        }
    }

    /// Shift the composite and all its members down by `dy`.
    pub fn translate_y(&mut self, dy: f32) {
        self.bbox = self.bbox.translate_y(dy);
        for fragment in &mut self.source_fragments {
            fragment.bbox = fragment.bbox.translate_y(dy);
        }
    }
}

/// Weighted mean of `(weight, size)` pairs.
///
/// Falls back to the plain mean when every weight is zero and returns `None`
/// for an empty input.
///
/// # Examples
///
/// ```
/// use page_flow::layout::composite::weighted_font_size;
///
/// let avg = weighted_font_size(vec![(30, 10.0), (10, 20.0)]).unwrap();
/// assert_eq!(avg, 12.5);
/// assert_eq!(weighted_font_size(vec![(0, 10.0), (0, 20.0)]), Some(15.0));
/// assert_eq!(weighted_font_size(Vec::new()), None);
/// ```
pub fn weighted_font_size<I>(items: I) -> Option<f32>
where
    I: IntoIterator<Item = (usize, f32)>,
{
    let mut weighted_sum = 0.0f64;
    let mut total_weight = 0usize;
    let mut plain_sum = 0.0f64;
    let mut count = 0usize;

    for (weight, size) in items {
        weighted_sum += weight as f64 * size as f64;
        total_weight += weight;
        plain_sum += size as f64;
        count += 1;
    }

    if count == 0 {
        None
    } else if total_weight == 0 {
        Some((plain_sum / count as f64) as f32)
    } else {
        Some((weighted_sum / total_weight as f64) as f32)
    }
}

/// Character-weighted average font size over a set of composites.
pub fn page_average_font_size(composites: &[Composite]) -> Option<f32> {
    weighted_font_size(composites.iter().map(|c| (c.char_count(), c.font_size)))
}

/// Family carrying the most characters; the first seen wins ties.
fn dominant_family(members: &[TextFragment]) -> Option<String> {
    let mut weights: IndexMap<&str, usize> = IndexMap::new();
    for f in members {
        if let Some(family) = f.font_family.as_deref() {
            *weights.entry(family).or_insert(0) += f.char_count().max(1);
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (family, weight) in weights {
        if best.map_or(true, |(_, w)| weight > w) {
            best = Some((family, weight));
        }
    }
    best.map(|(family, _)| family.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, y: f32, w: f32, size: f32) -> TextFragment {
        TextFragment::new(text, Rect::new(x, y, w, size), size)
    }

    fn id() -> CompositeId {
        CompositeId { page: 0, seq: 0 }
    }

    #[test]
    fn test_bbox_is_union_of_members() {
        let c = Composite::from_fragments(
            id(),
            vec![frag("Hello", 10.0, 10.0, 40.0, 12.0), frag("world", 60.0, 30.0, 40.0, 12.0)],
        );
        assert_eq!(c.bbox, Rect::from_points(10.0, 10.0, 100.0, 42.0));
        assert!(c.composed);
        assert_eq!(c.text, "Hello world");
        assert_eq!(c.formatted_text, c.text);
    }

    #[test]
    fn test_font_size_is_character_weighted() {
        // 9 chars at 10pt, 1 char at 20pt
        let c = Composite::from_fragments(
            id(),
            vec![frag("abcdefghi", 0.0, 0.0, 50.0, 10.0), frag("Z", 60.0, 0.0, 10.0, 20.0)],
        );
        assert!((c.font_size - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_singleton_is_not_composed() {
        let c = Composite::from_fragments(id(), vec![frag("alone", 0.0, 0.0, 30.0, 12.0)]);
        assert!(!c.composed);
        assert_eq!(c.word_count(), 1);
        assert_eq!(c.semantic_type, SemanticType::Paragraph);
    }

    #[test]
    fn test_dominant_family_by_characters() {
        let members = vec![
            frag("ab", 0.0, 0.0, 10.0, 12.0).with_family("Sans"),
            frag("longer text", 20.0, 0.0, 50.0, 12.0).with_family("Serif"),
            frag("cd", 80.0, 0.0, 10.0, 12.0).with_family("Sans"),
        ];
        let c = Composite::from_fragments(id(), members);
        assert_eq!(c.font_family.as_deref(), Some("Serif"));
    }

    #[test]
    fn test_dominant_family_tie_prefers_first() {
        let members = vec![
            frag("ab", 0.0, 0.0, 10.0, 12.0).with_family("Sans"),
            frag("cd", 20.0, 0.0, 10.0, 12.0).with_family("Serif"),
        ];
        let c = Composite::from_fragments(id(), members);
        assert_eq!(c.font_family.as_deref(), Some("Sans"));
    }

    #[test]
    fn test_translate_keeps_union_invariant() {
        let mut c = Composite::from_fragments(
            id(),
            vec![frag("a", 0.0, 0.0, 10.0, 12.0), frag("b", 0.0, 20.0, 10.0, 12.0)],
        );
        c.translate_y(500.0);
        let union = Rect::union_all(c.source_fragments.iter().map(|f| &f.bbox)).unwrap();
        assert_eq!(c.bbox, union);
        assert_eq!(c.bbox.top(), 500.0);
    }
}
