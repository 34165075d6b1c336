//! Heading detection using page-relative font statistics.
//!
//! This module classifies composites into heading levels (H1-H5) or paragraphs.
//! Thresholds are multiples of the page's character-weighted average font size,
//! recomputed over the merged composites of that page.

use serde::{Deserialize, Serialize};

use crate::config::{ClassifyConfig, DEFAULT_FONT_SIZE};
use crate::layout::composite::{page_average_font_size, Composite};

/// Heading level, H1 being the most prominent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Main title
    H1,
    /// Section heading
    H2,
    /// Subsection heading
    H3,
    /// Minor heading
    H4,
    /// Smallest heading, just above body size
    H5,
}

impl HeadingLevel {
    /// All levels from most to least prominent.
    pub const ALL: [HeadingLevel; 5] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
    ];

    /// Numeric level (1 = H1).
    ///
    /// # Examples
    ///
    /// ```
    /// use page_flow::layout::HeadingLevel;
    ///
    /// assert_eq!(HeadingLevel::H1.level(), 1);
    /// assert_eq!(HeadingLevel::H5.level(), 5);
    /// ```
    pub fn level(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
        }
    }
}

/// Semantic role of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// A heading of the given level
    Heading(HeadingLevel),
    /// Body text
    Paragraph,
}

impl SemanticType {
    /// Check if this is any heading level.
    pub fn is_heading(&self) -> bool {
        matches!(self, SemanticType::Heading(_))
    }

    /// Heading level, if this is a heading.
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            SemanticType::Heading(level) => Some(*level),
            SemanticType::Paragraph => None,
        }
    }
}

/// Font size cut-offs for the five heading levels on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingThresholds {
    /// Page average the thresholds were derived from
    pub page_average: f32,
    /// Minimum font size for H1..H5
    pub levels: [f32; 5],
}

impl HeadingThresholds {
    /// Derive thresholds from a page average and the configured multipliers.
    pub fn from_average(page_average: f32, multipliers: &[f32; 5]) -> Self {
        let mut levels = [0.0; 5];
        for (slot, m) in levels.iter_mut().zip(multipliers) {
            *slot = page_average * m;
        }
        Self {
            page_average,
            levels,
        }
    }
}

/// Classifies composites as headings or paragraphs.
#[derive(Debug, Clone, Default)]
pub struct TypeClassifier {
    config: ClassifyConfig,
}

impl TypeClassifier {
    /// Create a classifier with the given settings.
    pub fn new(config: ClassifyConfig) -> Self {
        Self { config }
    }

    /// Thresholds for a page with the given composites.
    pub fn thresholds_for(&self, composites: &[Composite]) -> HeadingThresholds {
        let average = page_average_font_size(composites).unwrap_or(DEFAULT_FONT_SIZE);
        HeadingThresholds::from_average(average, &self.config.heading_multipliers)
    }

    /// Classify a single block from its font size and word count.
    ///
    /// Only blocks larger than the page average and shorter than the word
    /// cut-off can be headings; they get the most prominent level whose
    /// threshold they reach, or H5 when they reach none.
    pub fn classify_one(
        &self,
        font_size: f32,
        word_count: usize,
        thresholds: &HeadingThresholds,
    ) -> SemanticType {
        if font_size <= thresholds.page_average || word_count >= self.config.max_heading_words {
            return SemanticType::Paragraph;
        }

        let level = HeadingLevel::ALL
            .iter()
            .zip(thresholds.levels.iter())
            .find(|(_, &min)| font_size >= min)
            .map(|(level, _)| *level)
            .unwrap_or(HeadingLevel::H5);
        SemanticType::Heading(level)
    }

    /// Annotate every composite of a page with its semantic type.
    ///
    /// Returns the thresholds that were used.
    pub fn classify(&self, composites: &mut [Composite]) -> HeadingThresholds {
        let thresholds = self.thresholds_for(composites);
        for composite in composites.iter_mut() {
            composite.semantic_type =
                self.classify_one(composite.font_size, composite.word_count(), &thresholds);
        }

        log::debug!(
            "classified {} composites (page average {:.2}pt, {} headings)",
            composites.len(),
            thresholds.page_average,
            composites.iter().filter(|c| c.is_heading()).count()
        );
        thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::layout::{CompositeId, TextFragment};

    fn composite(text: &str, size: f32, seq: usize) -> Composite {
        let frag = TextFragment::new(text, Rect::new(0.0, seq as f32 * 40.0, 100.0, size), size);
        Composite::from_fragments(CompositeId { page: 0, seq }, vec![frag])
    }

    fn thresholds(avg: f32) -> HeadingThresholds {
        HeadingThresholds::from_average(avg, &ClassifyConfig::default().heading_multipliers)
    }

    #[test]
    fn test_levels_by_multiple() {
        let classifier = TypeClassifier::default();
        let t = thresholds(10.0);
        assert_eq!(classifier.classify_one(22.0, 3, &t), SemanticType::Heading(HeadingLevel::H1));
        assert_eq!(classifier.classify_one(21.0, 3, &t), SemanticType::Heading(HeadingLevel::H1));
        assert_eq!(classifier.classify_one(18.0, 3, &t), SemanticType::Heading(HeadingLevel::H2));
        assert_eq!(classifier.classify_one(15.5, 3, &t), SemanticType::Heading(HeadingLevel::H3));
        assert_eq!(classifier.classify_one(13.0, 3, &t), SemanticType::Heading(HeadingLevel::H4));
        assert_eq!(classifier.classify_one(11.5, 3, &t), SemanticType::Heading(HeadingLevel::H5));
    }

    #[test]
    fn test_slightly_above_average_falls_back_to_h5() {
        let classifier = TypeClassifier::default();
        let t = thresholds(10.0);
        assert_eq!(classifier.classify_one(10.5, 2, &t), SemanticType::Heading(HeadingLevel::H5));
    }

    #[test]
    fn test_average_or_smaller_is_paragraph() {
        let classifier = TypeClassifier::default();
        let t = thresholds(10.0);
        assert_eq!(classifier.classify_one(10.0, 2, &t), SemanticType::Paragraph);
        assert_eq!(classifier.classify_one(8.0, 2, &t), SemanticType::Paragraph);
    }

    #[test]
    fn test_long_large_block_is_paragraph() {
        let classifier = TypeClassifier::default();
        let t = thresholds(10.0);
        assert_eq!(classifier.classify_one(22.0, 4, &t), SemanticType::Heading(HeadingLevel::H1));
        assert_eq!(classifier.classify_one(22.0, 30, &t), SemanticType::Paragraph);
        assert_eq!(classifier.classify_one(22.0, 15, &t), SemanticType::Paragraph);
        assert_eq!(classifier.classify_one(22.0, 14, &t), SemanticType::Heading(HeadingLevel::H1));
    }

    #[test]
    fn test_classify_page() {
        let body = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor \
                    incididunt ut labore et dolore magna aliqua ut enim ad minim veniam quis";
        let mut composites = vec![
            composite("Big Title", 30.0, 0),
            composite(body, 10.0, 1),
            composite(body, 10.0, 2),
            composite(body, 10.0, 3),
        ];
        let classifier = TypeClassifier::default();
        let t = classifier.classify(&mut composites);

        assert!(t.page_average > 10.0 && t.page_average < 11.0);
        assert_eq!(composites[0].semantic_type, SemanticType::Heading(HeadingLevel::H1));
        for c in &composites[1..] {
            assert_eq!(c.semantic_type, SemanticType::Paragraph);
        }
    }

    #[test]
    fn test_empty_page_uses_default_average() {
        let classifier = TypeClassifier::default();
        let t = classifier.thresholds_for(&[]);
        assert_eq!(t.page_average, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_semantic_type_helpers() {
        assert!(SemanticType::Heading(HeadingLevel::H2).is_heading());
        assert!(!SemanticType::Paragraph.is_heading());
        assert_eq!(SemanticType::Heading(HeadingLevel::H3).heading_level(), Some(HeadingLevel::H3));
        assert_eq!(SemanticType::Paragraph.heading_level(), None);
    }
}
