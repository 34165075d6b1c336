//! Per-page statistics for continuity analysis.
//!
//! A profile is computed once per page and captures everything the pairwise
//! evaluation needs, so comparing two pages never walks their elements again.

use indexmap::IndexMap;
use serde::Serialize;

use super::signals::is_title_like;
use crate::config::{ContinuityConfig, DEFAULT_FONT_SIZE};
use crate::elements::PageElement;
use crate::error::{Error, Result};
use crate::layout::composite::weighted_font_size;
use crate::layout::{Composite, SemanticType};
use crate::pipeline::Page;

/// Coarse content category of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentCategory {
    /// Cover or title page
    Cover,
    /// Sparse page with little running text
    ShortForm,
    /// Page dominated by paragraphs
    LongForm,
    /// Headings, sidebars and paragraphs in similar measure
    Mixed,
}

/// Structural and typographic statistics of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageProfile {
    /// Page index
    pub index: usize,
    /// Number of text composites
    pub composite_count: usize,
    /// Number of heading composites
    pub heading_count: usize,
    /// Number of paragraph composites
    pub paragraph_count: usize,
    /// Headings / composites (0 when there are none)
    pub heading_ratio: f32,
    /// Paragraphs / composites (0 when there are none)
    pub paragraph_density: f32,
    /// Characters of text on the page
    pub text_length: usize,
    /// Character-weighted average font size
    pub average_font_size: f32,
    /// Largest composite font size
    pub max_font_size: f32,
    /// Family carrying the most characters
    pub dominant_family: Option<String>,
    /// Shares of text, image and link elements
    pub element_distribution: [f32; 3],
    /// First paragraph text (first composite when there is no paragraph)
    pub first_paragraph: Option<String>,
    /// Last paragraph text (last composite when there is no paragraph)
    pub last_paragraph: Option<String>,
    /// Whether the page opens with a new-section title
    pub opens_new_section: bool,
    /// Whether the page is a cover page
    pub is_cover: bool,
    /// Coarse content category
    pub category: ContentCategory,
}

impl PageProfile {
    /// Compute the profile of a page.
    ///
    /// Fails when the page carries non-finite geometry or font statistics.
    pub fn analyze(page: &Page, config: &ContinuityConfig) -> Result<Self> {
        if !page.width.is_finite() || !page.height.is_finite() || page.height < 0.0 {
            return Err(Error::ContinuityHeuristic {
                page: page.index,
                reason: format!("unusable page size {}x{}", page.width, page.height),
            });
        }

        let composites: Vec<&Composite> = page.composites().collect();
        if let Some(bad) = composites.iter().find(|c| !c.font_size.is_finite()) {
            return Err(Error::ContinuityHeuristic {
                page: page.index,
                reason: format!("non-finite font size on composite {:?}", bad.id),
            });
        }

        let composite_count = composites.len();
        let heading_count = composites.iter().filter(|c| c.is_heading()).count();
        let paragraph_count = composite_count - heading_count;
        let (heading_ratio, paragraph_density) = if composite_count == 0 {
            (0.0, 0.0)
        } else {
            (
                heading_count as f32 / composite_count as f32,
                paragraph_count as f32 / composite_count as f32,
            )
        };

        let text_length: usize = composites.iter().map(|c| c.text.chars().count()).sum();
        let average_font_size =
            weighted_font_size(composites.iter().map(|c| (c.char_count(), c.font_size)))
                .unwrap_or(DEFAULT_FONT_SIZE);
        let max_font_size = composites.iter().map(|c| c.font_size).fold(0.0f32, f32::max);

        let first_paragraph = composites
            .iter()
            .find(|c| c.semantic_type == SemanticType::Paragraph)
            .or_else(|| composites.first())
            .map(|c| c.text.clone());
        let last_paragraph = composites
            .iter()
            .rev()
            .find(|c| c.semantic_type == SemanticType::Paragraph)
            .or_else(|| composites.last())
            .map(|c| c.text.clone());

        let opens_new_section = composites.iter().take(config.section_lookahead).any(|c| {
            c.font_size > average_font_size * config.section_font_ratio
                && c.text.chars().count() < config.section_max_chars
                && is_title_like(&c.text, config.section_max_words)
        });

        let is_cover = (heading_ratio > config.cover_heading_ratio
            && text_length < config.cover_max_chars)
            || (composite_count > 0
                && max_font_size >= average_font_size * config.cover_large_font_ratio
                && text_length < config.cover_blurb_max_chars
                && composite_count <= config.cover_blurb_max_composites);

        let category = if is_cover {
            ContentCategory::Cover
        } else if text_length < config.short_form_max_chars {
            ContentCategory::ShortForm
        } else if paragraph_density >= config.long_form_min_paragraph_density {
            ContentCategory::LongForm
        } else {
            ContentCategory::Mixed
        };

        Ok(Self {
            index: page.index,
            composite_count,
            heading_count,
            paragraph_count,
            heading_ratio,
            paragraph_density,
            text_length,
            average_font_size,
            max_font_size,
            dominant_family: dominant_family(&composites),
            element_distribution: element_distribution(&page.ordered_elements),
            first_paragraph,
            last_paragraph,
            opens_new_section,
            is_cover,
            category,
        })
    }
}

fn dominant_family(composites: &[&Composite]) -> Option<String> {
    let mut weights: IndexMap<&str, usize> = IndexMap::new();
    for c in composites {
        if let Some(family) = c.font_family.as_deref() {
            *weights.entry(family).or_insert(0) += c.char_count().max(1);
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

fn element_distribution(elements: &[PageElement]) -> [f32; 3] {
    if elements.is_empty() {
        return [0.0; 3];
    }
    let mut counts = [0usize; 3];
    for e in elements {
        let slot = match e {
            PageElement::Text(_) => 0,
            PageElement::Image(_) => 1,
            PageElement::Link(_) => 2,
        };
        counts[slot] += 1;
    }
    let total = elements.len() as f32;
    [counts[0] as f32 / total, counts[1] as f32 / total, counts[2] as f32 / total]
}
