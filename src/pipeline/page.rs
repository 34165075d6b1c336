//! Page records produced by the pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::elements::PageElement;
use crate::layout::Composite;

/// A single processed page: typed blocks in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page index in the document (0-based)
    pub index: usize,
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Most prominent heading, or "Page N"
    pub title: String,
    /// Composites and non-text elements in reading order
    pub ordered_elements: Vec<PageElement>,
}

impl Page {
    /// Create a page, deriving its title from the elements.
    pub fn new(index: usize, width: f32, height: f32, ordered_elements: Vec<PageElement>) -> Self {
        let title = derive_title(index, &ordered_elements);
        Self {
            index,
            width,
            height,
            title,
            ordered_elements,
        }
    }

    /// Text composites in reading order.
    pub fn composites(&self) -> impl Iterator<Item = &Composite> {
        self.ordered_elements.iter().filter_map(PageElement::as_text)
    }
}

/// Title of a page: the highest-level heading, first one on ties.
fn derive_title(index: usize, elements: &[PageElement]) -> String {
    let mut best: Option<&Composite> = None;
    for composite in elements.iter().filter_map(PageElement::as_text) {
        let Some(level) = composite.semantic_type.heading_level() else {
            continue;
        };
        let better = match best.and_then(|b| b.semantic_type.heading_level()) {
            Some(current) => level < current,
            None => true,
        };
        if better {
            best = Some(composite);
        }
    }

    match best {
        Some(heading) => heading.text.clone(),
        None => format!("Page {}", index + 1),
    }
}

/// Several consecutive pages merged into one logical page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedPage {
    /// Index of the first source page
    pub index: usize,
    /// Widest source page
    pub width: f32,
    /// Sum of the source page heights
    pub merged_height: f32,
    /// Title of the first source page
    pub title: String,
    /// Indexes of the pages merged into this one
    pub source_page_indexes: BTreeSet<usize>,
    /// Elements of all source pages, vertically offset, in page order
    pub ordered_elements: Vec<PageElement>,
}

/// Provenance attached to every downstream record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Source pages, present only for composed pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composed_from_page_indexes: Option<Vec<usize>>,
    /// Whether the record spans several pages
    pub is_composed: bool,
}

/// The uniform record handed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Page index (first source page for composed pages)
    pub index: usize,
    /// Width
    pub width: f32,
    /// Height (merged height for composed pages)
    pub height: f32,
    /// Title
    pub title: String,
    /// Elements in reading order
    pub ordered_elements: Vec<PageElement>,
    /// Provenance
    pub metadata: PageMetadata,
}

/// Output of the continuity analyzer: a page on its own or a composed group.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowPage {
    /// A page that did not continue into its neighbors
    Single(Page),
    /// Pages whose content flows continuously
    Composed(ComposedPage),
}

impl FlowPage {
    /// Page index (first source page for composed pages).
    pub fn index(&self) -> usize {
        match self {
            FlowPage::Single(p) => p.index,
            FlowPage::Composed(c) => c.index,
        }
    }

    /// Height of the (possibly merged) page.
    pub fn height(&self) -> f32 {
        match self {
            FlowPage::Single(p) => p.height,
            FlowPage::Composed(c) => c.merged_height,
        }
    }

    /// Title of the (possibly merged) page.
    pub fn title(&self) -> &str {
        match self {
            FlowPage::Single(p) => &p.title,
            FlowPage::Composed(c) => &c.title,
        }
    }

    /// Elements in reading order.
    pub fn ordered_elements(&self) -> &[PageElement] {
        match self {
            FlowPage::Single(p) => &p.ordered_elements,
            FlowPage::Composed(c) => &c.ordered_elements,
        }
    }

    /// Indexes of the pages this record was built from.
    pub fn source_page_indexes(&self) -> Vec<usize> {
        match self {
            FlowPage::Single(p) => vec![p.index],
            FlowPage::Composed(c) => c.source_page_indexes.iter().copied().collect(),
        }
    }

    /// Check whether several pages were merged.
    pub fn is_composed(&self) -> bool {
        matches!(self, FlowPage::Composed(_))
    }

    /// Provenance metadata.
    pub fn metadata(&self) -> PageMetadata {
        match self {
            FlowPage::Single(_) => PageMetadata::default(),
            FlowPage::Composed(c) => PageMetadata {
                composed_from_page_indexes: Some(c.source_page_indexes.iter().copied().collect()),
                is_composed: true,
            },
        }
    }

    /// Convert into the downstream record.
    pub fn to_record(&self) -> PageRecord {
        let metadata = self.metadata();
        match self {
            FlowPage::Single(p) => PageRecord {
                index: p.index,
                width: p.width,
                height: p.height,
                title: p.title.clone(),
                ordered_elements: p.ordered_elements.clone(),
                metadata,
            },
            FlowPage::Composed(c) => PageRecord {
                index: c.index,
                width: c.width,
                height: c.merged_height,
                title: c.title.clone(),
                ordered_elements: c.ordered_elements.clone(),
                metadata,
            },
        }
    }
}
