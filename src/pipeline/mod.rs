//! Document pipeline: raw page inputs to composed page records.
//!
//! ```text
//! PageInput (fragments + non-text elements)
//!     ↓
//! [ingest_fragments] (normalization, diagnostics)
//!     ↓
//! [OverlapMerger] (fragments → composites)
//!     ↓
//! [ColumnDetector] (reading order)
//!     ↓
//! [TypeClassifier] (headings / paragraphs)
//!     ↓
//! [interleave_elements] (images, links)
//!     ↓
//! Page
//!     ↓
//! [PageComposer] (cross-page continuity)
//!     ↓
//! FlowPage → PageRecord
//! ```
//!
//! Every page is processed with its own [`PageContext`]; only the composer
//! looks at more than one page.

mod context;
mod page;

pub use context::PageContext;
pub use page::{ComposedPage, FlowPage, Page, PageMetadata, PageRecord};

use serde::{Deserialize, Serialize};

use crate::config::ComposerConfig;
use crate::continuity::PageComposer;
use crate::elements::NonTextElement;
use crate::error::{Error, Result};
use crate::layout::fragment::ingest_fragments;
use crate::layout::{
    interleave_elements, ColumnDetector, OverlapMerger, RawFragment, TypeClassifier,
};

/// Upstream record for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInput {
    /// Page index in the document (0-based)
    pub index: usize,
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Text fragments in any order
    pub fragments: Vec<RawFragment>,
    /// Images and links
    pub non_text: Vec<NonTextElement>,
}

impl PageInput {
    /// Create an empty page input.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            ..Self::default()
        }
    }

    /// Add a text fragment.
    pub fn with_fragment(mut self, fragment: RawFragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Add an image or link.
    pub fn with_element(mut self, element: impl Into<NonTextElement>) -> Self {
        self.non_text.push(element.into());
        self
    }
}

/// A processed page with the diagnostics recorded while processing it.
#[derive(Debug)]
pub struct PageOutcome {
    /// The processed page
    pub page: Page,
    /// Non-fatal problems found on the page
    pub diagnostics: Vec<Error>,
}

/// Result of composing a whole document.
#[derive(Debug, Default)]
pub struct Composition {
    /// Output pages in document order
    pub pages: Vec<FlowPage>,
    /// Non-fatal problems from every stage, in page order
    pub diagnostics: Vec<Error>,
}

impl Composition {
    /// Convert every output page into a downstream record.
    pub fn to_records(&self) -> Vec<PageRecord> {
        self.pages.iter().map(FlowPage::to_record).collect()
    }

    /// Serialize the downstream records as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_records())?)
    }
}

/// The page composition pipeline.
///
/// # Examples
///
/// ```
/// use page_flow::layout::RawFragment;
/// use page_flow::pipeline::{DocumentPipeline, PageInput};
///
/// let pipeline = DocumentPipeline::new();
/// let page = PageInput::new(0, 600.0, 800.0)
///     .with_fragment(RawFragment::new("Hello", 50.0, 100.0, 40.0, 12.0, 12.0))
///     .with_fragment(RawFragment::new("world", 200.0, 100.0, 40.0, 12.0, 12.0));
///
/// let composition = pipeline.compose(vec![page]);
/// assert_eq!(composition.pages.len(), 1);
/// assert!(composition.diagnostics.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    config: ComposerConfig,
    merger: OverlapMerger,
    detector: ColumnDetector,
    classifier: TypeClassifier,
}

impl DocumentPipeline {
    /// Create a new pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(ComposerConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: ComposerConfig) -> Self {
        Self {
            merger: OverlapMerger::new(config.merge.clone()),
            detector: ColumnDetector::new(config.columns.clone()),
            classifier: TypeClassifier::new(config.classify.clone()),
            config,
        }
    }

    /// Create a pipeline after checking the configuration.
    pub fn try_with_config(config: ComposerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Run the per-page stages on one page.
    pub fn process_page(&self, input: PageInput) -> PageOutcome {
        let mut ctx = PageContext::new(input.index);

        let width = page_extent(input.width, "width", &mut ctx);
        let height = page_extent(input.height, "height", &mut ctx);

        let fragments = ingest_fragments(input.fragments, &mut ctx);
        let fragment_count = fragments.len();

        let composites = self.merger.merge(fragments, &mut ctx);
        let layout = self.detector.layout(composites);
        let column_count = layout.column_count();
        let mut composites = layout.into_ordered();
        let thresholds = self.classifier.classify(&mut composites);

        log::debug!(
            "page {}: {} fragments -> {} composites in {} column(s), average font {:.1}",
            input.index,
            fragment_count,
            composites.len(),
            column_count,
            thresholds.page_average
        );

        let elements = interleave_elements(
            composites,
            input.non_text,
            self.config.columns.interleave_tolerance,
        );

        PageOutcome {
            page: Page::new(input.index, width, height, elements),
            diagnostics: ctx.into_diagnostics(),
        }
    }

    /// Run the per-page stages on every page, keeping input order.
    #[cfg(not(feature = "parallel"))]
    pub fn process_pages(&self, inputs: Vec<PageInput>) -> Vec<PageOutcome> {
        inputs.into_iter().map(|input| self.process_page(input)).collect()
    }

    /// Run the per-page stages on every page, keeping input order.
    #[cfg(feature = "parallel")]
    pub fn process_pages(&self, inputs: Vec<PageInput>) -> Vec<PageOutcome> {
        use rayon::prelude::*;

        inputs.into_par_iter().map(|input| self.process_page(input)).collect()
    }

    /// Process every page and group continuing pages.
    pub fn compose(&self, inputs: Vec<PageInput>) -> Composition {
        let mut diagnostics = Vec::new();
        let mut composer = PageComposer::new(self.config.continuity.clone());
        let mut pages = Vec::new();

        for outcome in self.process_pages(inputs) {
            diagnostics.extend(outcome.diagnostics);
            pages.extend(composer.push(outcome.page));
        }
        pages.extend(composer.finish());
        diagnostics.extend(composer.into_diagnostics());

        log::debug!("composed {} page record(s), {} diagnostic(s)", pages.len(), diagnostics.len());

        Composition { pages, diagnostics }
    }
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn page_extent(value: f32, name: &str, ctx: &mut PageContext) -> f32 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    ctx.record(Error::InvalidPage {
        index: ctx.page_index(),
        reason: format!("{} is {}", name, value),
    });
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ImageElement;
    use crate::geometry::Rect;

    #[test]
    fn test_process_page_orders_and_classifies() {
        let pipeline = DocumentPipeline::new();
        let input = PageInput::new(0, 600.0, 800.0)
            .with_fragment(RawFragment::new("Body text", 50.0, 200.0, 100.0, 10.0, 10.0))
            .with_fragment(RawFragment::new("Title", 50.0, 50.0, 100.0, 24.0, 24.0))
            .with_element(ImageElement::new(Rect::new(50.0, 120.0, 100.0, 50.0)));

        let outcome = pipeline.process_page(input);
        assert!(outcome.diagnostics.is_empty());

        let page = outcome.page;
        assert_eq!(page.title, "Title");
        assert_eq!(page.ordered_elements.len(), 3);
        assert!(page.ordered_elements[0].as_text().unwrap().is_heading());
        assert!(page.ordered_elements[1].is_image());
        assert_eq!(page.ordered_elements[2].as_text().unwrap().text, "Body text");
    }

    #[test]
    fn test_invalid_page_size_is_diagnosed() {
        let pipeline = DocumentPipeline::new();
        let outcome = pipeline.process_page(PageInput::new(3, f32::NAN, 800.0));
        assert_eq!(outcome.page.width, 0.0);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(matches!(outcome.diagnostics[0], Error::InvalidPage { index: 3, .. }));
    }

    #[test]
    fn test_ids_restart_per_page() {
        let pipeline = DocumentPipeline::new();
        let make = |index| {
            PageInput::new(index, 600.0, 800.0)
                .with_fragment(RawFragment::new("A line.", 50.0, 50.0, 100.0, 12.0, 12.0))
        };
        let outcomes = pipeline.process_pages(vec![make(0), make(1)]);
        let first = outcomes[0].page.composites().next().unwrap().id;
        let second = outcomes[1].page.composites().next().unwrap().id;
        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 0);
        assert_eq!(second.page, 1);
    }

    #[test]
    fn test_page_input_from_json() {
        let json = r##"{
            "index": 2,
            "width": 600,
            "height": 800,
            "fragments": [
                {
                    "text": "Hi",
                    "boundingBox": {"top": 10, "left": 20, "width": 30, "height": 12},
                    "fontSize": 12
                }
            ],
            "nonText": [
                {
                    "kind": "link",
                    "bbox": {"left": 0, "top": 0, "width": 5, "height": 5},
                    "uri": "#p3"
                }
            ]
        }"##;
        let input: PageInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.index, 2);
        assert_eq!(input.fragments.len(), 1);
        assert_eq!(input.non_text.len(), 1);
        match &input.non_text[0] {
            NonTextElement::Link(link) => assert_eq!(link.uri, "#p3"),
            other => panic!("expected a link, got {:?}", other),
        }
    }
}
