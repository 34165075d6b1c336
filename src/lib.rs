// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::manual_find)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # Page Flow
//!
//! Layout reconstruction for extracted page content: turns the unordered text
//! fragments of each page into typed blocks in reading order, then joins
//! consecutive pages whose content flows across the page boundary.
//!
//! ## Stages
//!
//! - **Overlap Merge**: fragments whose font-aware expanded boxes overlap are
//!   clustered into composites
//! - **Column Order**: composites are bucketed into columns by vertical gaps
//!   and read column by column, top to bottom
//! - **Type Classification**: headings (levels 1 to 5) and paragraphs from
//!   page-relative font size and word count
//! - **Page Continuity**: text flow, typography and structural signals decide
//!   whether consecutive pages form one logical page
//!
//! Images and links supplied by the upstream parser are slotted into the
//! reading order by their vertical position.
//!
//! ## Quick Start
//!
//! ```
//! use page_flow::layout::RawFragment;
//! use page_flow::pipeline::{DocumentPipeline, PageInput};
//!
//! let pipeline = DocumentPipeline::new();
//! let pages = vec![
//!     PageInput::new(0, 600.0, 800.0)
//!         .with_fragment(RawFragment::new("A Coastal Survey", 50.0, 40.0, 300.0, 30.0, 30.0))
//!         .with_fragment(RawFragment::new("The crews set out.", 50.0, 120.0, 300.0, 11.0, 11.0)),
//! ];
//!
//! let composition = pipeline.compose(pages);
//! for record in composition.to_records() {
//!     println!("{}: {} elements", record.title, record.ordered_elements.len());
//! }
//! ```
//!
//! ## Failure model
//!
//! Nothing aborts a document. Malformed fragments are normalized and reported,
//! pages with unusable dimensions are processed with zero size, and a
//! continuity heuristic that cannot be evaluated forces a page break. All of
//! these surface as [`Composition::diagnostics`](pipeline::Composition).

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry and page content
pub mod elements;
pub mod geometry;

// Per-page layout analysis
pub mod layout;

// Cross-page composition
pub mod continuity;

// Orchestration
pub mod pipeline;

// Re-exports
pub use config::ComposerConfig;
pub use continuity::{ContinuityAnalyzer, ContinuityDecision, PageComposer};
pub use elements::{Bounded, NonTextElement, PageElement};
pub use error::{Error, Result};
pub use pipeline::{Composition, DocumentPipeline, FlowPage, Page, PageInput, PageRecord};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "page_flow");
    }
}
