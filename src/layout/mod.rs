//! Per-page layout analysis.
//!
//! This module turns a page's unordered fragments into typed, ordered blocks:
//! - Fragment ingestion and normalization
//! - Overlap clustering (fragments → composites)
//! - Column detection and reading order
//! - Heading detection from page-relative font statistics
//! - Interleaving of non-text elements

pub mod clustering;
pub mod column_detector;
pub mod composite;
pub mod fragment;
pub mod heading_detector;
pub mod reading_order;

// Re-export main types
pub use clustering::OverlapMerger;
pub use column_detector::{ColumnDetector, ColumnLayout};
pub use composite::{Composite, CompositeId};
pub use fragment::{RawBox, RawFragment, TextFragment};
pub use heading_detector::{HeadingLevel, HeadingThresholds, SemanticType, TypeClassifier};
pub use reading_order::interleave_elements;
