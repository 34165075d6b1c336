//! Per-invocation processing context.
//!
//! A `PageContext` is created for every page run and threaded through
//! ingestion and merging. It owns the composite id counter and the page's
//! diagnostics, so nothing survives between runs. Stage settings live on the
//! stages themselves.

use crate::error::Error;
use crate::layout::CompositeId;

/// State shared by the stages processing one page.
#[derive(Debug)]
pub struct PageContext {
    page_index: usize,
    next_seq: usize,
    diagnostics: Vec<Error>,
}

impl PageContext {
    /// Create a fresh context for `page_index`.
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            next_seq: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Index of the page being processed.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Allocate the next composite id on this page.
    pub fn next_id(&mut self) -> CompositeId {
        let id = CompositeId {
            page: self.page_index,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        id
    }

    /// Record a non-fatal problem.
    pub fn record(&mut self, diagnostic: Error) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Consume the context, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Error> {
        self.diagnostics
    }
}
