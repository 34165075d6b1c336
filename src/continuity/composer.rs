//! Grouping of consecutive pages into composed pages.

use std::collections::BTreeSet;

use super::{BreakReason, ContinuityAnalyzer, ContinuityDecision, PageProfile};
use crate::config::ContinuityConfig;
use crate::elements::Bounded;
use crate::error::{Error, Result};
use crate::pipeline::{ComposedPage, FlowPage, Page};

/// Streaming page grouper.
///
/// Holds exactly one open group of pages. Each pushed page is compared with
/// the last page of the group; when it breaks the flow the group is
/// finalized and returned, and the new page opens the next group.
///
/// # Examples
///
/// ```
/// use page_flow::config::ContinuityConfig;
/// use page_flow::continuity::PageComposer;
/// use page_flow::pipeline::Page;
///
/// let mut composer = PageComposer::new(ContinuityConfig::default());
/// assert!(composer.push(Page::new(0, 600.0, 800.0, vec![])).is_none());
/// let last = composer.finish().unwrap();
/// assert_eq!(last.index(), 0);
/// ```
#[derive(Debug, Default)]
pub struct PageComposer {
    analyzer: ContinuityAnalyzer,
    group: Vec<Page>,
    last_profile: Option<Result<PageProfile>>,
    diagnostics: Vec<Error>,
}

impl PageComposer {
    /// Create a composer with the given thresholds.
    pub fn new(config: ContinuityConfig) -> Self {
        Self {
            analyzer: ContinuityAnalyzer::new(config),
            ..Self::default()
        }
    }

    /// The analyzer deciding each pair.
    pub fn analyzer(&self) -> &ContinuityAnalyzer {
        &self.analyzer
    }

    /// Add the next page of the document.
    ///
    /// Returns the finalized previous group when `page` does not continue it.
    pub fn push(&mut self, page: Page) -> Option<FlowPage> {
        let next_profile = self.analyzer.profile(&page);

        let Some(current_profile) = self.last_profile.take() else {
            self.group.push(page);
            self.last_profile = Some(next_profile);
            return None;
        };

        let decision = self.decide(&current_profile, &next_profile);
        self.last_profile = Some(next_profile);

        log::debug!(
            "page {} -> {}: {:?}",
            self.group.last().map_or(0, |p| p.index),
            page.index,
            decision
        );

        if decision.is_continue() {
            self.group.push(page);
            None
        } else {
            let finished = std::mem::replace(&mut self.group, vec![page]);
            finalize_group(finished)
        }
    }

    /// Finalize the open group, if any.
    pub fn finish(&mut self) -> Option<FlowPage> {
        self.last_profile = None;
        finalize_group(std::mem::take(&mut self.group))
    }

    /// Group a whole sequence of pages.
    pub fn compose(&mut self, pages: impl IntoIterator<Item = Page>) -> Vec<FlowPage> {
        let mut result: Vec<FlowPage> = pages.into_iter().filter_map(|p| self.push(p)).collect();
        result.extend(self.finish());
        result
    }

    /// Heuristic failures recorded so far.
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Consume the composer, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Error> {
        self.diagnostics
    }

    fn decide(
        &mut self,
        current: &Result<PageProfile>,
        next: &Result<PageProfile>,
    ) -> ContinuityDecision {
        let outcome = match (current, next) {
            (Ok(a), Ok(b)) => self.analyzer.decide(a, b),
            (Err(e), _) | (_, Err(e)) => Err(heuristic_failure(e)),
        };

        match outcome {
            Ok(decision) => decision,
            Err(e) => {
                log::warn!("{}", e);
                let reason = BreakReason::HeuristicFailure(e.to_string());
                let decision = ContinuityDecision::Break(reason);
                self.diagnostics.push(e);
                decision
            },
        }
    }
}

/// Profile errors are not `Clone`; rebuild the same failure for the pair.
fn heuristic_failure(e: &Error) -> Error {
    match e {
        Error::ContinuityHeuristic { page, reason } => Error::ContinuityHeuristic {
            page: *page,
            reason: reason.clone(),
        },
        other => Error::ContinuityHeuristic {
            page: 0,
            reason: other.to_string(),
        },
    }
}

/// Turn a group into its output record.
fn finalize_group(mut group: Vec<Page>) -> Option<FlowPage> {
    match group.len() {
        0 => None,
        1 => group.pop().map(FlowPage::Single),
        _ => {
            let first = &group[0];
            let index = first.index;
            let title = first.title.clone();
            let width = group.iter().map(|p| p.width).fold(0.0f32, f32::max);
            let source_page_indexes: BTreeSet<usize> = group.iter().map(|p| p.index).collect();

            let mut offset = 0.0f32;
            let mut ordered_elements = Vec::new();
            for page in group {
                for mut element in page.ordered_elements {
                    element.translate_y(offset);
                    ordered_elements.push(element);
                }
                offset += page.height;
            }

            log::debug!(
                "composed pages {:?} ({} elements)",
                source_page_indexes,
                ordered_elements.len()
            );

            Some(FlowPage::Composed(ComposedPage {
                index,
                width,
                merged_height: offset,
                title,
                source_page_indexes,
                ordered_elements,
            }))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::PageElement;
    use crate::geometry::Rect;
    use crate::layout::{Composite, CompositeId, SemanticType, TextFragment};

    fn body_page(index: usize, first: &str, last: &str) -> Page {
        let filler = "The survey of the northern coast took most of the season and the crews \
                      recorded every inlet between the two river mouths in careful detail";
        let texts = [first, filler, filler, last];
        let elements = texts
            .iter()
            .enumerate()
            .map(|(seq, text)| {
                let bbox = Rect::new(50.0, 50.0 + seq as f32 * 100.0, 500.0, 40.0);
                let frag = TextFragment::new(*text, bbox, 10.0).with_family("Serif");
                let mut c = Composite::from_fragments(CompositeId { page: index, seq }, vec![frag]);
                c.semantic_type = SemanticType::Paragraph;
                PageElement::Text(c)
            })
            .collect();
        Page::new(index, 600.0, 800.0, elements)
    }

    #[test]
    fn test_continuing_pages_are_composed() {
        let mut composer = PageComposer::new(ContinuityConfig::default());
        let pages = vec![
            body_page(4, "It began in spring.", "all of it thanks to the unwavering"),
            body_page(5, "support from the harbour villages.", "The end."),
        ];
        let flow = composer.compose(pages);

        assert_eq!(flow.len(), 1);
        let FlowPage::Composed(composed) = &flow[0] else {
            panic!("expected composed page");
        };
        assert_eq!(composed.index, 4);
        assert_eq!(composed.merged_height, 1600.0);
        assert_eq!(composed.ordered_elements.len(), 8);
        assert_eq!(flow[0].metadata().composed_from_page_indexes, Some(vec![4, 5]));

        // First element of the second page is shifted by the first page height
        let shifted = composed.ordered_elements[4].as_text().unwrap();
        assert_eq!(shifted.bbox.top(), 850.0);
        assert_eq!(shifted.source_fragments[0].bbox.top(), 850.0);
    }

    #[test]
    fn test_push_returns_previous_group_on_break() {
        let mut composer = PageComposer::new(ContinuityConfig::default());
        assert!(composer.push(body_page(0, "One.", "Done.")).is_none());

        let mut broken = body_page(1, "Another story.", "Done.");
        broken.height = f32::NAN;
        let returned = composer.push(broken).unwrap();
        assert_eq!(returned.index(), 0);
        assert!(!returned.is_composed());
        assert_eq!(composer.diagnostics().len(), 1);

        let last = composer.finish().unwrap();
        assert_eq!(last.index(), 1);
        assert!(composer.finish().is_none());
    }

    #[test]
    fn test_single_page_passes_through() {
        let page = body_page(2, "Alone.", "Done.");
        let mut composer = PageComposer::default();
        let flow = composer.compose(vec![page.clone()]);
        assert_eq!(flow, vec![FlowPage::Single(page)]);
    }
}
