//! Cross-page continuity analysis.
//!
//! Decides, for each pair of consecutive processed pages, whether the content
//! of the first flows into the second. Pages that flow together are merged
//! into a single [`ComposedPage`](crate::pipeline::ComposedPage) by the
//! [`PageComposer`].
//!
//! A pair is evaluated in three steps:
//! 1. Disqualifiers: a cover page never continues, and a page that opens with
//!    a new-section title never continues its predecessor.
//! 2. Content-type gate: both pages must fall in the same [`ContentCategory`].
//! 3. Positive signals: text flow, typography and structure each score one
//!    point; two points (or the strong text-flow pair) continue the flow.

mod composer;
mod profile;
pub mod signals;

pub use composer::PageComposer;
pub use profile::{ContentCategory, PageProfile};

use serde::Serialize;

use crate::config::ContinuityConfig;
use crate::error::{Error, Result};
use crate::pipeline::Page;

/// Why two pages were kept apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BreakReason {
    /// The current page is a cover page
    CoverPage,
    /// The next page opens with a new-section title
    NewSection,
    /// The pages carry different kinds of content
    CategoryMismatch {
        /// Category of the current page
        current: ContentCategory,
        /// Category of the next page
        next: ContentCategory,
    },
    /// Not enough positive signals
    InsufficientScore {
        /// Total score reached
        score: u32,
    },
    /// A heuristic could not be evaluated for the pair
    HeuristicFailure(String),
}

/// Outcome of evaluating a pair of pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContinuityDecision {
    /// The next page continues the current one
    Continue {
        /// Number of positive signals that held
        score: u32,
        /// Whether the unterminated-tail / continuation-head pair held
        strong_pair: bool,
    },
    /// The next page starts a new record
    Break(BreakReason),
}

impl ContinuityDecision {
    /// Check whether the decision merges the pages.
    pub fn is_continue(&self) -> bool {
        matches!(self, ContinuityDecision::Continue { .. })
    }
}

/// Individual positive signals for a pair of pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalScores {
    /// The text runs on across the page boundary
    pub text_flow: bool,
    /// Font size, family or heading ratio match
    pub typography: bool,
    /// Paragraph density and element mix match
    pub structural: bool,
    /// Unterminated tail together with a continuation head
    pub strong_pair: bool,
}

impl SignalScores {
    /// Number of signals that held.
    pub fn score(&self) -> u32 {
        self.text_flow as u32 + self.typography as u32 + self.structural as u32
    }
}

/// Pairwise continuity evaluation.
#[derive(Debug, Clone, Default)]
pub struct ContinuityAnalyzer {
    config: ContinuityConfig,
}

impl ContinuityAnalyzer {
    /// Create an analyzer with the given thresholds.
    pub fn new(config: ContinuityConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &ContinuityConfig {
        &self.config
    }

    /// Compute the profile of a page.
    pub fn profile(&self, page: &Page) -> Result<PageProfile> {
        PageProfile::analyze(page, &self.config)
    }

    /// Score the positive signals of a pair of profiles.
    pub fn signals(&self, current: &PageProfile, next: &PageProfile) -> SignalScores {
        let cfg = &self.config;

        let tail = current.last_paragraph.as_deref().unwrap_or("");
        let head = next.first_paragraph.as_deref().unwrap_or("");
        let unterminated = signals::lacks_terminal_punctuation(tail);
        let continuation_head =
            signals::starts_lowercase(head) || signals::starts_with_connector(head);
        let shared = signals::shared_content_words(tail, head, cfg.lexical_window);
        let lexical = shared >= cfg.min_lexical_overlap;

        let (small, large) = if current.average_font_size <= next.average_font_size {
            (current.average_font_size, next.average_font_size)
        } else {
            (next.average_font_size, current.average_font_size)
        };
        let font_match = large - small <= large * cfg.font_size_tolerance;
        let family_match = current.dominant_family.is_some()
            && current.dominant_family == next.dominant_family;
        let heading_match =
            (current.heading_ratio - next.heading_ratio).abs() <= cfg.heading_ratio_tolerance;

        let density_match = (current.paragraph_density - next.paragraph_density).abs()
            <= cfg.paragraph_density_tolerance;
        let distribution_distance: f32 = current
            .element_distribution
            .iter()
            .zip(next.element_distribution.iter())
            .map(|(a, b)| (a - b).abs())
            .sum::<f32>()
            / 2.0;
        let distribution_match = distribution_distance <= cfg.element_distribution_tolerance;

        SignalScores {
            text_flow: unterminated || continuation_head || lexical,
            typography: font_match || family_match || heading_match,
            structural: density_match && distribution_match,
            strong_pair: unterminated && continuation_head,
        }
    }

    /// Decide whether `next` continues `current`.
    ///
    /// Fails when the profiles carry statistics the signals cannot be
    /// computed from.
    pub fn decide(&self, current: &PageProfile, next: &PageProfile) -> Result<ContinuityDecision> {
        for profile in [current, next] {
            if !(profile.average_font_size.is_finite() && profile.average_font_size > 0.0) {
                return Err(Error::ContinuityHeuristic {
                    page: profile.index,
                    reason: format!("average font size {}", profile.average_font_size),
                });
            }
        }

        if current.is_cover {
            return Ok(ContinuityDecision::Break(BreakReason::CoverPage));
        }
        if next.opens_new_section {
            return Ok(ContinuityDecision::Break(BreakReason::NewSection));
        }
        if current.category != next.category {
            return Ok(ContinuityDecision::Break(BreakReason::CategoryMismatch {
                current: current.category,
                next: next.category,
            }));
        }

        let scores = self.signals(current, next);
        let score = scores.score();
        if score >= self.config.min_score || scores.strong_pair {
            Ok(ContinuityDecision::Continue {
                score,
                strong_pair: scores.strong_pair,
            })
        } else {
            Ok(ContinuityDecision::Break(BreakReason::InsufficientScore { score }))
        }
    }

    /// Evaluate a pair of pages, turning any heuristic failure into a break.
    pub fn evaluate(&self, current: &Page, next: &Page) -> ContinuityDecision {
        let decision = self
            .profile(current)
            .and_then(|a| self.profile(next).and_then(|b| self.decide(&a, &b)));
        match decision {
            Ok(decision) => decision,
            Err(e) => {
                log::warn!("pages {} -> {}: {}", current.index, next.index, e);
                ContinuityDecision::Break(BreakReason::HeuristicFailure(e.to_string()))
            },
        }
    }

    /// Check whether `next` continues the content of `current`.
    pub fn has_content_continuity(&self, current: &Page, next: &Page) -> bool {
        self.evaluate(current, next).is_continue()
    }
}
