//! Overlap-based clustering of text fragments into composites.
//!
//! Fragments are grouped by transitive closure over a merge predicate that
//! combines font size compatibility with bounding-box intersection after an
//! adaptive expansion. The expansion grows with the pair's font size relative
//! to the page average, so headline text merges generously while dense body
//! text stays inside its column.

use std::cmp::Ordering;

use crate::config::{MergeConfig, DEFAULT_FONT_SIZE};
use crate::layout::composite::{weighted_font_size, Composite};
use crate::layout::fragment::TextFragment;
use crate::pipeline::PageContext;

/// Absorbs f32 rounding when a size ratio sits exactly on the tolerance.
const SIZE_EPSILON: f32 = 1e-5;

/// Groups fragments of one page into composites.
#[derive(Debug, Clone, Default)]
pub struct OverlapMerger {
    config: MergeConfig,
}

impl OverlapMerger {
    /// Create a merger with the given settings.
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Margin added on every side of both boxes before the intersection test.
    ///
    /// `clamp(max(avg²/page_avg, avg) / 3.5, max(avg·0.8, 5), 15)` where `avg`
    /// is the mean size of the pair; the ceiling wins over the floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_flow::layout::OverlapMerger;
    ///
    /// let merger = OverlapMerger::default();
    /// // Body text: the floor (0.8 × 12) applies
    /// assert!((merger.expansion_margin(12.0, 12.0, 12.0) - 9.6).abs() < 1e-4);
    /// // Large text is capped at the ceiling
    /// assert_eq!(merger.expansion_margin(48.0, 48.0, 12.0), 15.0);
    /// ```
    pub fn expansion_margin(&self, size_a: f32, size_b: f32, page_average: f32) -> f32 {
        let c = &self.config;
        let avg = (size_a + size_b) / 2.0;
        let page_average = if page_average > 0.0 {
            page_average
        } else {
            DEFAULT_FONT_SIZE
        };

        let raw = (avg * avg / page_average).max(avg) / c.expansion_divisor;
        let floor = (avg * c.expansion_floor_ratio).max(c.expansion_floor_min);
        raw.max(floor).min(c.expansion_ceiling)
    }

    /// Check whether two font sizes are within the relative tolerance.
    pub fn font_sizes_compatible(&self, size_a: f32, size_b: f32) -> bool {
        let (small, large) = if size_a <= size_b {
            (size_a, size_b)
        } else {
            (size_b, size_a)
        };
        if small <= 0.0 {
            return false;
        }
        (large / small - 1.0).abs() <= self.config.font_size_tolerance + SIZE_EPSILON
    }

    /// The merge predicate for a pair of fragments.
    pub fn can_merge(&self, a: &TextFragment, b: &TextFragment, page_average: f32) -> bool {
        if !self.font_sizes_compatible(a.font_size, b.font_size) {
            return false;
        }
        let margin = self.expansion_margin(a.font_size, b.font_size, page_average);
        a.bbox.expand(margin).intersects(&b.bbox.expand(margin))
    }

    /// Cluster fragments by transitive closure of [`Self::can_merge`].
    ///
    /// Returns clusters of fragment indices in seed order.
    pub fn cluster_fragments(&self, fragments: &[TextFragment]) -> Vec<Vec<usize>> {
        if fragments.is_empty() {
            return vec![];
        }

        let page_average =
            weighted_font_size(fragments.iter().map(|f| (f.char_count(), f.font_size)))
                .unwrap_or(DEFAULT_FONT_SIZE);

        let mut visited = vec![false; fragments.len()];
        let mut clusters: Vec<Vec<usize>> = vec![];

        for i in 0..fragments.len() {
            if visited[i] {
                continue;
            }

            let mut cluster = vec![i];
            visited[i] = true;

            // BFS: every member is compared against every unvisited fragment once
            let mut j = 0;
            while j < cluster.len() {
                let current = &fragments[cluster[j]];

                for k in 0..fragments.len() {
                    if visited[k] {
                        continue;
                    }
                    if self.can_merge(current, &fragments[k], page_average) {
                        cluster.push(k);
                        visited[k] = true;
                    }
                }

                j += 1;
            }

            clusters.push(cluster);
        }

        log::trace!(
            "clustered {} fragments into {} groups (page average {:.2}pt)",
            fragments.len(),
            clusters.len(),
            page_average
        );
        clusters
    }

    /// Merge a page's fragments into composites.
    pub fn merge(&self, fragments: Vec<TextFragment>, ctx: &mut PageContext) -> Vec<Composite> {
        let clusters = self.cluster_fragments(&fragments);

        let mut slots: Vec<Option<TextFragment>> = fragments.into_iter().map(Some).collect();
        let mut composites = Vec::with_capacity(clusters.len());

        for cluster in clusters {
            let members: Vec<TextFragment> =
                cluster.iter().filter_map(|&idx| slots[idx].take()).collect();
            let members = order_members(members, self.config.line_tolerance);
            composites.push(Composite::from_fragments(ctx.next_id(), members));
        }

        log::debug!(
            "page {}: merged into {} composites ({} composed)",
            ctx.page_index(),
            composites.len(),
            composites.iter().filter(|c| c.composed).count()
        );
        composites
    }
}

/// Order cluster members top-to-bottom, left-to-right.
///
/// Members whose tops lie within `line_tolerance` of the first member of the
/// current line share that line and are ordered by left edge.
pub fn order_members(mut members: Vec<TextFragment>, line_tolerance: f32) -> Vec<TextFragment> {
    if members.len() < 2 {
        return members;
    }

    members.sort_by(|a, b| {
        a.bbox
            .top()
            .partial_cmp(&b.bbox.top())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.bbox.left().partial_cmp(&b.bbox.left()).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<Vec<TextFragment>> = Vec::new();
    let mut line_top = f32::NEG_INFINITY;
    for member in members {
        let top = member.bbox.top();
        match lines.last_mut() {
            Some(line) if top - line_top <= line_tolerance => line.push(member),
            _ => {
                line_top = top;
                lines.push(vec![member]);
            },
        }
    }

    lines
        .into_iter()
        .flat_map(|mut line| {
            line.sort_by(|a, b| {
                a.bbox
                    .left()
                    .partial_cmp(&b.bbox.left())
                    .unwrap_or(Ordering::Equal)
            });
            line
        })
        .collect()
}
