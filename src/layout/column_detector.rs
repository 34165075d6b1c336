//! Column detection by horizontal gap scanning.
//!
//! Composites are swept left-to-right by their left edge. Wherever the next
//! left edge lies at least `min_gap` beyond the furthest right edge seen so
//! far, a column boundary is placed in the middle of the gap. No prior
//! knowledge of the column count is needed, and because the gap is measured
//! from the furthest right edge no composite can straddle a boundary.

use std::cmp::Ordering;

use crate::config::ColumnConfig;
use crate::layout::composite::Composite;

/// Composites grouped into detected columns.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    /// Ascending x-coordinates separating the columns
    pub boundaries: Vec<f32>,
    /// Columns left-to-right, each ordered top-to-bottom
    pub columns: Vec<Vec<Composite>>,
}

impl ColumnLayout {
    /// Number of detected columns (0 for an empty page).
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Composites in reading order: columns left-to-right, each top-to-bottom.
    pub fn into_ordered(self) -> Vec<Composite> {
        self.columns.into_iter().flatten().collect()
    }
}

/// Detects columns and produces reading order for one page.
#[derive(Debug, Clone, Default)]
pub struct ColumnDetector {
    config: ColumnConfig,
}

impl ColumnDetector {
    /// Create a detector with the given settings.
    pub fn new(config: ColumnConfig) -> Self {
        Self { config }
    }

    /// Find column boundaries as x-coordinates, ascending.
    pub fn detect_boundaries(&self, composites: &[Composite]) -> Vec<f32> {
        if composites.len() < 2 {
            return Vec::new();
        }

        let mut by_left: Vec<&Composite> = composites.iter().collect();
        by_left.sort_by(|a, b| {
            a.bbox
                .left()
                .partial_cmp(&b.bbox.left())
                .unwrap_or(Ordering::Equal)
        });

        let mut boundaries = Vec::new();
        let mut reach = by_left[0].bbox.right();
        for next in &by_left[1..] {
            let gap = next.bbox.left() - reach;
            if gap >= self.config.min_gap {
                boundaries.push(reach + gap / 2.0);
            }
            reach = reach.max(next.bbox.right());
        }

        boundaries.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        boundaries
    }

    /// Index of the column containing `center_x`.
    ///
    /// A center exactly on a boundary belongs to the left column.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_flow::layout::ColumnDetector;
    ///
    /// let boundaries = [100.0, 200.0];
    /// assert_eq!(ColumnDetector::column_index(50.0, &boundaries), 0);
    /// assert_eq!(ColumnDetector::column_index(100.0, &boundaries), 0);
    /// assert_eq!(ColumnDetector::column_index(150.0, &boundaries), 1);
    /// assert_eq!(ColumnDetector::column_index(250.0, &boundaries), 2);
    /// ```
    pub fn column_index(center_x: f32, boundaries: &[f32]) -> usize {
        boundaries.iter().filter(|&&b| center_x > b).count()
    }

    /// Partition composites into columns, each ordered top-to-bottom.
    pub fn layout(&self, composites: Vec<Composite>) -> ColumnLayout {
        if composites.is_empty() {
            return ColumnLayout::default();
        }

        let boundaries = self.detect_boundaries(&composites);
        let mut columns: Vec<Vec<Composite>> = vec![Vec::new(); boundaries.len() + 1];

        for composite in composites {
            let idx = Self::column_index(composite.bbox.center().x, &boundaries);
            columns[idx].push(composite);
        }

        for column in &mut columns {
            column.sort_by(top_then_left);
        }
        columns.retain(|c| !c.is_empty());

        log::debug!(
            "detected {} column(s), boundaries {:?}",
            columns.len(),
            boundaries
        );

        ColumnLayout {
            boundaries,
            columns,
        }
    }

    /// Reorder composites into reading order.
    pub fn order(&self, composites: Vec<Composite>) -> Vec<Composite> {
        self.layout(composites).into_ordered()
    }
}

fn top_then_left(a: &Composite, b: &Composite) -> Ordering {
    a.bbox
        .top()
        .partial_cmp(&b.bbox.top())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.bbox.left().partial_cmp(&b.bbox.left()).unwrap_or(Ordering::Equal))
}
