//! Final reading order: interleaving non-text elements with text composites.
//!
//! The composite order produced by column detection is authoritative and is
//! never changed. Non-text elements are slotted in by their top coordinate:
//! an element is emitted before a composite when its top is not more than
//! `tolerance` below the composite's top.

use std::cmp::Ordering;

use crate::elements::{Bounded, NonTextElement, PageElement};
use crate::layout::composite::Composite;

/// Merge ordered composites with unordered non-text elements.
///
/// # Examples
///
/// ```
/// use page_flow::elements::{ImageElement, NonTextElement};
/// use page_flow::geometry::Rect;
/// use page_flow::layout::reading_order::interleave_elements;
///
/// let image = NonTextElement::Image(ImageElement::new(Rect::new(0.0, 50.0, 10.0, 10.0)));
/// let elements = interleave_elements(Vec::new(), vec![image], 10.0);
/// assert_eq!(elements.len(), 1);
/// ```
pub fn interleave_elements(
    composites: Vec<Composite>,
    mut non_text: Vec<NonTextElement>,
    tolerance: f32,
) -> Vec<PageElement> {
    non_text.sort_by(|a, b| {
        let (a, b) = (a.bbox(), b.bbox());
        a.top()
            .partial_cmp(&b.top())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.left().partial_cmp(&b.left()).unwrap_or(Ordering::Equal))
    });

    let mut result = Vec::with_capacity(composites.len() + non_text.len());
    let mut pending = non_text.into_iter().peekable();

    for composite in composites {
        let limit = composite.bbox.top() + tolerance;
        while let Some(element) = pending.next_if(|e| e.bbox().top() <= limit) {
            result.push(PageElement::from(element));
        }
        result.push(PageElement::Text(composite));
    }
    result.extend(pending.map(PageElement::from));

    result
}
