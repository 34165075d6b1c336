//! Page elements: text composites and passthrough non-text records.
//!
//! ## Design
//!
//! `PageElement` is a tagged union over the three kinds of content a page can
//! carry. Each variant holds only the fields relevant to it; the variants are
//! unified by the [`Bounded`] capability, which is all the final ordering and
//! page composition steps need.

mod image;
mod link;

pub use image::ImageElement;
pub use link::LinkElement;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::layout::Composite;

/// Anything with a bounding box that can be shifted down the page.
pub trait Bounded {
    /// Bounding box in page coordinates.
    fn bbox(&self) -> Rect;

    /// Shift the element down by `dy`.
    fn translate_y(&mut self, dy: f32);
}

impl Bounded for Composite {
    fn bbox(&self) -> Rect {
        self.bbox
    }

    fn translate_y(&mut self, dy: f32) {
        Composite::translate_y(self, dy)
    }
}

/// A separately-extracted non-text element supplied by the upstream parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NonTextElement {
    /// Embedded image
    Image(ImageElement),
    /// Hyperlink area
    Link(LinkElement),
}

impl Bounded for NonTextElement {
    fn bbox(&self) -> Rect {
        match self {
            NonTextElement::Image(i) => i.bbox(),
            NonTextElement::Link(l) => l.bbox(),
        }
    }

    fn translate_y(&mut self, dy: f32) {
        match self {
            NonTextElement::Image(i) => i.translate_y(dy),
            NonTextElement::Link(l) => l.translate_y(dy),
        }
    }
}

impl From<ImageElement> for NonTextElement {
    fn from(image: ImageElement) -> Self {
        NonTextElement::Image(image)
    }
}

impl From<LinkElement> for NonTextElement {
    fn from(link: LinkElement) -> Self {
        NonTextElement::Link(link)
    }
}

/// An element of a page's reading-order sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageElement {
    /// Text composite
    Text(Composite),
    /// Embedded image
    Image(ImageElement),
    /// Hyperlink area
    Link(LinkElement),
}

impl PageElement {
    /// Check if this is a text element.
    pub fn is_text(&self) -> bool {
        matches!(self, PageElement::Text(_))
    }

    /// Check if this is an image element.
    pub fn is_image(&self) -> bool {
        matches!(self, PageElement::Image(_))
    }

    /// Check if this is a link element.
    pub fn is_link(&self) -> bool {
        matches!(self, PageElement::Link(_))
    }

    /// Get as a composite if this is a text element.
    pub fn as_text(&self) -> Option<&Composite> {
        match self {
            PageElement::Text(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Composite> for PageElement {
    fn from(composite: Composite) -> Self {
        PageElement::Text(composite)
    }
}

impl From<NonTextElement> for PageElement {
    fn from(element: NonTextElement) -> Self {
        match element {
            NonTextElement::Image(i) => PageElement::Image(i),
            NonTextElement::Link(l) => PageElement::Link(l),
        }
    }
}

impl Bounded for PageElement {
    fn bbox(&self) -> Rect {
        match self {
            PageElement::Text(c) => c.bbox,
            PageElement::Image(i) => i.bbox(),
            PageElement::Link(l) => l.bbox(),
        }
    }

    fn translate_y(&mut self, dy: f32) {
        match self {
            PageElement::Text(c) => c.translate_y(dy),
            PageElement::Image(i) => i.translate_y(dy),
            PageElement::Link(l) => l.translate_y(dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CompositeId, TextFragment};

    fn text_element() -> PageElement {
        let frag = TextFragment::new("Test", Rect::new(10.0, 20.0, 50.0, 12.0), 12.0);
        Composite::from_fragments(CompositeId { page: 0, seq: 0 }, vec![frag]).into()
    }

    #[test]
    fn test_page_element_bbox() {
        let bbox = text_element().bbox();
        assert_eq!(bbox, Rect::new(10.0, 20.0, 50.0, 12.0));
    }

    #[test]
    fn test_page_element_type_checks() {
        let text = text_element();
        assert!(text.is_text());
        assert!(!text.is_image());
        assert!(text.as_text().is_some());

        let image: PageElement =
            NonTextElement::Image(ImageElement::new(Rect::new(0.0, 0.0, 5.0, 5.0))).into();
        assert!(image.is_image());
        assert!(image.as_text().is_none());

        let link: PageElement =
            NonTextElement::Link(LinkElement::new(Rect::zero(), "https://example.com")).into();
        assert!(link.is_link());
    }

    #[test]
    fn test_translate_every_variant() {
        let mut elements = vec![
            text_element(),
            PageElement::Image(ImageElement::new(Rect::new(0.0, 5.0, 5.0, 5.0))),
            PageElement::Link(LinkElement::new(Rect::new(0.0, 7.0, 5.0, 5.0), "#top")),
        ];
        for e in &mut elements {
            e.translate_y(100.0);
        }
        assert_eq!(elements[0].bbox().top(), 120.0);
        assert_eq!(elements[1].bbox().top(), 105.0);
        assert_eq!(elements[2].bbox().top(), 107.0);
    }

    #[test]
    fn test_non_text_deserialize() {
        let json = r#"[
            {
                "kind": "image",
                "bbox": { "left": 1, "top": 2, "width": 3, "height": 4 },
                "source": "img0.png"
            },
            {
                "kind": "link",
                "bbox": { "left": 0, "top": 0, "width": 1, "height": 1 },
                "uri": "https://example.com"
            }
        ]"#;
        let elements: Vec<NonTextElement> = serde_json::from_str(json).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].bbox(), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert!(matches!(&elements[1], NonTextElement::Link(l) if l.uri == "https://example.com"));
    }
}
