#![forbid(unsafe_code)]

//! Host element tree abstraction.
//!
//! The positioning engine and the overlay coordinator never own elements.
//! They address them through [`NodeId`] handles and query geometry, style and
//! structure through the [`Dom`] trait. A browser binding, a native toolkit
//! or the in-memory [`MemoryDom`](crate::memory_dom::MemoryDom) can all back
//! the trait.
//!
//! # Invariants
//!
//! - [`Dom::document`] is the parent of [`Dom::root`], and [`Dom::body`] is a
//!   child of the root.
//! - Geometry queries on unknown handles return zero values rather than
//!   panicking.
//! - `set_style(node, prop, "")` clears an inline property.

use smallvec::SmallVec;

use crate::geometry::{Point, Rect, Sides, Size};

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw host index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw host index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Result list for selector queries. Most queries match a handful of nodes.
pub type NodeList = SmallVec<[NodeId; 4]>;

/// CSS `position` values the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CssPosition {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl CssPosition {
    /// Parse a CSS keyword. Unknown keywords are treated as `static`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "relative" => Self::Relative,
            "absolute" => Self::Absolute,
            "fixed" => Self::Fixed,
            "sticky" => Self::Sticky,
            _ => Self::Static,
        }
    }

    /// Whether this element establishes an offset parent.
    #[inline]
    #[must_use]
    pub const fn is_positioned(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// CSS `overflow` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Scroll,
    Auto,
}

impl Overflow {
    /// Whether the element can scroll its content.
    #[inline]
    #[must_use]
    pub const fn scrolls(self) -> bool {
        matches!(self, Self::Scroll | Self::Auto)
    }
}

/// CSS `display`, reduced to what measurement needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Display {
    #[default]
    Block,
    Inline,
    None,
}

impl Display {
    /// Parse a CSS keyword. Anything other than `none`/`inline` counts as block.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "none" => Self::None,
            "inline" => Self::Inline,
            _ => Self::Block,
        }
    }
}

/// The subset of computed style the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComputedStyle {
    pub position: CssPosition,
    pub display: Display,
    pub overflow: Overflow,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    pub margin: Sides,
}

impl ComputedStyle {
    /// Whether any overflow axis scrolls.
    #[must_use]
    pub fn scrolls(&self) -> bool {
        self.overflow.scrolls() || self.overflow_x.scrolls() || self.overflow_y.scrolls()
    }
}

/// Known host layout bugs the geometry helpers correct for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostQuirks {
    /// The host reports `top == 0` for the document root's bounding rect
    /// regardless of vertical scroll.
    pub root_top_reported_as_zero: bool,
}

/// A positionable element tree.
pub trait Dom {
    // --- Structure ---

    /// The document node (parent of the root element).
    fn document(&self) -> NodeId;

    /// The root element (`<html>` in browsers).
    fn root(&self) -> NodeId;

    /// The body element.
    fn body(&self) -> NodeId;

    /// Whether the handle refers to a live element.
    fn exists(&self, node: NodeId) -> bool;

    /// The parent node, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Whether the node is a document fragment.
    fn is_fragment(&self, node: NodeId) -> bool;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Append `child` as the last child of `parent`, moving it if attached.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detach the node from its parent.
    fn detach(&mut self, node: NodeId);

    /// Replace children with a text node.
    fn set_text_content(&mut self, node: NodeId, text: &str);

    /// Replace children with parsed markup.
    fn set_inner_html(&mut self, node: NodeId, html: &str);

    /// All descendants of `scope` (or of the document) matching `selector`,
    /// in document order.
    fn query_selector_all(&self, scope: Option<NodeId>, selector: &str) -> NodeList;

    /// First descendant matching `selector`.
    fn query_selector(&self, scope: Option<NodeId>, selector: &str) -> Option<NodeId> {
        self.query_selector_all(scope, selector).first().copied()
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    // --- Geometry ---

    /// Border box relative to the viewport.
    fn bounding_client_rect(&self, node: NodeId) -> Rect;

    /// The native offset parent (nearest positioned ancestor).
    fn offset_parent(&self, node: NodeId) -> Option<NodeId>;

    /// Position relative to the offset parent.
    fn offset_position(&self, node: NodeId) -> Point;

    /// Border box size; zero when not rendered.
    fn offset_size(&self, node: NodeId) -> Size;

    /// Padding box size.
    fn client_size(&self, node: NodeId) -> Size;

    /// Content size including overflow.
    fn scroll_size(&self, node: NodeId) -> Size;

    /// Current scroll offset.
    fn scroll_offset(&self, node: NodeId) -> Point;

    // --- Style ---

    /// Computed style, reflecting inline overrides.
    fn computed_style(&self, node: NodeId) -> ComputedStyle;

    /// Inline style property value.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Set an inline style property; the empty string clears it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    // --- Attributes and classes ---

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    // --- Capabilities ---

    /// Whether CSS transforms can be written to inline style.
    fn supports_transform(&self) -> bool {
        true
    }

    /// Layout bugs of this host.
    fn quirks(&self) -> HostQuirks {
        HostQuirks::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_position_parse() {
        assert_eq!(CssPosition::parse("fixed"), CssPosition::Fixed);
        assert_eq!(CssPosition::parse(" relative "), CssPosition::Relative);
        assert_eq!(CssPosition::parse("inherit"), CssPosition::Static);
        assert!(!CssPosition::Static.is_positioned());
        assert!(CssPosition::Sticky.is_positioned());
    }

    #[test]
    fn overflow_scrolls() {
        assert!(Overflow::Auto.scrolls());
        assert!(Overflow::Scroll.scrolls());
        assert!(!Overflow::Hidden.scrolls());
        let style = ComputedStyle {
            overflow_y: Overflow::Auto,
            ..ComputedStyle::default()
        };
        assert!(style.scrolls());
    }

    #[test]
    fn display_parse() {
        assert_eq!(Display::parse("none"), Display::None);
        assert_eq!(Display::parse("flex"), Display::Block);
    }
}
