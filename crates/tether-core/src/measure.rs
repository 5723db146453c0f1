#![forbid(unsafe_code)]

//! Geometry utilities over a [`Dom`] host.
//!
//! These helpers normalise cross-host differences (offset parents, scroll
//! roots, root-rect quirks) so the positioning engine can work with plain
//! rectangles.
//!
//! Parent-chain walks are iterative; they terminate at the document node or
//! at the first detached ancestor.

use crate::dom::{CssPosition, Dom, NodeId};
use crate::geometry::{Rect, Size};

/// Bounding client rect with host quirk correction.
///
/// Hosts that report `top == 0` for the root element get the root's
/// negated vertical scroll offset substituted, with the height recomputed
/// from the corrected top.
pub fn bounding_rect<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Rect {
    let rect = dom.bounding_client_rect(node);
    if dom.quirks().root_top_reported_as_zero && node == dom.root() {
        let top = -dom.scroll_offset(node).y;
        return Rect::from_edges(rect.left, top, rect.right(), rect.bottom());
    }
    rect
}

/// RAII guard forcing an element to be laid out but invisible.
///
/// Saves the inline `display` and `visibility` values, sets them to
/// `block`/`hidden`, and restores the saved values when dropped.
pub struct ForcedLayout<'a, D: Dom + ?Sized> {
    dom: &'a mut D,
    node: NodeId,
    display: Option<String>,
    visibility: Option<String>,
}

impl<'a, D: Dom + ?Sized> ForcedLayout<'a, D> {
    /// Force layout on `node` until the guard drops.
    pub fn new(dom: &'a mut D, node: NodeId) -> Self {
        let display = dom.style(node, "display");
        let visibility = dom.style(node, "visibility");
        dom.set_style(node, "display", "block");
        dom.set_style(node, "visibility", "hidden");
        Self {
            dom,
            node,
            display,
            visibility,
        }
    }

    /// Read-only access to the host while layout is forced.
    pub fn dom(&self) -> &D {
        &*self.dom
    }
}

impl<D: Dom + ?Sized> Drop for ForcedLayout<'_, D> {
    fn drop(&mut self) {
        let display = self.display.take().unwrap_or_default();
        let visibility = self.visibility.take().unwrap_or_default();
        self.dom.set_style(self.node, "display", &display);
        self.dom.set_style(self.node, "visibility", &visibility);
    }
}

/// Border box size plus margins, measured even when the element is hidden.
pub fn outer_size<D: Dom + ?Sized>(dom: &mut D, node: NodeId) -> Size {
    let guard = ForcedLayout::new(dom, node);
    let host = guard.dom();
    let margin = host.computed_style(node).margin;
    let size = host.offset_size(node);
    Size::new(
        size.width + margin.horizontal_sum(),
        size.height + margin.vertical_sum(),
    )
}

/// Nearest positioned ancestor, normalised to the root element when the
/// host reports the body or nothing.
pub fn offset_parent<D: Dom + ?Sized>(dom: &D, node: NodeId) -> NodeId {
    match dom.offset_parent(node) {
        Some(parent) if parent != dom.body() => parent,
        _ => dom.root(),
    }
}

/// Whether `node` or any ancestor below the body is `position: fixed`.
pub fn is_fixed_ancestor<D: Dom + ?Sized>(dom: &D, node: NodeId) -> bool {
    let body = dom.body();
    let mut current = Some(node);
    while let Some(n) = current {
        if n == body || n == dom.document() {
            return false;
        }
        if dom.computed_style(n).position == CssPosition::Fixed {
            return true;
        }
        current = dom.parent(n);
    }
    false
}

/// First ancestor that scrolls its content.
///
/// Reaching the document resolves to whichever of body/root currently
/// reports a scroll offset (body first). A detached node is its own scroll
/// parent.
pub fn scroll_parent<D: Dom + ?Sized>(dom: &D, node: NodeId) -> NodeId {
    let document = dom.document();
    let mut current = node;
    loop {
        let Some(parent) = dom.parent(current) else {
            return current;
        };
        if parent == document {
            let body = dom.body();
            let scroll = dom.scroll_offset(body);
            return if scroll.x != 0.0 || scroll.y != 0.0 {
                body
            } else {
                dom.root()
            };
        }
        if dom.computed_style(parent).scrolls() {
            return parent;
        }
        current = parent;
    }
}

/// Offset position and size as a rectangle.
pub fn offset_rect<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Rect {
    Rect::from_origin_size(dom.offset_position(node), dom.offset_size(node))
}

/// `node`'s rectangle expressed relative to `parent`'s.
///
/// In a fixed context the parent's rect is shifted by the scroll offset of
/// the parent's scroll container, reconciling viewport-relative fixed
/// coordinates with a scrolled frame.
pub fn relative_rect<D: Dom + ?Sized>(dom: &D, node: NodeId, parent: NodeId, fixed: bool) -> Rect {
    let element = bounding_rect(dom, node);
    let mut parent_rect = bounding_rect(dom, parent);
    if fixed {
        let scroll = dom.scroll_offset(scroll_parent(dom, parent));
        parent_rect = parent_rect.translate(scroll.x, scroll.y);
    }
    Rect::new(
        element.left - parent_rect.left,
        element.top - parent_rect.top,
        element.width,
        element.height,
    )
}
