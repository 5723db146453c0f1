#![forbid(unsafe_code)]

//! In-memory [`Dom`] implementation for tests and headless layout.
//!
//! Layout is not computed: callers assign each element's viewport-relative
//! border box with [`MemoryDom::set_rect`] (or [`MemoryDom::element`]) and the
//! host answers geometry queries from those boxes. Style, attributes,
//! classes and tree structure behave like a browser's for the subset the
//! engine uses.
//!
//! # Example
//!
//! ```ignore
//! use tether_core::geometry::{Rect, Size};
//! use tether_core::memory_dom::MemoryDom;
//! use tether_core::dom::Dom;
//!
//! let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
//! let body = dom.body();
//! let button = dom.element(body, "button", Rect::new(10.0, 10.0, 80.0, 24.0));
//! assert_eq!(dom.bounding_client_rect(button).right(), 90.0);
//! ```

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::dom::{
    ComputedStyle, CssPosition, Display, Dom, HostQuirks, NodeId, NodeList, Overflow,
};
use crate::geometry::{Point, Rect, Sides, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Document,
    Element,
    Fragment,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: AHashMap<String, String>,
    classes: SmallVec<[String; 4]>,
    inline: AHashMap<String, String>,
    base_style: ComputedStyle,
    rect: Rect,
    client_size: Option<Size>,
    scroll_size: Option<Size>,
    scroll: Point,
    text: String,
    html: String,
}

impl NodeData {
    fn new(kind: NodeKind, tag: &str) -> Self {
        Self {
            kind,
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            attributes: AHashMap::new(),
            classes: SmallVec::new(),
            inline: AHashMap::new(),
            base_style: ComputedStyle::default(),
            rect: Rect::ZERO,
            client_size: None,
            scroll_size: None,
            scroll: Point::ZERO,
            text: String::new(),
            html: String::new(),
        }
    }
}

/// A browser-like element tree held in memory.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    viewport: Size,
    quirks: HostQuirks,
    transforms: bool,
}

const DOCUMENT: NodeId = NodeId::new(0);
const ROOT: NodeId = NodeId::new(1);
const BODY: NodeId = NodeId::new(2);

impl MemoryDom {
    /// Create a document whose root and body span `viewport`.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        let mut dom = Self {
            nodes: Vec::with_capacity(16),
            viewport,
            quirks: HostQuirks::default(),
            transforms: true,
        };
        dom.push(NodeData::new(NodeKind::Document, "#document"));
        let root = dom.push(NodeData::new(NodeKind::Element, "html"));
        let body = dom.push(NodeData::new(NodeKind::Element, "body"));
        dom.link(DOCUMENT, root);
        dom.link(root, body);
        let full = Rect::from_origin_size(Point::ZERO, viewport);
        dom.nodes[ROOT.index() as usize].rect = full;
        dom.nodes[ROOT.index() as usize].client_size = Some(viewport);
        dom.nodes[BODY.index() as usize].rect = full;
        dom
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index() as usize].parent = Some(parent);
        self.nodes[parent.index() as usize].children.push(child);
    }

    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.index() as usize)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.index() as usize)
    }

    // --- Test setup ---

    /// Create an element under `parent` with the given viewport-relative box.
    pub fn element(&mut self, parent: NodeId, tag: &str, rect: Rect) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        self.set_rect(node, rect);
        node
    }

    /// Create a detached document fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeData::new(NodeKind::Fragment, "#document-fragment"))
    }

    /// Assign the element's viewport-relative border box.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(data) = self.node_mut(node) {
            data.rect = rect;
        }
    }

    /// Set the stylesheet `position` (inline style still wins).
    pub fn set_position(&mut self, node: NodeId, position: CssPosition) {
        if let Some(data) = self.node_mut(node) {
            data.base_style.position = position;
        }
    }

    /// Set the stylesheet `display` (inline style still wins).
    pub fn set_display(&mut self, node: NodeId, display: Display) {
        if let Some(data) = self.node_mut(node) {
            data.base_style.display = display;
        }
    }

    /// Set `overflow` on both axes.
    pub fn set_overflow(&mut self, node: NodeId, overflow: Overflow) {
        if let Some(data) = self.node_mut(node) {
            data.base_style.overflow = overflow;
            data.base_style.overflow_x = overflow;
            data.base_style.overflow_y = overflow;
        }
    }

    /// Set only `overflow-y`.
    pub fn set_overflow_y(&mut self, node: NodeId, overflow: Overflow) {
        if let Some(data) = self.node_mut(node) {
            data.base_style.overflow_y = overflow;
        }
    }

    /// Set computed margins.
    pub fn set_margin(&mut self, node: NodeId, margin: Sides) {
        if let Some(data) = self.node_mut(node) {
            data.base_style.margin = margin;
        }
    }

    /// Set the scroll offset.
    pub fn set_scroll_offset(&mut self, node: NodeId, offset: Point) {
        if let Some(data) = self.node_mut(node) {
            data.scroll = offset;
        }
    }

    /// Override the padding box size (defaults to the border box size).
    pub fn set_client_size(&mut self, node: NodeId, size: Size) {
        if let Some(data) = self.node_mut(node) {
            data.client_size = Some(size);
        }
    }

    /// Override the scrollable content size (defaults to the client size).
    pub fn set_scroll_size(&mut self, node: NodeId, size: Size) {
        if let Some(data) = self.node_mut(node) {
            data.scroll_size = Some(size);
        }
    }

    /// Simulate host layout bugs.
    pub fn set_quirks(&mut self, quirks: HostQuirks) {
        self.quirks = quirks;
    }

    /// Toggle CSS transform support.
    pub fn set_supports_transform(&mut self, supported: bool) {
        self.transforms = supported;
    }

    // --- Inspection ---

    /// Viewport size given at construction.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    /// Child elements in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[] as &[NodeId], |n| n.children.as_slice())
    }

    /// Class list in insertion order.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.node(node)
            .map(|n| n.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Text assigned through [`Dom::set_text_content`].
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> &str {
        self.node(node).map_or("", |n| n.text.as_str())
    }

    /// Markup assigned through [`Dom::set_inner_html`].
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> &str {
        self.node(node).map_or("", |n| n.html.as_str())
    }

    fn effective_display(&self, data: &NodeData) -> Display {
        match data.inline.get("display") {
            Some(value) if !value.is_empty() => Display::parse(value),
            _ => data.base_style.display,
        }
    }

    fn effective_position(&self, data: &NodeData) -> CssPosition {
        match data.inline.get("position") {
            Some(value) if !value.is_empty() => CssPosition::parse(value),
            _ => data.base_style.position,
        }
    }

    fn is_rendered(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            let Some(data) = self.node(n) else {
                return false;
            };
            if data.kind == NodeKind::Element && self.effective_display(data) == Display::None {
                return false;
            }
            current = data.parent;
        }
        true
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == DOCUMENT {
                return true;
            }
            current = self.node(n).and_then(|d| d.parent);
        }
        false
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        if let Some(data) = self.node(scope) {
            for &child in &data.children {
                out.push(child);
                self.descendants(child, out);
            }
        }
    }

    fn matches(&self, node: NodeId, selector: &SimpleSelector) -> bool {
        let Some(data) = self.node(node) else {
            return false;
        };
        if data.kind != NodeKind::Element {
            return false;
        }
        if let Some(tag) = &selector.tag
            && !data.tag.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &selector.id
            && data.attributes.get("id") != Some(id)
        {
            return false;
        }
        if !selector
            .classes
            .iter()
            .all(|c| data.classes.iter().any(|own| own == c))
        {
            return false;
        }
        selector.attributes.iter().all(|(name, value)| {
            match (data.attributes.get(name.as_str()), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

impl Dom for MemoryDom {
    fn document(&self) -> NodeId {
        DOCUMENT
    }

    fn root(&self) -> NodeId {
        ROOT
    }

    fn body(&self) -> NodeId {
        BODY
    }

    fn exists(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn is_fragment(&self, node: NodeId) -> bool {
        self.node(node)
            .is_some_and(|n| n.kind == NodeKind::Fragment)
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::new(NodeKind::Element, tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.exists(parent) || !self.exists(child) || parent == child {
            return;
        }
        self.detach(child);
        self.link(parent, child);
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(data) = self.node_mut(parent) {
            data.children.retain(|&c| c != node);
        }
        if let Some(data) = self.node_mut(node) {
            data.parent = None;
        }
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        let children = self.children(node).to_vec();
        for child in children {
            self.detach(child);
        }
        if let Some(data) = self.node_mut(node) {
            data.text = text.to_owned();
            data.html.clear();
        }
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        let children = self.children(node).to_vec();
        for child in children {
            self.detach(child);
        }
        if let Some(data) = self.node_mut(node) {
            data.html = html.to_owned();
            data.text.clear();
        }
    }

    fn query_selector_all(&self, scope: Option<NodeId>, selector: &str) -> NodeList {
        let Some(selector) = SimpleSelector::parse(selector) else {
            return NodeList::new();
        };
        let mut all = Vec::new();
        self.descendants(scope.unwrap_or(DOCUMENT), &mut all);
        all.into_iter()
            .filter(|&n| self.matches(n, &selector))
            .collect()
    }

    fn bounding_client_rect(&self, node: NodeId) -> Rect {
        match self.node(node) {
            Some(data) if data.kind == NodeKind::Element && self.is_rendered(node) => data.rect,
            _ => Rect::ZERO,
        }
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        if node == DOCUMENT || node == ROOT || node == BODY || !self.is_attached(node) {
            return None;
        }
        let data = self.node(node)?;
        if self.effective_position(data) == CssPosition::Fixed {
            return None;
        }
        let mut current = data.parent;
        while let Some(p) = current {
            if p == BODY || p == ROOT || p == DOCUMENT {
                return Some(BODY);
            }
            let parent = self.node(p)?;
            if self.effective_position(parent).is_positioned() {
                return Some(p);
            }
            current = parent.parent;
        }
        None
    }

    fn offset_position(&self, node: NodeId) -> Point {
        let rect = self.bounding_client_rect(node);
        match self.offset_parent(node) {
            Some(parent) => {
                let parent_rect = self.bounding_client_rect(parent);
                let scroll = self.scroll_offset(parent);
                Point::new(
                    rect.left - parent_rect.left + scroll.x,
                    rect.top - parent_rect.top + scroll.y,
                )
            }
            None => rect.origin(),
        }
    }

    fn offset_size(&self, node: NodeId) -> Size {
        self.bounding_client_rect(node).size()
    }

    fn client_size(&self, node: NodeId) -> Size {
        match self.node(node) {
            Some(data) => data
                .client_size
                .unwrap_or_else(|| self.bounding_client_rect(node).size()),
            None => Size::ZERO,
        }
    }

    fn scroll_size(&self, node: NodeId) -> Size {
        match self.node(node) {
            Some(data) => data.scroll_size.unwrap_or_else(|| self.client_size(node)),
            None => Size::ZERO,
        }
    }

    fn scroll_offset(&self, node: NodeId) -> Point {
        self.node(node).map_or(Point::ZERO, |n| n.scroll)
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        match self.node(node) {
            Some(data) => ComputedStyle {
                position: self.effective_position(data),
                display: self.effective_display(data),
                ..data.base_style
            },
            None => ComputedStyle::default(),
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node)
            .and_then(|n| n.inline.get(property))
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            if value.is_empty() {
                data.inline.remove(property);
            } else {
                data.inline.insert(property.to_owned(), value.to_owned());
            }
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).and_then(|n| n.attributes.get(name)).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            if name == "class" {
                data.classes = value.split_whitespace().map(str::to_owned).collect();
            }
            data.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.node_mut(node) {
            data.attributes.remove(name);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if class.is_empty() || self.has_class(node, class) {
            return;
        }
        if let Some(data) = self.node_mut(node) {
            data.classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.node_mut(node) {
            data.classes.retain(|c| c != class);
        }
    }

    fn supports_transform(&self) -> bool {
        self.transforms
    }

    fn quirks(&self) -> HostQuirks {
        self.quirks
    }
}

/// A compound selector: `tag#id.class[attr][attr=value]`.
#[derive(Debug, Default)]
struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl SimpleSelector {
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.contains([' ', ',', '>', '+', '~']) {
            return None;
        }
        let mut selector = Self::default();
        let mut rest = input;

        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            let tag = &rest[..tag_end];
            if tag != "*" {
                selector.tag = Some(tag.to_owned());
            }
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    let name = &body[..end];
                    if name.is_empty() {
                        return None;
                    }
                    if first == '#' {
                        selector.id = Some(name.to_owned());
                    } else {
                        selector.classes.push(name.to_owned());
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    let inner = &rest[1..close];
                    let (name, value) = match inner.split_once('=') {
                        Some((n, v)) => (
                            n.trim(),
                            Some(v.trim().trim_matches(['"', '\'']).to_owned()),
                        ),
                        None => (inner.trim(), None),
                    };
                    if name.is_empty() {
                        return None;
                    }
                    selector.attributes.push((name.to_owned(), value));
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }
        Some(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom() -> MemoryDom {
        MemoryDom::new(Size::new(1024.0, 768.0))
    }

    #[test]
    fn skeleton_structure() {
        let dom = dom();
        assert_eq!(dom.parent(dom.root()), Some(dom.document()));
        assert_eq!(dom.parent(dom.body()), Some(dom.root()));
        assert_eq!(dom.client_size(dom.root()), Size::new(1024.0, 768.0));
    }

    #[test]
    fn append_moves_between_parents() {
        let mut dom = dom();
        let body = dom.body();
        let a = dom.element(body, "div", Rect::ZERO);
        let b = dom.element(body, "div", Rect::ZERO);
        let child = dom.element(a, "span", Rect::ZERO);
        dom.append_child(b, child);
        assert_eq!(dom.parent(child), Some(b));
        assert!(dom.children(a).is_empty());
        assert_eq!(dom.children(b), &[child]);
    }

    #[test]
    fn hidden_elements_measure_zero() {
        let mut dom = dom();
        let body = dom.body();
        let node = dom.element(body, "div", Rect::new(0.0, 0.0, 40.0, 20.0));
        dom.set_style(node, "display", "none");
        assert_eq!(dom.offset_size(node), Size::ZERO);
        dom.set_style(node, "display", "block");
        assert_eq!(dom.offset_size(node), Size::new(40.0, 20.0));
    }

    #[test]
    fn inline_position_overrides_stylesheet() {
        let mut dom = dom();
        let body = dom.body();
        let node = dom.element(body, "div", Rect::ZERO);
        dom.set_position(node, CssPosition::Relative);
        dom.set_style(node, "position", "fixed");
        assert_eq!(dom.computed_style(node).position, CssPosition::Fixed);
        dom.set_style(node, "position", "");
        assert_eq!(dom.computed_style(node).position, CssPosition::Relative);
    }

    #[test]
    fn offset_parent_is_nearest_positioned_ancestor() {
        let mut dom = dom();
        let body = dom.body();
        let outer = dom.element(body, "div", Rect::new(100.0, 100.0, 300.0, 300.0));
        dom.set_position(outer, CssPosition::Relative);
        let inner = dom.element(outer, "div", Rect::new(110.0, 120.0, 10.0, 10.0));
        assert_eq!(dom.offset_parent(inner), Some(outer));
        assert_eq!(dom.offset_position(inner), Point::new(10.0, 20.0));
        assert_eq!(dom.offset_parent(outer), Some(body));
    }

    #[test]
    fn fixed_elements_have_no_offset_parent() {
        let mut dom = dom();
        let body = dom.body();
        let node = dom.element(body, "div", Rect::ZERO);
        dom.set_position(node, CssPosition::Fixed);
        assert_eq!(dom.offset_parent(node), None);
    }

    #[test]
    fn selectors_match_compound_forms() {
        let mut dom = dom();
        let body = dom.body();
        let a = dom.element(body, "div", Rect::ZERO);
        dom.set_attribute(a, "class", "popper dark");
        dom.set_attribute(a, "id", "tip");
        let arrow = dom.element(a, "div", Rect::ZERO);
        dom.set_attribute(arrow, "x-arrow", "");

        assert_eq!(dom.query_selector(None, "#tip"), Some(a));
        assert_eq!(dom.query_selector(None, "div.popper.dark"), Some(a));
        assert_eq!(dom.query_selector(Some(a), "[x-arrow]"), Some(arrow));
        assert_eq!(dom.query_selector(None, "[id=tip]"), Some(a));
        assert_eq!(dom.query_selector_all(None, "div").len(), 2);
        assert!(dom.query_selector_all(None, "span").is_empty());
        assert!(dom.query_selector_all(None, "div span").is_empty());
    }

    #[test]
    fn class_list_operations() {
        let mut dom = dom();
        let body = dom.body();
        let node = dom.element(body, "div", Rect::ZERO);
        dom.add_class(node, "a");
        dom.add_class(node, "b");
        dom.add_class(node, "a");
        assert_eq!(dom.classes(node), vec!["a", "b"]);
        dom.remove_class(node, "a");
        assert!(!dom.has_class(node, "a"));
        assert!(dom.has_class(node, "b"));
    }

    #[test]
    fn contains_walks_ancestors() {
        let mut dom = dom();
        let body = dom.body();
        let a = dom.element(body, "div", Rect::ZERO);
        let b = dom.element(a, "div", Rect::ZERO);
        assert!(dom.contains(a, b));
        assert!(dom.contains(b, b));
        assert!(!dom.contains(b, a));
    }

    #[test]
    fn text_content_replaces_children() {
        let mut dom = dom();
        let body = dom.body();
        let a = dom.element(body, "div", Rect::ZERO);
        let child = dom.element(a, "span", Rect::ZERO);
        dom.set_text_content(a, "hello");
        assert_eq!(dom.text_content(a), "hello");
        assert_eq!(dom.parent(child), None);
    }
}
