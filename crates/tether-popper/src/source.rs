#![forbid(unsafe_code)]

//! Where the popper element comes from: an existing element or a
//! declarative description the engine builds.

use tether_core::dom::{Dom, NodeId};

use crate::error::{PopperError, PopperWarning};

/// The popper element passed to [`Popper::new`](crate::Popper::new).
#[derive(Debug, Clone, PartialEq)]
pub enum PopperSource {
    /// An element that already exists in the host.
    Element(NodeId),
    /// Build the element from a description.
    Spec(PopperSpec),
}

impl From<NodeId> for PopperSource {
    fn from(node: NodeId) -> Self {
        Self::Element(node)
    }
}

impl From<PopperSpec> for PopperSource {
    fn from(spec: PopperSpec) -> Self {
        Self::Spec(spec)
    }
}

/// Where a built popper is attached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParentSpec {
    #[default]
    Body,
    Element(NodeId),
    /// The first element is used.
    Elements(Vec<NodeId>),
    /// The first match is used.
    Selector(String),
}

/// Content of a built popper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Html(String),
    /// An element moved into the popper.
    Node(NodeId),
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Description of the arrow child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowSpec {
    pub tag_name: String,
    pub class_names: Vec<String>,
    pub attributes: Vec<String>,
}

impl Default for ArrowSpec {
    fn default() -> Self {
        Self {
            tag_name: "div".to_owned(),
            class_names: vec!["popper__arrow".to_owned()],
            attributes: vec!["x-arrow".to_owned()],
        }
    }
}

/// Description of a popper element.
///
/// Attributes are written `name` (empty value) or `name:value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopperSpec {
    pub tag_name: String,
    pub class_names: Vec<String>,
    pub attributes: Vec<String>,
    pub parent: ParentSpec,
    pub content: Content,
    pub arrow: Option<ArrowSpec>,
}

impl Default for PopperSpec {
    fn default() -> Self {
        Self {
            tag_name: "div".to_owned(),
            class_names: vec!["popper".to_owned()],
            attributes: Vec::new(),
            parent: ParentSpec::Body,
            content: Content::default(),
            arrow: Some(ArrowSpec::default()),
        }
    }
}

impl PopperSpec {
    #[must_use]
    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn parent(mut self, parent: ParentSpec) -> Self {
        self.parent = parent;
        self
    }

    #[must_use]
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_names.push(class.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    #[must_use]
    pub fn arrow(mut self, arrow: Option<ArrowSpec>) -> Self {
        self.arrow = arrow;
        self
    }

    /// Build the element and attach it.
    ///
    /// The parent is resolved before anything is created, so a failed
    /// lookup leaves the host untouched.
    pub(crate) fn materialize<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        warnings: &mut Vec<PopperWarning>,
    ) -> Result<NodeId, PopperError> {
        let parent = self.resolve_parent(dom, warnings)?;

        let popper = dom.create_element(&self.tag_name);
        decorate(dom, popper, &self.class_names, &self.attributes);
        match &self.content {
            Content::Text(text) => dom.set_text_content(popper, text),
            Content::Html(html) => dom.set_inner_html(popper, html),
            Content::Node(node) => dom.append_child(popper, *node),
        }
        if let Some(arrow) = &self.arrow {
            let node = dom.create_element(&arrow.tag_name);
            decorate(dom, node, &arrow.class_names, &arrow.attributes);
            dom.append_child(popper, node);
        }
        dom.append_child(parent, popper);
        Ok(popper)
    }

    fn resolve_parent<D: Dom + ?Sized>(
        &self,
        dom: &D,
        warnings: &mut Vec<PopperWarning>,
    ) -> Result<NodeId, PopperError> {
        match &self.parent {
            ParentSpec::Body => Ok(dom.body()),
            ParentSpec::Element(node) => live(dom, Some(*node)),
            ParentSpec::Elements(nodes) => {
                if nodes.len() > 1 {
                    warnings.push(PopperWarning::ParentListAmbiguous { len: nodes.len() });
                }
                live(dom, nodes.first().copied())
            }
            ParentSpec::Selector(selector) => {
                let matches = dom.query_selector_all(None, selector);
                if matches.len() > 1 {
                    warnings.push(PopperWarning::ParentSelectorAmbiguous {
                        selector: selector.clone(),
                        matches: matches.len(),
                    });
                }
                matches
                    .first()
                    .copied()
                    .ok_or_else(|| PopperError::ParentNotFound {
                        selector: selector.clone(),
                    })
            }
        }
    }
}

/// An explicitly given parent must still be in the host.
fn live<D: Dom + ?Sized>(dom: &D, node: Option<NodeId>) -> Result<NodeId, PopperError> {
    node.filter(|&node| dom.exists(node))
        .ok_or(PopperError::ParentNotFound {
            selector: String::new(),
        })
}

fn decorate<D: Dom + ?Sized>(dom: &mut D, node: NodeId, classes: &[String], attributes: &[String]) {
    for class in classes {
        dom.add_class(node, class);
    }
    for attribute in attributes {
        let (name, value) = attribute.split_once(':').unwrap_or((attribute.as_str(), ""));
        dom.set_attribute(node, name, value);
    }
}
