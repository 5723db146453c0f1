#![forbid(unsafe_code)]

//! The per-update working record threaded through the modifier pipeline.

use std::collections::BTreeMap;
use std::fmt;

use tether_core::dom::NodeId;
use tether_core::geometry::{Axis, Rect};

use crate::placement::Placement;

/// CSS positioning scheme of the popper, frozen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionScheme {
    #[default]
    Absolute,
    Fixed,
}

impl PositionScheme {
    /// CSS keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
        }
    }
}

/// A style value as written to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// Pixel length, written as `<n>px`.
    Px(f64),
    /// Verbatim text.
    Text(String),
    /// Clears the inline property.
    Unset,
}

impl StyleValue {
    /// Verbatim text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Text(s) => f.write_str(s),
            Self::Unset => Ok(()),
        }
    }
}

/// Inline style properties keyed by CSS name.
pub type StyleMap = BTreeMap<String, StyleValue>;

/// Popper rectangle plus positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopperOffsets {
    pub rect: Rect,
    pub position: PositionScheme,
}

/// Arrow position along the popper's cross axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowOffsets {
    /// `Horizontal` positions the arrow with `left`, `Vertical` with `top`.
    pub axis: Axis,
    pub offset: f64,
}

impl ArrowOffsets {
    /// Inline styles for the arrow element. The unused coordinate is cleared.
    #[must_use]
    pub fn styles(&self) -> [(&'static str, StyleValue); 2] {
        match self.axis {
            Axis::Horizontal => [("left", StyleValue::Px(self.offset)), ("top", StyleValue::Unset)],
            Axis::Vertical => [("top", StyleValue::Px(self.offset)), ("left", StyleValue::Unset)],
        }
    }
}

/// Popper, reference and arrow geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offsets {
    pub popper: PopperOffsets,
    pub reference: Rect,
    pub arrow: Option<ArrowOffsets>,
}

/// State of one update cycle.
///
/// `placement` may be rewritten by modifiers (`flip`); the original placement
/// is fixed when the record is created.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetData {
    pub placement: Placement,
    original_placement: Placement,
    pub flipped: bool,
    pub offsets: Offsets,
    pub boundaries: Rect,
    pub styles: StyleMap,
    pub arrow_element: Option<NodeId>,
}

impl OffsetData {
    /// Start a cycle at `placement`.
    #[must_use]
    pub fn new(placement: Placement, offsets: Offsets, boundaries: Rect) -> Self {
        Self {
            placement,
            original_placement: placement,
            flipped: false,
            offsets,
            boundaries,
            styles: StyleMap::new(),
            arrow_element: None,
        }
    }

    /// The placement the cycle started with.
    #[must_use]
    pub const fn original_placement(&self) -> Placement {
        self.original_placement
    }

    /// Shorthand for the popper rectangle.
    #[must_use]
    pub const fn popper(&self) -> Rect {
        self.offsets.popper.rect
    }

    /// Shorthand for the reference rectangle.
    #[must_use]
    pub const fn reference(&self) -> Rect {
        self.offsets.reference
    }
}
