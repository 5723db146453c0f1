#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! [`PopperOptions::default`] holds the stock configuration; builder methods
//! override individual fields.
//!
//! | option | default |
//! |---|---|
//! | placement | `bottom` |
//! | gpu acceleration | on |
//! | offset | 0 |
//! | boundaries | viewport, padding 5 |
//! | prevent-overflow order | left, right, top, bottom |
//! | flip behavior | mirror once |
//! | arrow element | `[x-arrow]` inside the popper |
//! | modifiers | shift, offset, preventOverflow, keepTogether, arrow, flip, applyStyle |

use smallvec::{SmallVec, smallvec};
use tether_core::dom::NodeId;

use crate::modifier::{Modifier, default_modifiers};
use crate::placement::{Placement, Side};

/// Rectangle the popper is kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundariesElement {
    /// The whole scrollable document.
    Window,
    /// The visible viewport.
    #[default]
    Viewport,
    /// A specific element.
    Element(NodeId),
}

/// Placements tried by `flip`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlipBehavior {
    /// Try the mirror side once.
    #[default]
    Flip,
    /// Walk an explicit list of sides.
    Order(SmallVec<[Side; 4]>),
}

impl FlipBehavior {
    /// The sides to walk starting from `side`.
    #[must_use]
    pub fn order(&self, side: Side) -> SmallVec<[Side; 4]> {
        match self {
            Self::Flip => smallvec![side, side.opposite()],
            Self::Order(order) => order.clone(),
        }
    }
}

/// How the arrow element is located.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrowElement {
    /// First match of a selector inside the popper.
    Selector(String),
    /// A specific element.
    Element(NodeId),
}

impl Default for ArrowElement {
    fn default() -> Self {
        Self::Selector("[x-arrow]".to_owned())
    }
}

/// Engine options.
#[derive(Debug, Clone)]
pub struct PopperOptions {
    pub placement: Placement,
    pub gpu_acceleration: bool,
    /// Cross-axis translation in pixels.
    pub offset: f64,
    pub boundaries_element: BoundariesElement,
    pub boundaries_padding: f64,
    pub prevent_overflow_order: SmallVec<[Side; 4]>,
    pub flip_behavior: FlipBehavior,
    pub arrow_element: ArrowElement,
    /// Fixed arrow position; 0 centers the arrow on the reference.
    pub arrow_offset: f64,
    pub modifiers: Vec<Modifier>,
    /// Modifier names dropped from `modifiers`.
    pub modifiers_ignored: Vec<String>,
    pub remove_on_destroy: bool,
    pub force_absolute: bool,
}

impl Default for PopperOptions {
    fn default() -> Self {
        Self {
            placement: Placement::BOTTOM,
            gpu_acceleration: true,
            offset: 0.0,
            boundaries_element: BoundariesElement::Viewport,
            boundaries_padding: 5.0,
            prevent_overflow_order: smallvec![Side::Left, Side::Right, Side::Top, Side::Bottom],
            flip_behavior: FlipBehavior::Flip,
            arrow_element: ArrowElement::default(),
            arrow_offset: 0.0,
            modifiers: default_modifiers(),
            modifiers_ignored: Vec::new(),
            remove_on_destroy: false,
            force_absolute: false,
        }
    }
}

impl PopperOptions {
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn gpu_acceleration(mut self, enabled: bool) -> Self {
        self.gpu_acceleration = enabled;
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn boundaries_element(mut self, boundaries: BoundariesElement) -> Self {
        self.boundaries_element = boundaries;
        self
    }

    #[must_use]
    pub fn boundaries_padding(mut self, padding: f64) -> Self {
        self.boundaries_padding = padding;
        self
    }

    #[must_use]
    pub fn prevent_overflow_order(mut self, order: impl IntoIterator<Item = Side>) -> Self {
        self.prevent_overflow_order = order.into_iter().collect();
        self
    }

    #[must_use]
    pub fn flip_behavior(mut self, behavior: FlipBehavior) -> Self {
        self.flip_behavior = behavior;
        self
    }

    #[must_use]
    pub fn arrow_element(mut self, arrow: ArrowElement) -> Self {
        self.arrow_element = arrow;
        self
    }

    #[must_use]
    pub fn arrow_offset(mut self, offset: f64) -> Self {
        self.arrow_offset = offset;
        self
    }

    /// Replace the modifier list.
    #[must_use]
    pub fn modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Append a modifier to the end of the list.
    #[must_use]
    pub fn with_modifier(mut self, modifier: impl Into<Modifier>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    /// Drop a modifier by name.
    #[must_use]
    pub fn ignore_modifier(mut self, name: impl Into<String>) -> Self {
        self.modifiers_ignored.push(name.into());
        self
    }

    #[must_use]
    pub fn remove_on_destroy(mut self, remove: bool) -> Self {
        self.remove_on_destroy = remove;
        self
    }

    #[must_use]
    pub fn force_absolute(mut self, force: bool) -> Self {
        self.force_absolute = force;
        self
    }

    /// The modifier list with ignored names removed.
    #[must_use]
    pub fn active_modifiers(&self) -> Vec<Modifier> {
        self.modifiers
            .iter()
            .filter(|m| !self.modifiers_ignored.iter().any(|name| name == m.name()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::BuiltinModifier;

    #[test]
    fn defaults() {
        let options = PopperOptions::default();
        assert_eq!(options.placement, Placement::BOTTOM);
        assert!(options.gpu_acceleration);
        assert_eq!(options.boundaries_padding, 5.0);
        assert_eq!(options.boundaries_element, BoundariesElement::Viewport);
        assert_eq!(
            options.prevent_overflow_order.as_slice(),
            &[Side::Left, Side::Right, Side::Top, Side::Bottom]
        );
        assert_eq!(
            options.arrow_element,
            ArrowElement::Selector("[x-arrow]".into())
        );
        let names: Vec<_> = options.modifiers.iter().map(Modifier::name).collect();
        assert_eq!(
            names,
            [
                "shift",
                "offset",
                "preventOverflow",
                "keepTogether",
                "arrow",
                "flip",
                "applyStyle"
            ]
        );
    }

    #[test]
    fn ignored_modifiers_are_filtered() {
        let options = PopperOptions::default()
            .ignore_modifier("applyStyle")
            .with_modifier(Modifier::custom("noop", |d, _| d))
            .ignore_modifier("noop");
        let active = options.active_modifiers();
        assert_eq!(active.len(), 6);
        assert!(active.iter().all(|m| m.builtin() != Some(BuiltinModifier::ApplyStyle)));
        assert!(active.iter().all(|m| m.name() != "noop"));
    }

    #[test]
    fn flip_order() {
        assert_eq!(
            FlipBehavior::Flip.order(Side::Left).as_slice(),
            &[Side::Left, Side::Right]
        );
        let order = FlipBehavior::Order(smallvec![Side::Top, Side::Right, Side::Bottom]);
        assert_eq!(order.order(Side::Left).len(), 3);
    }
}
