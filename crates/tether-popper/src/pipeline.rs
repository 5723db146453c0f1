#![forbid(unsafe_code)]

//! Offset computation, boundaries and the built-in modifiers.
//!
//! A [`Pipeline`] borrows the engine's configuration for one update cycle.
//! Geometry-only modifiers are free functions over [`OffsetData`]; the ones
//! that touch the host (`arrow`, `flip`, `applyStyle`) are methods.
//!
//! # Invariants
//!
//! - `original_placement` is never written after the cycle starts.
//! - `flip` re-runs only the modifiers listed before it, so it never
//!   re-enters itself.
//! - After `preventOverflow` the popper's trailing edge on the last axis in
//!   the configured order lies inside the boundaries whenever the popper
//!   fits on that axis.

use tether_core::dom::{Dom, NodeId};
use tether_core::geometry::{Point, Rect, Sides};
use tether_core::measure;

use crate::data::{
    ArrowOffsets, OffsetData, Offsets, PopperOffsets, PositionScheme, StyleMap, StyleValue,
};
use crate::error::PopperWarning;
use crate::modifier::{BuiltinModifier, Modifier, is_required};
use crate::options::{ArrowElement, BoundariesElement, PopperOptions};
use crate::placement::{Alignment, Placement, Side};

/// Minimum distance between the arrow and the popper's edges.
const ARROW_EDGE_GAP: f64 = 8.0;

/// One update cycle's view of the engine.
pub(crate) struct Pipeline<'a> {
    pub reference: NodeId,
    pub popper: NodeId,
    pub position: PositionScheme,
    pub options: &'a PopperOptions,
    pub modifiers: &'a [Modifier],
}

impl Pipeline<'_> {
    fn is_fixed(&self) -> bool {
        self.position == PositionScheme::Fixed
    }

    /// Raw popper and reference offsets for `placement`'s side.
    pub fn offsets<D: Dom + ?Sized>(&self, dom: &mut D, placement: Placement) -> Offsets {
        let parent = measure::offset_parent(dom, self.popper);
        let reference = measure::relative_rect(dom, self.reference, parent, self.is_fixed());
        let size = measure::outer_size(dom, self.popper);

        let rect = match placement.side {
            Side::Left | Side::Right => {
                let top = reference.top + reference.height / 2.0 - size.height / 2.0;
                let left = if placement.side == Side::Left {
                    reference.left - size.width
                } else {
                    reference.right()
                };
                Rect::new(left, top, size.width, size.height)
            }
            Side::Top | Side::Bottom => {
                let left = reference.left + reference.width / 2.0 - size.width / 2.0;
                let top = if placement.side == Side::Top {
                    reference.top - size.height
                } else {
                    reference.bottom()
                };
                Rect::new(left, top, size.width, size.height)
            }
        };

        Offsets {
            popper: PopperOffsets {
                rect,
                position: self.position,
            },
            reference,
            arrow: None,
        }
    }

    /// The rectangle the popper is kept in, inset by the padding.
    pub fn boundaries<D: Dom + ?Sized>(&self, dom: &D) -> Rect {
        let rect = match self.options.boundaries_element {
            BoundariesElement::Window => {
                let body = dom.body();
                let root = dom.root();
                let sizes = [
                    dom.scroll_size(body),
                    dom.offset_size(body),
                    dom.client_size(root),
                    dom.scroll_size(root),
                    dom.offset_size(root),
                ];
                let width = sizes.iter().map(|s| s.width).fold(0.0, f64::max);
                let height = sizes.iter().map(|s| s.height).fold(0.0, f64::max);
                Rect::new(0.0, 0.0, width, height)
            }
            BoundariesElement::Viewport => {
                let offset_parent = measure::offset_parent(dom, self.popper);
                let parent_rect = measure::offset_rect(dom, offset_parent);
                let scroll = if self.is_fixed() {
                    Point::ZERO
                } else {
                    scroll_value(dom, measure::scroll_parent(dom, self.popper))
                };
                let client = dom.client_size(dom.root());
                let left = parent_rect.left - scroll.x;
                let top = parent_rect.top - scroll.y;
                Rect::from_edges(-left, -top, client.width - left, client.height - top)
            }
            BoundariesElement::Element(node) => {
                if measure::offset_parent(dom, self.popper) == node {
                    let client = dom.client_size(node);
                    Rect::new(0.0, 0.0, client.width, client.height)
                } else {
                    measure::offset_rect(dom, node)
                }
            }
        };
        rect.inset(Sides::all(self.options.boundaries_padding))
    }

    /// Run `modifiers[..end]` over `data`.
    pub fn run<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        mut data: OffsetData,
        end: usize,
        warnings: &mut Vec<PopperWarning>,
    ) -> OffsetData {
        for (index, modifier) in self.modifiers[..end].iter().enumerate() {
            data = match modifier {
                Modifier::Builtin(builtin) => match builtin {
                    BuiltinModifier::Shift => shift(data),
                    BuiltinModifier::Offset => offset(data, self.options.offset),
                    BuiltinModifier::PreventOverflow => {
                        prevent_overflow(data, &self.options.prevent_overflow_order)
                    }
                    BuiltinModifier::KeepTogether => keep_together(data),
                    BuiltinModifier::Arrow => self.arrow(dom, data, warnings),
                    BuiltinModifier::Flip => self.flip(dom, data, index, warnings),
                    BuiltinModifier::ApplyStyle => self.apply_style(dom, data),
                },
                Modifier::Custom(custom) => custom.apply(data, self.options),
            };
            tracing::trace!(
                modifier = modifier.name(),
                placement = %data.placement,
                left = data.popper().left,
                top = data.popper().top,
                "modifier applied"
            );
        }
        data
    }

    fn requires(&self, requesting: BuiltinModifier, requested: BuiltinModifier) -> bool {
        is_required(self.modifiers, requesting, requested)
    }

    fn arrow<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        mut data: OffsetData,
        warnings: &mut Vec<PopperWarning>,
    ) -> OffsetData {
        if !self.requires(BuiltinModifier::Arrow, BuiltinModifier::KeepTogether) {
            warnings.push(PopperWarning::MissingDependency {
                modifier: BuiltinModifier::Arrow,
                requires: BuiltinModifier::KeepTogether,
            });
            return data;
        }

        let arrow = match &self.options.arrow_element {
            ArrowElement::Selector(selector) => dom.query_selector(Some(self.popper), selector),
            ArrowElement::Element(node) => dom.exists(*node).then_some(*node),
        };
        let Some(arrow) = arrow else {
            return data;
        };
        if !dom.contains(self.popper, arrow) {
            warnings.push(PopperWarning::ArrowOutsidePopper);
            return data;
        }

        let axis = data.placement.side.cross_axis();
        let arrow_size = measure::outer_size(dom, arrow).along(axis);
        let reference = data.reference();
        let mut popper = data.popper();

        // Keep enough overlap for the arrow to reach the reference.
        if reference.end(axis) - arrow_size < popper.start(axis) {
            popper.set_start(axis, reference.end(axis) - arrow_size);
        }
        if reference.start(axis) + arrow_size > popper.end(axis) {
            let shift = reference.start(axis) + arrow_size - popper.end(axis);
            popper.set_start(axis, popper.start(axis) + shift);
        }
        data.offsets.popper.rect = popper;

        let centering = if self.options.arrow_offset != 0.0 {
            self.options.arrow_offset
        } else {
            reference.len(axis) / 2.0 - arrow_size / 2.0
        };
        let center = reference.start(axis) + centering;
        let offset = (center - popper.start(axis))
            .min(popper.len(axis) - arrow_size - ARROW_EDGE_GAP)
            .max(ARROW_EDGE_GAP);

        data.arrow_element = Some(arrow);
        data.offsets.arrow = Some(ArrowOffsets { axis, offset });
        data
    }

    fn flip<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        mut data: OffsetData,
        index: usize,
        warnings: &mut Vec<PopperWarning>,
    ) -> OffsetData {
        if !self.requires(BuiltinModifier::Flip, BuiltinModifier::PreventOverflow) {
            warnings.push(PopperWarning::MissingDependency {
                modifier: BuiltinModifier::Flip,
                requires: BuiltinModifier::PreventOverflow,
            });
            return data;
        }
        if data.flipped && data.placement == data.original_placement() {
            return data;
        }

        let order = self.options.flip_behavior.order(data.placement.side);
        let alignment = data.placement.alignment;
        for (step, &side) in order.iter().enumerate() {
            let Some(&next) = order.get(step + 1) else {
                break;
            };
            if data.placement.side != side {
                continue;
            }
            let popper = data.popper();
            let reference = data.reference();
            let anchor = side.edge_of(&reference).floor();
            let far_edge = side.opposite().edge_of(&popper).floor();
            let pushed_over = if side.is_trailing() {
                anchor > far_edge
            } else {
                anchor < far_edge
            };
            if !pushed_over {
                continue;
            }

            tracing::debug!(from = %data.placement, to = %next, "popper flipped");
            data.flipped = true;
            data.placement = Placement::new(next, alignment);
            data.offsets.popper = self.offsets(dom, data.placement).popper;
            data = self.run(dom, data, index, warnings);
        }
        data
    }

    fn apply_style<D: Dom + ?Sized>(&self, dom: &mut D, mut data: OffsetData) -> OffsetData {
        let rect = data.popper();
        let left = round_half_up(rect.left);
        let top = round_half_up(rect.top);

        let mut styles = StyleMap::new();
        styles.insert(
            "position".to_owned(),
            StyleValue::text(data.offsets.popper.position.as_str()),
        );
        if self.options.gpu_acceleration && dom.supports_transform() {
            styles.insert(
                "transform".to_owned(),
                StyleValue::Text(format!("translate3d({left}px, {top}px, 0)")),
            );
            styles.insert("left".to_owned(), StyleValue::Px(0.0));
            styles.insert("top".to_owned(), StyleValue::Px(0.0));
        } else {
            styles.insert("left".to_owned(), StyleValue::Px(left));
            styles.insert("top".to_owned(), StyleValue::Px(top));
        }
        styles.extend(std::mem::take(&mut data.styles));

        for (property, value) in &styles {
            dom.set_style(self.popper, property, &value.to_string());
        }
        dom.set_attribute(self.popper, "x-placement", &data.placement.to_string());

        if self.requires(BuiltinModifier::ApplyStyle, BuiltinModifier::Arrow) {
            if let (Some(arrow), Some(node)) = (data.offsets.arrow, data.arrow_element) {
                for (property, value) in arrow.styles() {
                    dom.set_style(node, property, &value.to_string());
                }
            }
        }

        data.styles = styles;
        data
    }
}

/// Scroll offset of a scroll container; the body reads the larger of the
/// body and root offsets.
fn scroll_value<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Point {
    let scroll = dom.scroll_offset(node);
    if node == dom.body() {
        let root = dom.scroll_offset(dom.root());
        return Point::new(scroll.x.max(root.x), scroll.y.max(root.y));
    }
    scroll
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Align the popper's edge, rather than its center, with the reference for
/// `-start`/`-end` placements.
pub(crate) fn shift(mut data: OffsetData) -> OffsetData {
    let Some(alignment) = data.placement.alignment else {
        return data;
    };
    let axis = data.placement.side.cross_axis();
    let reference = data.reference();
    let popper = &mut data.offsets.popper.rect;
    let start = match alignment {
        Alignment::Start => reference.start(axis),
        Alignment::End => reference.end(axis) - popper.len(axis),
    };
    popper.set_start(axis, start);
    data
}

/// Translate the popper along the cross axis.
pub(crate) fn offset(mut data: OffsetData, amount: f64) -> OffsetData {
    let popper = &mut data.offsets.popper.rect;
    match data.placement.side {
        Side::Left => popper.top -= amount,
        Side::Right => popper.top += amount,
        Side::Top => popper.left -= amount,
        Side::Bottom => popper.left += amount,
    }
    data
}

/// Clamp the popper into the boundaries, one edge at a time in `order`.
pub(crate) fn prevent_overflow(mut data: OffsetData, order: &[Side]) -> OffsetData {
    let boundaries = data.boundaries;
    let popper = &mut data.offsets.popper.rect;
    for side in order {
        match side {
            Side::Left => popper.left = popper.left.max(boundaries.left),
            Side::Right => popper.left = popper.left.min(boundaries.right() - popper.width),
            Side::Top => popper.top = popper.top.max(boundaries.top),
            Side::Bottom => popper.top = popper.top.min(boundaries.bottom() - popper.height),
        }
    }
    data
}

/// Snap a popper that drifted past a reference edge back against it.
pub(crate) fn keep_together(mut data: OffsetData) -> OffsetData {
    let reference = data.reference();
    let popper = &mut data.offsets.popper.rect;
    if popper.right() < reference.left.floor() {
        popper.left = reference.left.floor() - popper.width;
    }
    if popper.left > reference.right().floor() {
        popper.left = reference.right().floor();
    }
    if popper.bottom() < reference.top.floor() {
        popper.top = reference.top.floor() - popper.height;
    }
    if popper.top > reference.bottom().floor() {
        popper.top = reference.bottom().floor();
    }
    data
}
