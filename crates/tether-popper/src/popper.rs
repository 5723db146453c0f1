#![forbid(unsafe_code)]

//! The positioning engine.
//!
//! A [`Popper`] keeps a floating element next to a reference element. It is
//! built once (resolving or creating the popper element, freezing the
//! positioning scheme, running a first update) and then repositioned with
//! [`Popper::update`] or by routing host events through
//! [`Popper::handle_event`].
//!
//! # Lifecycle
//!
//! | state | entered by | `update` |
//! |---|---|---|
//! | active | [`Popper::new`] | runs the pipeline |
//! | destroyed | [`Popper::destroy`] | no-op |
//!
//! # Failure Modes
//!
//! - Construction fails with [`PopperError`] when the reference or popper
//!   is missing, or a declarative parent cannot be resolved.
//! - Dependency-order problems in the modifier list and ambiguous parents
//!   are logged once and recorded in [`Popper::warnings`]; the offending
//!   step is skipped.

use std::fmt;

use tether_core::dom::{Dom, NodeId};
use tether_core::event::{Event, EventOutcome, ScrollTarget};
use tether_core::measure;

use crate::data::{OffsetData, PositionScheme, StyleValue};
use crate::error::{PopperError, PopperWarning};
use crate::modifier::{BuiltinModifier, Modifier};
use crate::options::{BoundariesElement, PopperOptions};
use crate::pipeline::Pipeline;
use crate::source::PopperSource;

/// Host events the engine repositions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listeners {
    /// Window resize.
    pub resize: bool,
    /// Scroll of this target, if any.
    pub scroll: Option<ScrollTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Active,
    Destroyed,
}

type UpdateCallback = Box<dyn FnMut(&OffsetData)>;

/// Positioning engine for one reference/popper pair.
pub struct Popper {
    reference: NodeId,
    popper: NodeId,
    options: PopperOptions,
    modifiers: Vec<Modifier>,
    position: PositionScheme,
    phase: Phase,
    listeners: Option<Listeners>,
    update_callback: Option<UpdateCallback>,
    warnings: Vec<PopperWarning>,
    last_data: Option<OffsetData>,
}

impl fmt::Debug for Popper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popper")
            .field("reference", &self.reference)
            .field("popper", &self.popper)
            .field("position", &self.position)
            .field("phase", &self.phase)
            .field("listeners", &self.listeners)
            .field("modifiers", &self.modifiers)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

impl Popper {
    /// Build an engine and run the first update.
    ///
    /// # Errors
    ///
    /// [`PopperError::MissingReference`] when `reference` is `None` or not
    /// live, [`PopperError::MissingPopper`] when an element source is not
    /// live, [`PopperError::ParentNotFound`] when a declarative parent does
    /// not resolve.
    pub fn new<D: Dom + ?Sized>(
        dom: &mut D,
        reference: Option<NodeId>,
        source: impl Into<PopperSource>,
        options: PopperOptions,
    ) -> Result<Self, PopperError> {
        let span = tracing::debug_span!("popper.new", placement = %options.placement);
        let _guard = span.enter();

        let reference = reference
            .filter(|&node| dom.exists(node))
            .ok_or(PopperError::MissingReference)?;

        let mut warnings = Vec::new();
        let popper = match source.into() {
            PopperSource::Element(node) if dom.exists(node) => node,
            PopperSource::Element(_) => return Err(PopperError::MissingPopper),
            PopperSource::Spec(spec) => spec.materialize(dom, &mut warnings)?,
        };

        let modifiers = options.active_modifiers();
        if modifiers
            .iter()
            .any(|m| m.builtin() == Some(BuiltinModifier::ApplyStyle))
        {
            dom.set_attribute(popper, "x-placement", &options.placement.to_string());
        }

        let position = if !options.force_absolute && measure::is_fixed_ancestor(dom, reference) {
            PositionScheme::Fixed
        } else {
            PositionScheme::Absolute
        };
        dom.set_style(popper, "position", position.as_str());
        dom.set_style(popper, "top", &StyleValue::Px(0.0).to_string());

        let mut engine = Self {
            reference,
            popper,
            options,
            modifiers,
            position,
            phase: Phase::Active,
            listeners: None,
            update_callback: None,
            warnings: Vec::new(),
            last_data: None,
        };
        for warning in warnings {
            engine.warn(warning);
        }
        engine.update(dom);
        engine.listeners = Some(engine.listen(dom));
        tracing::debug!(position = position.as_str(), "popper created");
        Ok(engine)
    }

    fn listen<D: Dom + ?Sized>(&self, dom: &D) -> Listeners {
        let scroll = (self.options.boundaries_element != BoundariesElement::Window).then(|| {
            let target = measure::scroll_parent(dom, self.reference);
            if target == dom.body() || target == dom.root() {
                ScrollTarget::Window
            } else {
                ScrollTarget::Element(target)
            }
        });
        Listeners {
            resize: true,
            scroll,
        }
    }

    fn warn(&mut self, warning: PopperWarning) {
        if self.warnings.contains(&warning) {
            return;
        }
        tracing::warn!(%warning, "popper configuration warning");
        self.warnings.push(warning);
    }

    /// Run `callback` with the freshly built engine.
    pub fn on_create(&mut self, callback: impl FnOnce(&Self)) -> &mut Self {
        callback(self);
        self
    }

    /// Register a callback invoked with the final data of every update.
    pub fn on_update(&mut self, callback: impl FnMut(&OffsetData) + 'static) -> &mut Self {
        self.update_callback = Some(Box::new(callback));
        self
    }

    /// Recompute the popper position.
    ///
    /// Returns the cycle's final data, or `None` once destroyed.
    pub fn update<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Option<&OffsetData> {
        if self.phase == Phase::Destroyed {
            return None;
        }
        let span = tracing::debug_span!("popper.update", placement = %self.options.placement);
        let _guard = span.enter();

        let pipeline = Pipeline {
            reference: self.reference,
            popper: self.popper,
            position: self.position,
            options: &self.options,
            modifiers: &self.modifiers,
        };
        let placement = self.options.placement;
        let offsets = pipeline.offsets(dom, placement);
        let boundaries = pipeline.boundaries(dom);
        let mut warnings = Vec::new();
        let data = pipeline.run(
            dom,
            OffsetData::new(placement, offsets, boundaries),
            self.modifiers.len(),
            &mut warnings,
        );

        for warning in warnings {
            self.warn(warning);
        }
        if let Some(callback) = self.update_callback.as_mut() {
            callback(&data);
        }
        self.last_data = Some(data);
        self.last_data.as_ref()
    }

    /// Reposition on window resize or a scroll of the attached target.
    pub fn handle_event<D: Dom + ?Sized>(&mut self, dom: &mut D, event: &Event) -> EventOutcome {
        let Some(listeners) = self.listeners else {
            return EventOutcome::Ignored;
        };
        let relevant = match event {
            Event::Resize(_) => listeners.resize,
            Event::Scroll(target) => listeners.scroll == Some(*target),
            Event::Key(_) | Event::Pointer(_) => false,
        };
        if !relevant {
            return EventOutcome::Ignored;
        }
        self.update(dom);
        EventOutcome::Handled
    }

    /// Clear the engine's inline styles and stop listening.
    ///
    /// Removes the popper from the host when `remove_on_destroy` is set.
    /// Calling it twice is a no-op.
    pub fn destroy<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.phase == Phase::Destroyed {
            return;
        }
        dom.remove_attribute(self.popper, "x-placement");
        for property in ["left", "position", "top", "transform"] {
            dom.set_style(self.popper, property, "");
        }
        self.listeners = None;
        if self.options.remove_on_destroy {
            dom.detach(self.popper);
        }
        self.phase = Phase::Destroyed;
        tracing::debug!("popper destroyed");
    }

    #[must_use]
    pub fn reference(&self) -> NodeId {
        self.reference
    }

    /// The popper element (created when built from a spec).
    #[must_use]
    pub fn popper(&self) -> NodeId {
        self.popper
    }

    /// The frozen positioning scheme.
    #[must_use]
    pub fn position(&self) -> PositionScheme {
        self.position
    }

    #[must_use]
    pub fn options(&self) -> &PopperOptions {
        &self.options
    }

    /// Modifiers that run, after ignored names were removed.
    #[must_use]
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Data of the most recent update.
    #[must_use]
    pub fn last_data(&self) -> Option<&OffsetData> {
        self.last_data.as_ref()
    }

    /// Distinct warnings raised so far.
    #[must_use]
    pub fn warnings(&self) -> &[PopperWarning] {
        &self.warnings
    }

    /// Events the host should forward; `None` once destroyed.
    #[must_use]
    pub fn listeners(&self) -> Option<Listeners> {
        self.listeners
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.phase == Phase::Destroyed
    }
}
