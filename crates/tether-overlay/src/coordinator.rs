#![forbid(unsafe_code)]

//! Shared backdrop and stacking order for modal overlays.
//!
//! An [`OverlayCoordinator`] owns the overlay stack, the instance registry,
//! the z-index counter and one lazily created backdrop element. Clones share
//! state, so every overlay component can hold its own handle.
//!
//! # Invariants
//!
//! - `next_z_index` never repeats a value. Once [`MAX_Z_INDEX`] has been
//!   handed out it returns `None`, and `open` with no z-index is a no-op.
//! - The backdrop's `z-index` reflects the topmost entry after every
//!   top-of-stack close.
//! - Opening an id that is already on the stack changes nothing.
//! - Only the topmost registered instance is ever asked to dismiss.
//! - No state borrow is held while [`OverlayInstance::dismiss`] runs, so
//!   instances may call back into the coordinator.
//!
//! # Failure Modes
//!
//! - Empty ids and missing z-indices make `open`/`register` no-ops.
//! - Closing an id that is not on the stack does nothing.
//! - Closing an overlay that is not on top removes its entry but leaves its
//!   extra backdrop classes in place until the stack empties.
//!
//! # Example
//!
//! ```ignore
//! let overlays = OverlayCoordinator::new(OverlayConfig::default());
//! let z = overlays.next_z_index();
//! overlays.open(&mut dom, "dialog", OpenRequest::new(z), Instant::now());
//! overlays.handle_event(&mut dom, &Event::key(KeyCode::Escape), Instant::now());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use tether_core::dom::{Dom, NodeId};
use tether_core::event::{Event, EventOutcome, KeyCode, PointerEventKind};
use tether_core::timer::TimerQueue;
use web_time::Instant;

use crate::config::{MAX_Z_INDEX, OverlayConfig};
use crate::instance::OverlayInstance;
use crate::stack::{OverlayStack, OverlayStackEntry};

thread_local! {
    static GLOBAL_COORDINATOR: OverlayCoordinator = OverlayCoordinator::new(OverlayConfig::from_env());
}

/// Parameters of [`OverlayCoordinator::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    /// Backdrop stacking index; `None` makes `open` a no-op.
    pub z_index: Option<u32>,
    /// The backdrop is placed next to this element when it has a parent.
    pub dom_context: Option<NodeId>,
    /// Extra backdrop classes, whitespace separated.
    pub modal_class: Option<String>,
    /// Whether enter/leave transition classes are applied.
    pub modal_fade: bool,
}

impl OpenRequest {
    /// Open at `z_index` with fading on.
    ///
    /// Accepts the result of [`OverlayCoordinator::next_z_index`] directly.
    #[must_use]
    pub fn new(z_index: impl Into<Option<u32>>) -> Self {
        Self {
            z_index: z_index.into(),
            dom_context: None,
            modal_class: None,
            modal_fade: true,
        }
    }

    #[must_use]
    pub fn dom_context(mut self, node: NodeId) -> Self {
        self.dom_context = Some(node);
        self
    }

    #[must_use]
    pub fn modal_class(mut self, class: impl Into<String>) -> Self {
        self.modal_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn modal_fade(mut self, fade: bool) -> Self {
        self.modal_fade = fade;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TransitionKey {
    /// Removal of the enter class scheduled by opening this id.
    Enter(String),
    /// Backdrop teardown after the stack emptied.
    Leave,
}

struct State {
    config: OverlayConfig,
    instances: AHashMap<String, Rc<dyn OverlayInstance>>,
    stack: OverlayStack,
    /// `None` once the counter has passed [`MAX_Z_INDEX`].
    next_z_index: Option<u32>,
    backdrop: Option<NodeId>,
    modal_fade: bool,
    /// Pending transitions, each bound to the backdrop it was scheduled for.
    transitions: TimerQueue<TransitionKey, NodeId>,
}

/// Shared overlay state. Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct OverlayCoordinator {
    state: Rc<RefCell<State>>,
}

impl fmt::Debug for OverlayCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("OverlayCoordinator")
            .field("stack", &state.stack)
            .field("instances", &state.instances.len())
            .field("next_z_index", &state.next_z_index)
            .field("backdrop", &state.backdrop)
            .field("pending_transitions", &state.transitions.len())
            .finish()
    }
}

impl Default for OverlayCoordinator {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl OverlayCoordinator {
    /// Create an independent coordinator.
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                next_z_index: Some(config.base_z_index.min(MAX_Z_INDEX)),
                config,
                instances: AHashMap::new(),
                stack: OverlayStack::new(),
                backdrop: None,
                modal_fade: true,
                transitions: TimerQueue::new(),
            })),
        }
    }

    /// The thread's shared coordinator, configured from the environment.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_COORDINATOR.with(Clone::clone)
    }

    /// Whether both handles share state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    // --- Registry ---

    /// Register `instance` under `id`, replacing any previous one.
    pub fn register(&self, id: &str, instance: Rc<dyn OverlayInstance>) {
        if id.is_empty() {
            tracing::trace!("register ignored: empty id");
            return;
        }
        self.state
            .borrow_mut()
            .instances
            .insert(id.to_owned(), instance);
    }

    /// Forget the instance under `id`.
    pub fn deregister(&self, id: &str) {
        if id.is_empty() {
            return;
        }
        self.state.borrow_mut().instances.remove(id);
    }

    /// The instance registered under `id`.
    #[must_use]
    pub fn instance(&self, id: &str) -> Option<Rc<dyn OverlayInstance>> {
        self.state.borrow().instances.get(id).cloned()
    }

    /// Return the current stacking index and advance the counter.
    ///
    /// Returns `None` after [`MAX_Z_INDEX`] has been handed out.
    pub fn next_z_index(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let z_index = state.next_z_index?;
        state.next_z_index = z_index.checked_add(1).filter(|&next| next <= MAX_Z_INDEX);
        if state.next_z_index.is_none() {
            tracing::warn!(z_index, "z-index counter exhausted");
        }
        Some(z_index)
    }

    // --- Stack ---

    /// Show the backdrop under overlay `id`.
    pub fn open(&self, dom: &mut dyn Dom, id: &str, request: OpenRequest, now: Instant) {
        let Some(z_index) = request.z_index else {
            tracing::trace!(id, "open ignored: no z-index");
            return;
        };
        if id.is_empty() {
            tracing::trace!("open ignored: empty id");
            return;
        }
        let span = tracing::debug_span!("overlay.open", id, z_index);
        let _guard = span.enter();

        let mut state = self.state.borrow_mut();
        if state.stack.contains(id) {
            tracing::trace!("already open");
            return;
        }
        state.modal_fade = request.modal_fade;

        let existing = state.backdrop;
        let (backdrop, fresh) = match existing {
            Some(node) => (node, false),
            None => {
                let node = dom.create_element("div");
                state.backdrop = Some(node);
                (node, true)
            }
        };

        let classes = &state.config.classes;
        dom.add_class(backdrop, &classes.base);
        if request.modal_fade && fresh {
            dom.add_class(backdrop, &classes.enter);
        }
        if let Some(modal_class) = &request.modal_class {
            for class in modal_class.split_whitespace() {
                dom.add_class(backdrop, class);
            }
        }
        dom.remove_class(backdrop, &classes.leave);

        let key = TransitionKey::Enter(id.to_owned());
        let due = now + state.config.transition;
        state.transitions.reschedule(key, due, backdrop);
        if state.transitions.cancel(&TransitionKey::Leave) > 0 {
            tracing::debug!("pending backdrop teardown canceled");
        }

        let parent = request
            .dom_context
            .and_then(|node| dom.parent(node))
            .filter(|&parent| !dom.is_fragment(parent))
            .unwrap_or_else(|| dom.body());
        dom.append_child(parent, backdrop);

        dom.set_style(backdrop, "z-index", &z_index.to_string());
        dom.set_attribute(backdrop, "tabindex", "0");
        dom.set_style(backdrop, "display", "");

        state.stack.push(OverlayStackEntry {
            id: id.to_owned(),
            z_index,
            modal_class: request.modal_class,
        });
        tracing::debug!(depth = state.stack.len(), "overlay opened");
    }

    /// Remove overlay `id` from the stack.
    pub fn close(&self, dom: &mut dyn Dom, id: &str, now: Instant) {
        let span = tracing::debug_span!("overlay.close", id);
        let _guard = span.enter();

        let mut state = self.state.borrow_mut();
        let on_top = state.stack.top().is_some_and(|top| top.id == id);
        let removed = if on_top {
            let entry = state.stack.pop();
            if let (Some(entry), Some(backdrop)) = (&entry, state.backdrop) {
                for class in entry.classes() {
                    dom.remove_class(backdrop, class);
                }
                if let Some(top) = state.stack.top() {
                    dom.set_style(backdrop, "z-index", &top.z_index.to_string());
                }
            }
            entry.is_some()
        } else {
            state.stack.remove(id).is_some()
        };

        if !removed {
            tracing::trace!("close ignored: not open");
            return;
        }
        tracing::debug!(depth = state.stack.len(), buried = !on_top, "overlay closed");

        if state.stack.is_empty() {
            if let Some(backdrop) = state.backdrop {
                if state.modal_fade {
                    dom.add_class(backdrop, &state.config.classes.leave);
                }
                let due = now + state.config.transition;
                state
                    .transitions
                    .reschedule(TransitionKey::Leave, due, backdrop);
            }
        }
    }

    /// Route a host event to the topmost overlay.
    ///
    /// Escape presses and backdrop clicks dismiss the topmost instance when
    /// it opts in. Touch moves on the backdrop are consumed.
    pub fn handle_event(&self, dom: &mut dyn Dom, event: &Event, now: Instant) -> EventOutcome {
        let (backdrop, top) = {
            let state = self.state.borrow();
            let top = state
                .stack
                .top()
                .and_then(|entry| state.instances.get(&entry.id).cloned());
            (state.backdrop, top)
        };

        match event {
            Event::Key(key) if key.is_press(KeyCode::Escape) => match top {
                Some(instance) if instance.close_on_press_escape() => {
                    instance.dismiss(dom, now);
                    EventOutcome::Handled
                }
                _ => EventOutcome::Ignored,
            },
            Event::Pointer(pointer) if Some(pointer.target) == backdrop => match pointer.kind {
                PointerEventKind::Click => match top {
                    Some(instance) if instance.close_on_click_modal() => {
                        instance.dismiss(dom, now);
                        EventOutcome::Handled
                    }
                    _ => EventOutcome::Ignored,
                },
                PointerEventKind::TouchMove => EventOutcome::Consumed,
            },
            _ => EventOutcome::Ignored,
        }
    }

    /// Run transitions due at `now`.
    pub fn tick(&self, dom: &mut dyn Dom, now: Instant) {
        let mut state = self.state.borrow_mut();
        for (key, backdrop) in state.transitions.drain_due(now) {
            match key {
                TransitionKey::Enter(_) => {
                    dom.remove_class(backdrop, &state.config.classes.enter);
                }
                TransitionKey::Leave => {
                    if state.stack.is_empty() {
                        dom.detach(backdrop);
                        dom.set_style(backdrop, "display", "none");
                        if state.backdrop == Some(backdrop) {
                            state.backdrop = None;
                        }
                        tracing::debug!("backdrop removed");
                    }
                    dom.remove_class(backdrop, &state.config.classes.leave);
                }
            }
        }
    }

    // --- Accessors ---

    /// Entries from bottom to top.
    #[must_use]
    pub fn stack(&self) -> Vec<OverlayStackEntry> {
        self.state.borrow().stack.entries().to_vec()
    }

    /// Id of the topmost overlay.
    #[must_use]
    pub fn top_id(&self) -> Option<String> {
        self.state.borrow().stack.top().map(|e| e.id.clone())
    }

    /// Number of open overlays.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.state.borrow().stack.len()
    }

    /// The backdrop element, if one exists.
    #[must_use]
    pub fn backdrop(&self) -> Option<NodeId> {
        self.state.borrow().backdrop
    }

    /// When the next transition is due.
    #[must_use]
    pub fn next_transition(&self) -> Option<Instant> {
        self.state.borrow().transitions.next_due()
    }

    #[must_use]
    pub fn config(&self) -> OverlayConfig {
        self.state.borrow().config.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use proptest::prelude::*;
    use tether_core::event::PointerEvent;
    use tether_core::geometry::{Point, Rect, Size};
    use tether_core::memory_dom::MemoryDom;
    use web_time::Duration;

    use super::*;
    use crate::instance::CallbackInstance;

    fn dom() -> MemoryDom {
        MemoryDom::new(Size::new(800.0, 600.0))
    }

    fn z_of(dom: &MemoryDom, node: NodeId) -> Option<u32> {
        dom.style(node, "z-index").and_then(|z| z.parse().ok())
    }

    /// An instance that closes itself through the coordinator and counts calls.
    fn closing_instance(
        overlays: &OverlayCoordinator,
        id: &'static str,
    ) -> (Rc<CallbackInstance>, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let handle = overlays.clone();
        let instance = CallbackInstance::new(move |dom, now| {
            counter.set(counter.get() + 1);
            handle.close(dom, id, now);
        });
        (Rc::new(instance), calls)
    }

    #[test]
    fn z_index_counter_starts_at_base() {
        let overlays = OverlayCoordinator::new(OverlayConfig::default().base_z_index(10));
        assert_eq!(overlays.next_z_index(), Some(10));
        assert_eq!(overlays.next_z_index(), Some(11));
    }

    #[test]
    fn z_index_counter_stops_at_ceiling() {
        let overlays =
            OverlayCoordinator::new(OverlayConfig::default().base_z_index(MAX_Z_INDEX - 1));
        assert_eq!(overlays.next_z_index(), Some(MAX_Z_INDEX - 1));
        assert_eq!(overlays.next_z_index(), Some(MAX_Z_INDEX));
        assert_eq!(overlays.next_z_index(), None);
        assert_eq!(overlays.next_z_index(), None);

        let mut dom = dom();
        overlays.open(&mut dom, "late", OpenRequest::new(overlays.next_z_index()), Instant::now());
        assert_eq!(overlays.depth(), 0);
        assert_eq!(overlays.backdrop(), None);
    }

    #[test]
    fn oversized_base_is_capped() {
        let overlays = OverlayCoordinator::new(OverlayConfig::default().base_z_index(u32::MAX));
        assert_eq!(overlays.next_z_index(), Some(MAX_Z_INDEX));
        assert_eq!(overlays.next_z_index(), None);
    }

    #[test]
    fn open_creates_backdrop_in_body() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let t0 = Instant::now();
        overlays.open(&mut dom, "a", OpenRequest::new(2000).modal_class("dim wide"), t0);

        let backdrop = overlays.backdrop().unwrap();
        assert_eq!(dom.parent(backdrop), Some(dom.body()));
        assert_eq!(z_of(&dom, backdrop), Some(2000));
        assert_eq!(dom.attribute(backdrop, "tabindex").as_deref(), Some("0"));
        for class in ["v-modal", "v-modal-enter", "dim", "wide"] {
            assert!(dom.has_class(backdrop, class), "{class}");
        }

        overlays.tick(&mut dom, t0 + Duration::from_millis(199));
        assert!(dom.has_class(backdrop, "v-modal-enter"));
        overlays.tick(&mut dom, t0 + Duration::from_millis(200));
        assert!(!dom.has_class(backdrop, "v-modal-enter"));
    }

    #[test]
    fn open_guards() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        overlays.open(&mut dom, "", OpenRequest::new(1), now);
        let mut no_z = OpenRequest::new(1);
        no_z.z_index = None;
        overlays.open(&mut dom, "a", no_z, now);
        assert_eq!(overlays.depth(), 0);
        assert_eq!(overlays.backdrop(), None);
    }

    #[test]
    fn reopening_same_id_is_noop() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        overlays.open(&mut dom, "a", OpenRequest::new(10), now);
        overlays.open(&mut dom, "a", OpenRequest::new(20), now);
        assert_eq!(overlays.depth(), 1);
        assert_eq!(z_of(&dom, overlays.backdrop().unwrap()), Some(10));
    }

    #[test]
    fn backdrop_is_placed_next_to_context() {
        let mut dom = dom();
        let body = dom.body();
        let host = dom.element(body, "section", Rect::ZERO);
        let dialog = dom.element(host, "div", Rect::ZERO);
        let overlays = OverlayCoordinator::default();
        overlays.open(
            &mut dom,
            "a",
            OpenRequest::new(1).dom_context(dialog),
            Instant::now(),
        );
        assert_eq!(dom.parent(overlays.backdrop().unwrap()), Some(host));
    }

    #[test]
    fn fragment_context_falls_back_to_body() {
        let mut dom = dom();
        let fragment = dom.create_fragment();
        let dialog = dom.create_element("div");
        dom.append_child(fragment, dialog);
        let overlays = OverlayCoordinator::default();
        overlays.open(
            &mut dom,
            "a",
            OpenRequest::new(1).dom_context(dialog),
            Instant::now(),
        );
        assert_eq!(dom.parent(overlays.backdrop().unwrap()), Some(dom.body()));
    }

    #[test]
    fn top_close_restores_previous_z_and_classes() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        overlays.open(&mut dom, "a", OpenRequest::new(10), now);
        overlays.open(&mut dom, "b", OpenRequest::new(20).modal_class("dark"), now);
        let backdrop = overlays.backdrop().unwrap();
        assert!(dom.has_class(backdrop, "dark"));

        overlays.close(&mut dom, "b", now);
        assert_eq!(z_of(&dom, backdrop), Some(10));
        assert!(!dom.has_class(backdrop, "dark"));
        assert_eq!(overlays.top_id().as_deref(), Some("a"));
    }

    #[test]
    fn buried_close_keeps_z_and_classes() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        overlays.open(&mut dom, "a", OpenRequest::new(10).modal_class("dark"), now);
        overlays.open(&mut dom, "b", OpenRequest::new(20), now);
        overlays.close(&mut dom, "a", now);

        let backdrop = overlays.backdrop().unwrap();
        let ids: Vec<_> = overlays.stack().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["b"]);
        assert_eq!(z_of(&dom, backdrop), Some(20));
        assert!(dom.has_class(backdrop, "dark"));
    }

    #[test]
    fn last_close_tears_down_backdrop_after_transition() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let t0 = Instant::now();
        overlays.open(&mut dom, "a", OpenRequest::new(10), t0);
        let backdrop = overlays.backdrop().unwrap();
        overlays.close(&mut dom, "a", t0);
        assert!(dom.has_class(backdrop, "v-modal-leave"));
        assert_eq!(overlays.backdrop(), Some(backdrop));

        overlays.tick(&mut dom, t0 + Duration::from_millis(200));
        assert_eq!(overlays.backdrop(), None);
        assert_eq!(dom.parent(backdrop), None);
        assert_eq!(dom.style(backdrop, "display").as_deref(), Some("none"));
        assert!(!dom.has_class(backdrop, "v-modal-leave"));
    }

    #[test]
    fn reopen_during_leave_keeps_backdrop() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let t0 = Instant::now();
        overlays.open(&mut dom, "a", OpenRequest::new(10), t0);
        let backdrop = overlays.backdrop().unwrap();
        overlays.close(&mut dom, "a", t0);
        overlays.open(&mut dom, "b", OpenRequest::new(11), t0 + Duration::from_millis(50));

        assert!(!dom.has_class(backdrop, "v-modal-leave"));
        overlays.tick(&mut dom, t0 + Duration::from_secs(1));
        assert_eq!(overlays.backdrop(), Some(backdrop));
        assert_eq!(dom.parent(backdrop), Some(dom.body()));
        assert_eq!(overlays.next_transition(), None);
    }

    #[test]
    fn reopen_after_teardown_creates_fresh_backdrop() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let t0 = Instant::now();
        overlays.open(&mut dom, "a", OpenRequest::new(10), t0);
        let first = overlays.backdrop().unwrap();
        overlays.close(&mut dom, "a", t0);
        overlays.tick(&mut dom, t0 + Duration::from_millis(200));

        let t1 = t0 + Duration::from_millis(300);
        overlays.open(&mut dom, "a", OpenRequest::new(12), t1);
        let second = overlays.backdrop().unwrap();
        assert_ne!(first, second);
        assert!(dom.has_class(second, "v-modal-enter"));
    }

    #[test]
    fn no_fade_skips_transition_classes() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        overlays.open(&mut dom, "a", OpenRequest::new(10).modal_fade(false), now);
        let backdrop = overlays.backdrop().unwrap();
        assert!(!dom.has_class(backdrop, "v-modal-enter"));
        overlays.close(&mut dom, "a", now);
        assert!(!dom.has_class(backdrop, "v-modal-leave"));
    }

    #[test]
    fn close_unknown_id_is_noop() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        overlays.close(&mut dom, "ghost", now);
        overlays.open(&mut dom, "a", OpenRequest::new(10), now);
        overlays.close(&mut dom, "ghost", now);
        assert_eq!(overlays.depth(), 1);
    }

    #[test]
    fn escape_dismisses_only_top_instance() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        let (a, a_calls) = closing_instance(&overlays, "a");
        let (b, b_calls) = closing_instance(&overlays, "b");
        overlays.register("a", a);
        overlays.register("b", b);
        overlays.open(&mut dom, "a", OpenRequest::new(10), now);
        overlays.open(&mut dom, "b", OpenRequest::new(20), now);

        let escape = Event::key(KeyCode::Escape);
        assert_eq!(overlays.handle_event(&mut dom, &escape, now), EventOutcome::Handled);
        assert_eq!((a_calls.get(), b_calls.get()), (0, 1));
        assert_eq!(overlays.top_id().as_deref(), Some("a"));

        overlays.handle_event(&mut dom, &escape, now);
        assert_eq!((a_calls.get(), b_calls.get()), (1, 1));
        assert_eq!(overlays.depth(), 0);
    }

    #[test]
    fn escape_respects_opt_out() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let instance = CallbackInstance::new(move |_, _| counter.set(counter.get() + 1))
            .with_close_on_press_escape(false);
        overlays.register("a", Rc::new(instance));
        overlays.open(&mut dom, "a", OpenRequest::new(10), now);

        let outcome = overlays.handle_event(&mut dom, &Event::key(KeyCode::Escape), now);
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn backdrop_click_and_touch() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        let (a, calls) = closing_instance(&overlays, "a");
        overlays.register("a", a);
        overlays.open(&mut dom, "a", OpenRequest::new(10), now);
        let backdrop = overlays.backdrop().unwrap();

        let touch = Event::Pointer(PointerEvent {
            kind: PointerEventKind::TouchMove,
            target: backdrop,
            position: Point::ZERO,
        });
        assert_eq!(overlays.handle_event(&mut dom, &touch, now), EventOutcome::Consumed);
        assert_eq!(calls.get(), 0);

        let elsewhere = Event::click(dom.body());
        assert_eq!(overlays.handle_event(&mut dom, &elsewhere, now), EventOutcome::Ignored);

        let click = Event::click(backdrop);
        assert_eq!(overlays.handle_event(&mut dom, &click, now), EventOutcome::Handled);
        assert_eq!(calls.get(), 1);
        assert_eq!(overlays.depth(), 0);
    }

    #[test]
    fn unregistered_top_is_not_dismissed() {
        let mut dom = dom();
        let overlays = OverlayCoordinator::default();
        let now = Instant::now();
        let (a, calls) = closing_instance(&overlays, "a");
        overlays.register("a", a);
        overlays.open(&mut dom, "a", OpenRequest::new(10), now);
        overlays.open(&mut dom, "b", OpenRequest::new(20), now);
        overlays.deregister("a");

        let outcome = overlays.handle_event(&mut dom, &Event::key(KeyCode::Escape), now);
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(calls.get(), 0);
        assert!(overlays.instance("a").is_none());
    }

    #[test]
    fn register_ignores_empty_id() {
        let overlays = OverlayCoordinator::default();
        overlays.register("", Rc::new(CallbackInstance::new(|_, _| {})));
        assert!(overlays.instance("").is_none());
    }

    #[test]
    fn clones_share_state() {
        let overlays = OverlayCoordinator::default();
        let other = overlays.clone();
        assert!(overlays.ptr_eq(&other));
        overlays.next_z_index();
        assert_eq!(other.next_z_index(), Some(2001));
        assert!(!overlays.ptr_eq(&OverlayCoordinator::default()));
    }

    #[test]
    fn global_is_shared_per_thread() {
        assert!(OverlayCoordinator::global().ptr_eq(&OverlayCoordinator::global()));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Next,
        Open(u8),
        Close(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Next),
            (0u8..4).prop_map(Op::Open),
            (0u8..4).prop_map(Op::Close),
        ]
    }

    proptest! {
        #[test]
        fn z_index_never_repeats(ops in proptest::collection::vec(op(), 1..64)) {
            let mut dom = dom();
            let overlays = OverlayCoordinator::default();
            let now = Instant::now();
            let mut issued = Vec::new();
            for op in ops {
                match op {
                    Op::Next => issued.extend(overlays.next_z_index()),
                    Op::Open(id) => overlays.open(&mut dom, &id.to_string(), OpenRequest::new(1), now),
                    Op::Close(id) => overlays.close(&mut dom, &id.to_string(), now),
                }
            }
            issued.extend(overlays.next_z_index());
            prop_assert!(issued.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
