#![forbid(unsafe_code)]

//! Overlay components as seen by the coordinator.

use std::fmt;

use tether_core::dom::Dom;
use web_time::Instant;

/// A registered overlay component.
///
/// The coordinator only ever asks the topmost instance to dismiss itself.
/// `dismiss` may call back into the coordinator (typically `close`).
pub trait OverlayInstance {
    /// Whether a backdrop click dismisses this overlay.
    fn close_on_click_modal(&self) -> bool {
        true
    }

    /// Whether the Escape key dismisses this overlay.
    fn close_on_press_escape(&self) -> bool {
        true
    }

    /// Close the overlay.
    fn dismiss(&self, dom: &mut dyn Dom, now: Instant);
}

type DismissFn = Box<dyn Fn(&mut dyn Dom, Instant)>;

/// An [`OverlayInstance`] backed by a closure.
pub struct CallbackInstance {
    on_dismiss: DismissFn,
    close_on_click_modal: bool,
    close_on_press_escape: bool,
}

impl CallbackInstance {
    /// Dismiss by calling `on_dismiss`.
    pub fn new(on_dismiss: impl Fn(&mut dyn Dom, Instant) + 'static) -> Self {
        Self {
            on_dismiss: Box::new(on_dismiss),
            close_on_click_modal: true,
            close_on_press_escape: true,
        }
    }

    /// Set whether backdrop clicks dismiss.
    #[must_use]
    pub fn with_close_on_click_modal(mut self, close: bool) -> Self {
        self.close_on_click_modal = close;
        self
    }

    /// Set whether Escape dismisses.
    #[must_use]
    pub fn with_close_on_press_escape(mut self, close: bool) -> Self {
        self.close_on_press_escape = close;
        self
    }
}

impl fmt::Debug for CallbackInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackInstance")
            .field("close_on_click_modal", &self.close_on_click_modal)
            .field("close_on_press_escape", &self.close_on_press_escape)
            .finish_non_exhaustive()
    }
}

impl OverlayInstance for CallbackInstance {
    fn close_on_click_modal(&self) -> bool {
        self.close_on_click_modal
    }

    fn close_on_press_escape(&self) -> bool {
        self.close_on_press_escape
    }

    fn dismiss(&self, dom: &mut dyn Dom, now: Instant) {
        (self.on_dismiss)(dom, now);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use tether_core::geometry::Size;
    use tether_core::memory_dom::MemoryDom;

    use super::*;

    #[test]
    fn flags_default_on_and_read_back_on_concrete_type() {
        let instance = CallbackInstance::new(|_, _| {});
        assert!(instance.close_on_click_modal());
        assert!(instance.close_on_press_escape());

        let instance = CallbackInstance::new(|_, _| {})
            .with_close_on_click_modal(false)
            .with_close_on_press_escape(false);
        assert!(!instance.close_on_click_modal());
        assert!(!instance.close_on_press_escape());
    }

    #[test]
    fn dismiss_runs_callback() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let instance = CallbackInstance::new(move |_, _| counter.set(counter.get() + 1));
        let mut dom = MemoryDom::new(Size::new(10.0, 10.0));
        instance.dismiss(&mut dom, Instant::now());
        assert_eq!(calls.get(), 1);
    }
}
