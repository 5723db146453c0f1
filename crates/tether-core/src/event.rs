#![forbid(unsafe_code)]

//! Input and layout events routed to engines and coordinators.
//!
//! Hosts translate their native events into [`Event`] values and hand them
//! to whichever component listens: the positioning engine repositions on
//! [`Event::Resize`] and [`Event::Scroll`], the overlay coordinator dismisses
//! on [`KeyCode::Escape`] and backdrop clicks.

use bitflags::bitflags;

use crate::dom::NodeId;
use crate::geometry::{Point, Size};

/// A host event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// Pointer input targeting an element.
    Pointer(PointerEvent),
    /// The window was resized.
    Resize(Size),
    /// A scroll container scrolled.
    Scroll(ScrollTarget),
}

impl Event {
    /// Shorthand for a key press without modifiers.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// Shorthand for a click on `target`.
    #[must_use]
    pub fn click(target: NodeId) -> Self {
        Self::Pointer(PointerEvent {
            kind: PointerEventKind::Click,
            target,
            position: Point::ZERO,
        })
    }
}

/// Keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Set modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is a press of `code`.
    #[must_use]
    pub fn is_press(&self, code: KeyCode) -> bool {
        self.code == code && self.kind == KeyEventKind::Press
    }
}

/// Key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Enter,
    Tab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

/// Key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// Pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: NodeId,
    pub position: Point,
}

/// Pointer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Click,
    TouchMove,
}

/// Where a scroll happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// The window (document scroll).
    Window,
    /// A scroll container element.
    Element(NodeId),
}

/// What a listener did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOutcome {
    /// The listener did not react.
    #[default]
    Ignored,
    /// The listener reacted; propagation may continue.
    Handled,
    /// The listener reacted and the host should suppress default handling.
    Consumed,
}

impl EventOutcome {
    /// Whether the listener reacted at all.
    #[inline]
    #[must_use]
    pub const fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}
