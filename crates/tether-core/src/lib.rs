#![forbid(unsafe_code)]

//! Core types for Tether: geometry, the host element tree, events and timers.
//!
//! - [`geometry`] - `Rect`, `Size`, `Point`, `Sides`
//! - [`dom`] - the [`Dom`](dom::Dom) host trait and element handles
//! - [`measure`] - rectangle math over a host (offset parents, scroll
//!   parents, outer sizes)
//! - [`event`] - key, pointer, resize and scroll events
//! - [`timer`] - cancelable deferred tasks
//! - `memory_dom` - an in-memory host (feature `test-helpers`)

pub mod dom;
pub mod event;
pub mod geometry;
pub mod measure;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory_dom;
pub mod timer;

pub use dom::{ComputedStyle, CssPosition, Display, Dom, HostQuirks, NodeId, NodeList, Overflow};
pub use event::{
    Event, EventOutcome, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerEvent,
    PointerEventKind, ScrollTarget,
};
pub use geometry::{Axis, Point, Rect, Sides, Size};
pub use timer::TimerQueue;
