#![forbid(unsafe_code)]

//! Tether: floating-element positioning and modal overlay stacking.
//!
//! This crate re-exports the workspace crates behind one import path:
//!
//! - [`tether_core`] - geometry, the [`Dom`](tether_core::Dom) host trait,
//!   events, timers
//! - [`tether_popper`] - the positioning engine
//! - `tether_overlay` - the overlay stack coordinator (feature `overlay`, on
//!   by default)
//!
//! Most users only need the [`prelude`].

pub use tether_core;
#[cfg(feature = "overlay")]
pub use tether_overlay;
pub use tether_popper;

pub mod prelude {
    //! Common imports.

    pub use tether_core::{
        Dom, Event, EventOutcome, KeyCode, NodeId, Point, Rect, ScrollTarget, Size,
    };
    #[cfg(feature = "overlay")]
    pub use tether_overlay::{
        CallbackInstance, OpenRequest, OverlayConfig, OverlayCoordinator, OverlayInstance,
    };
    pub use tether_popper::{
        BoundariesElement, FlipBehavior, Modifier, OffsetData, Placement, Popper, PopperError,
        PopperOptions, PopperSpec, Side,
    };
}
