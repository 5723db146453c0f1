#![forbid(unsafe_code)]

//! Floating-element positioning.
//!
//! [`Popper`] places a popper element next to a reference element and keeps
//! it there. Each update computes raw offsets for the configured
//! [`Placement`], derives the boundary rectangle, and runs an ordered list of
//! [`Modifier`]s (shift, offset, preventOverflow, keepTogether, arrow, flip,
//! applyStyle, plus any custom ones) over an [`OffsetData`] record.
//!
//! The engine never owns elements; it reads and writes them through the
//! [`Dom`](tether_core::Dom) host trait.

mod data;
mod error;
mod modifier;
mod options;
mod pipeline;
mod placement;
mod popper;
mod source;

pub use data::{
    ArrowOffsets, OffsetData, Offsets, PopperOffsets, PositionScheme, StyleMap, StyleValue,
};
pub use error::{PopperError, PopperWarning};
pub use modifier::{BuiltinModifier, CustomModifier, Modifier, ModifierFn, default_modifiers};
pub use options::{ArrowElement, BoundariesElement, FlipBehavior, PopperOptions};
pub use placement::{Alignment, Placement, Side};
pub use popper::{Listeners, Popper};
pub use source::{ArrowSpec, Content, ParentSpec, PopperSource, PopperSpec};
