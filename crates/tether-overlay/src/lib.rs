#![forbid(unsafe_code)]

//! Modal overlay stacking.
//!
//! [`OverlayCoordinator`] keeps the stack of open modal overlays, hands out
//! monotonically increasing z-indices, manages the single shared backdrop
//! element and routes Escape presses and backdrop clicks to the topmost
//! overlay's [`OverlayInstance::dismiss`].

mod config;
mod coordinator;
mod instance;
mod stack;

pub use config::{BackdropClasses, MAX_Z_INDEX, OverlayConfig, Z_INDEX_ENV};
pub use coordinator::{OpenRequest, OverlayCoordinator};
pub use instance::{CallbackInstance, OverlayInstance};
pub use stack::{OverlayStack, OverlayStackEntry};
