//! Drag handles for `egui`: wrap any UI so the user can drag it, and get told by how much the
//! pointer moved on every move while the button is held.
//!
//! - [`PointerRegistry`]: the pointer listener registry. Listeners live as long as their
//!   [`Subscription`].
//! - [`DragHandle`]: registers a move/release listener pair on press and drops them on release
//!   or teardown, reporting per-move displacement to its `on_drag` callback.
//! - [`PointerHub`]: feeds each frame's `egui` pointer input into the registry and ends drags of
//!   handles that were not shown.
#![forbid(unsafe_code)]

mod drag_handle;
mod events;
mod hub;
mod registry;

#[cfg(feature = "persistence")]
mod persistence;

pub use drag_handle::{DisplayAttributes, DragHandle, DragHandleOptions, DragPhase};
pub use events::{DefaultAction, PointerEvent, PointerEventKind};
pub use hub::{FrameReport, PointerHub, PointerHubOptions};
pub use registry::{DispatchOutcome, ListenerId, PointerRegistry, Subscription};

#[cfg(feature = "persistence")]
pub use persistence::OptionsPersistenceError;
