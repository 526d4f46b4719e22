//! Input: raw key and pointer events mapped to sandbox actions.
//!
//! # Invariants
//! - Movement keys are level-triggered: they act every frame while held.
//! - Quit and cursor-capture toggles are edge-triggered: key repeat never fires them.

pub mod action;
pub mod bindings;

pub use action::Action;
pub use bindings::{CursorCapture, InputState, Key, KeyBindings, PointerTracker};

pub fn crate_info() -> &'static str {
    "cubelab-input v0.1.0"
}
