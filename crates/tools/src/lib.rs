//! Developer tooling: camera inspector and frame timing for the debug overlay.
//!
//! # Invariants
//! - Tools only read camera state; they never change it.

mod frame_timer;
mod inspector;

pub use frame_timer::FrameTimer;
pub use inspector::{CameraInspector, CameraSummary};

pub fn crate_info() -> &'static str {
    "cubelab-tools v0.1.0"
}
