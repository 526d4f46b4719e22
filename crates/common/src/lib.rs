//! Shared types and configuration for the cubelab sandbox.
//!
//! # Invariants
//! - Every configuration field has a default; a missing file is not an error.
//! - Enumerations here are closed: no invalid movement direction or preset exists.

pub mod config;
pub mod types;

pub use config::{AssetsConfig, CameraConfig, ConfigError, CubelabConfig, SceneConfig, WindowConfig};
pub use types::{MovementDirection, PipelinePreset, TextureKey, Transform};

pub fn crate_info() -> &'static str {
    "cubelab-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
