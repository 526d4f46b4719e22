//! Assets: geometry baked into the binary, WGSL shader sources, texture images.
//!
//! Shader and image files are read from disk by relative path at startup.
//! Nothing here touches the GPU; the wgpu backend uploads what this crate produces.
//!
//! # Layout
//! ```text
//! assets/
//!   shaders/   textured.wgsl, phong.wgsl, lamp.wgsl
//!   textures/  container.jpg, awesomeface.png
//! ```

pub mod geometry;
pub mod shaders;
pub mod texture;

use std::path::PathBuf;

pub use geometry::{MeshData, Vertex};
pub use shaders::{ShaderKind, ShaderLibrary, ShaderOrigin, check_wgsl};
pub use texture::ImageData;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("shader {path} is invalid: {reason}")]
    InvalidShader { path: PathBuf, reason: String },
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to decode image data: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has zero size")]
    Empty,
}

pub fn crate_info() -> &'static str {
    "cubelab-assets v0.1.0"
}
