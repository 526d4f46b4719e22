//! wgpu render backend for the cube sandbox.
//!
//! Uploads meshes, textures and shader programs once, then draws whatever
//! [`cubelab_render::FramePlan`] it is handed each frame.
//!
//! # Invariants
//! - Renderer never mutates camera or scene state.
//! - Every GPU object is owned by exactly one wrapper and released when it drops.
//! - Group 0 holds per-frame camera and light blocks; group 1 holds per-pass material.

mod buffer;
mod context;
mod gpu;
mod shader;
mod texture;
mod vertex_array;

pub use buffer::{ElementBuffer, InstanceBuffer, UniformBuffer, VertexBuffer};
pub use context::GpuContext;
pub use gpu::WgpuRenderer;
pub use shader::{ShaderProgram, shader_kind};
pub use texture::{DEPTH_FORMAT, Texture, TextureOrigin};
pub use vertex_array::VertexArray;

/// Errors raised while setting up the GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    UnsupportedSurface,
}
