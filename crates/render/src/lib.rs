//! Rendering model: fly camera, scene parameters, lights, and the data-driven
//! pipeline descriptions every frame is planned from.
//!
//! # Invariants
//! - Planning a frame is a pure function of camera, scene, lights and aspect.
//! - Renderers consume a [`FramePlan`]; they never mutate camera or scene state.
//! - Camera pitch stays within [-89, 89] degrees and `front` stays unit length.

pub mod camera;
pub mod frame;
pub mod lighting;
pub mod pipeline;
mod renderer;
pub mod scene;

pub use camera::{CursorPosition, FlyCamera};
pub use frame::{FramePlan, FrameUniforms, InstanceData, LightUniforms, MaterialUniforms, PlannedDraw};
pub use lighting::{DirectionalLight, LightingDesc, PointLight};
pub use pipeline::{DrawPass, MaterialDesc, MeshKind, ModelSource, RenderPipelineDesc, ShadingModel};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::SceneParams;

pub fn crate_info() -> &'static str {
    "cubelab-render v0.1.0"
}
