//! Per-frame data handed to a renderer: uniform blocks and resolved draws.
//!
//! The `#[repr(C)]` blocks mirror the WGSL structs in `assets/shaders` field for field.

use crate::camera::FlyCamera;
use crate::lighting::LightingDesc;
use crate::pipeline::{MaterialDesc, MeshKind, ShadingModel};
use bytemuck::{Pod, Zeroable};
use cubelab_common::PipelinePreset;
use glam::{Mat4, Vec3};
use std::ops::Range;

/// Camera block, `@group(0) @binding(0)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl FrameUniforms {
    pub fn from_camera(camera: &FlyCamera, aspect: f32) -> Self {
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix(aspect).to_cols_array_2d(),
            eye: camera.position.extend(1.0).to_array(),
        }
    }
}

/// Light block, `@group(0) @binding(1)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightUniforms {
    pub sun_direction: [f32; 4],
    pub sun_ambient: [f32; 4],
    pub sun_diffuse: [f32; 4],
    pub sun_specular: [f32; 4],
    pub lamp_position: [f32; 4],
    pub lamp_ambient: [f32; 4],
    pub lamp_diffuse: [f32; 4],
    pub lamp_specular: [f32; 4],
    /// x: constant, y: linear, z: quadratic.
    pub lamp_attenuation: [f32; 4],
}

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    v.extend(w).to_array()
}

impl From<&LightingDesc> for LightUniforms {
    fn from(lighting: &LightingDesc) -> Self {
        let sun = &lighting.directional;
        let lamp = &lighting.point;
        Self {
            sun_direction: vec4(sun.direction, 0.0),
            sun_ambient: vec4(sun.ambient, 1.0),
            sun_diffuse: vec4(sun.diffuse, 1.0),
            sun_specular: vec4(sun.specular, 1.0),
            lamp_position: vec4(lamp.position, 1.0),
            lamp_ambient: vec4(lamp.ambient, 1.0),
            lamp_diffuse: vec4(lamp.diffuse, 1.0),
            lamp_specular: vec4(lamp.specular, 1.0),
            lamp_attenuation: [lamp.constant, lamp.linear, lamp.quadratic, 0.0],
        }
    }
}

/// Material block, `@group(1) @binding(3)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub tint: [f32; 4],
    /// x: overlay mix, y: shininess, z: specular strength.
    pub params: [f32; 4],
}

impl From<&MaterialDesc> for MaterialUniforms {
    fn from(material: &MaterialDesc) -> Self {
        Self {
            tint: material.tint,
            params: [
                material.overlay_mix,
                material.shininess,
                material.specular_strength,
                0.0,
            ],
        }
    }
}

/// Per-instance model matrix, vertex locations 3..=6.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
}

impl From<Mat4> for InstanceData {
    fn from(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// One draw pass resolved for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDraw {
    pub label: String,
    pub mesh: MeshKind,
    pub shading: ShadingModel,
    pub material: MaterialDesc,
    pub models: Vec<Mat4>,
}

/// Everything needed to draw one frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub preset: PipelinePreset,
    pub clear_color: [f64; 4],
    pub frame: FrameUniforms,
    pub lights: LightUniforms,
    pub draws: Vec<PlannedDraw>,
}

impl FramePlan {
    pub fn instance_count(&self) -> usize {
        self.draws.iter().map(|d| d.models.len()).sum()
    }

    /// Model matrices of every draw, concatenated in draw order.
    pub fn instances(&self) -> Vec<InstanceData> {
        self.draws
            .iter()
            .flat_map(|d| d.models.iter().copied().map(InstanceData::from))
            .collect()
    }

    /// Range of [`FramePlan::instances`] belonging to each draw.
    pub fn instance_ranges(&self) -> Vec<Range<u32>> {
        let mut start = 0u32;
        self.draws
            .iter()
            .map(|d| {
                let end = start + d.models.len() as u32;
                let range = start..end;
                start = end;
                range
            })
            .collect()
    }
}

/// Width over height, guarding against a minimised (zero-height) window.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
