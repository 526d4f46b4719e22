//! Data-driven render pipeline descriptions.
//!
//! A [`RenderPipelineDesc`] is an ordered list of draw passes plus a clear
//! colour. Each built-in [`PipelinePreset`] is one such list; the frame loop
//! never hard-codes draw calls.

use crate::camera::FlyCamera;
use crate::frame::{FramePlan, FrameUniforms, LightUniforms, PlannedDraw};
use crate::lighting::LightingDesc;
use crate::scene::SceneParams;
use cubelab_common::{PipelinePreset, TextureKey, Transform};
use glam::{Mat4, Quat, Vec3};

/// Geometry a pass draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKind {
    /// 36-vertex unit cube, drawn without indices.
    Cube,
    /// Unit XZ quad, drawn through an index buffer.
    Plane,
}

/// Which shader program a pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShadingModel {
    Textured,
    Phong,
    Emissive,
}

impl ShadingModel {
    pub fn is_lit(self) -> bool {
        matches!(self, ShadingModel::Phong)
    }
}

/// Textures and constants bound with a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub base: TextureKey,
    pub overlay: Option<TextureKey>,
    /// Weight of the overlay where it is opaque.
    pub overlay_mix: f32,
    pub tint: [f32; 4],
    pub shininess: f32,
    pub specular_strength: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            base: TextureKey::Container,
            overlay: None,
            overlay_mix: 0.0,
            tint: [1.0; 4],
            shininess: 32.0,
            specular_strength: 0.5,
        }
    }
}

impl MaterialDesc {
    /// Crate with the smiley blended on top.
    pub fn crate_with_face() -> Self {
        Self {
            overlay: Some(TextureKey::Face),
            overlay_mix: 0.2,
            ..Self::default()
        }
    }

    /// Solid emissive colour.
    pub fn emissive(rgb: [f32; 3]) -> Self {
        Self {
            tint: [rgb[0], rgb[1], rgb[2], 1.0],
            ..Self::default()
        }
    }
}

/// Where a pass gets its model matrices from each frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// `base` followed by the scene's accumulated spin.
    Spinning(Transform),
    /// A constant transform.
    Fixed(Transform),
    /// One instance per position, each spun by the scene rotation plus `step_deg * index`.
    Field { positions: Vec<Vec3>, step_deg: f32 },
    /// A small cube at the point light.
    LightMarker { scale: f32 },
}

impl ModelSource {
    pub fn resolve(&self, scene: &SceneParams, lighting: &LightingDesc) -> Vec<Mat4> {
        match self {
            ModelSource::Spinning(base) => vec![base.matrix() * scene.model_matrix()],
            ModelSource::Fixed(t) => vec![t.matrix()],
            ModelSource::Field {
                positions,
                step_deg,
            } => positions
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    Mat4::from_translation(*p)
                        * Mat4::from_quat(scene.rotation_with_offset(step_deg * i as f32))
                })
                .collect(),
            ModelSource::LightMarker { scale } => vec![Mat4::from_scale_rotation_translation(
                Vec3::splat(*scale),
                Quat::IDENTITY,
                lighting.point.position,
            )],
        }
    }
}

/// One entry of a pipeline description.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPass {
    pub label: String,
    pub mesh: MeshKind,
    pub shading: ShadingModel,
    pub material: MaterialDesc,
    pub models: ModelSource,
}

/// Named, ordered list of draw passes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPipelineDesc {
    pub preset: PipelinePreset,
    pub clear_color: [f64; 4],
    pub passes: Vec<DrawPass>,
}

/// Cube positions of the `field` preset.
pub const FIELD_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

impl RenderPipelineDesc {
    pub fn preset(preset: PipelinePreset) -> Self {
        match preset {
            PipelinePreset::Textured => Self::textured(),
            PipelinePreset::Quad => Self::quad(),
            PipelinePreset::Lit => Self::lit(),
            PipelinePreset::Field => Self::field(),
        }
    }

    fn textured() -> Self {
        Self {
            preset: PipelinePreset::Textured,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            passes: vec![DrawPass {
                label: "cube".into(),
                mesh: MeshKind::Cube,
                shading: ShadingModel::Textured,
                material: MaterialDesc::crate_with_face(),
                models: ModelSource::Spinning(Transform::default()),
            }],
        }
    }

    fn quad() -> Self {
        // Stand the XZ plane upright so it faces the camera at +Z.
        let upright = Transform {
            rotation: Quat::from_rotation_x(90.0_f32.to_radians()),
            ..Transform::default()
        };
        Self {
            preset: PipelinePreset::Quad,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            passes: vec![DrawPass {
                label: "quad".into(),
                mesh: MeshKind::Plane,
                shading: ShadingModel::Textured,
                material: MaterialDesc::crate_with_face(),
                models: ModelSource::Spinning(upright),
            }],
        }
    }

    fn lit() -> Self {
        let floor = Transform {
            position: Vec3::new(0.0, -1.5, 0.0),
            scale: Vec3::new(10.0, 1.0, 10.0),
            ..Transform::default()
        };
        Self {
            preset: PipelinePreset::Lit,
            clear_color: [0.1, 0.1, 0.1, 1.0],
            passes: vec![
                DrawPass {
                    label: "floor".into(),
                    mesh: MeshKind::Plane,
                    shading: ShadingModel::Phong,
                    material: MaterialDesc {
                        tint: [0.6, 0.6, 0.6, 1.0],
                        specular_strength: 0.1,
                        ..MaterialDesc::default()
                    },
                    models: ModelSource::Fixed(floor),
                },
                DrawPass {
                    label: "cube".into(),
                    mesh: MeshKind::Cube,
                    shading: ShadingModel::Phong,
                    material: MaterialDesc::default(),
                    models: ModelSource::Spinning(Transform::default()),
                },
                DrawPass {
                    label: "lamp".into(),
                    mesh: MeshKind::Cube,
                    shading: ShadingModel::Emissive,
                    material: MaterialDesc::emissive([1.0, 1.0, 1.0]),
                    models: ModelSource::LightMarker { scale: 0.2 },
                },
            ],
        }
    }

    fn field() -> Self {
        Self {
            preset: PipelinePreset::Field,
            clear_color: [0.05, 0.05, 0.08, 1.0],
            passes: vec![
                DrawPass {
                    label: "cubes".into(),
                    mesh: MeshKind::Cube,
                    shading: ShadingModel::Phong,
                    material: MaterialDesc::default(),
                    models: ModelSource::Field {
                        positions: FIELD_POSITIONS.to_vec(),
                        step_deg: 20.0,
                    },
                },
                DrawPass {
                    label: "lamp".into(),
                    mesh: MeshKind::Cube,
                    shading: ShadingModel::Emissive,
                    material: MaterialDesc::emissive([1.0, 0.95, 0.8]),
                    models: ModelSource::LightMarker { scale: 0.2 },
                },
            ],
        }
    }

    /// Whether any pass reads the light block.
    pub fn uses_lighting(&self) -> bool {
        self.passes.iter().any(|p| p.shading.is_lit())
    }

    /// Resolve every pass against the current camera, scene and lights.
    pub fn plan(
        &self,
        camera: &FlyCamera,
        scene: &SceneParams,
        lighting: &LightingDesc,
        aspect: f32,
    ) -> FramePlan {
        let draws = self
            .passes
            .iter()
            .map(|pass| PlannedDraw {
                label: pass.label.clone(),
                mesh: pass.mesh,
                shading: pass.shading,
                material: pass.material.clone(),
                models: pass.models.resolve(scene, lighting),
            })
            .collect();
        FramePlan {
            preset: self.preset,
            clear_color: self.clear_color,
            frame: FrameUniforms::from_camera(camera, aspect),
            lights: LightUniforms::from(lighting),
            draws,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(preset: PipelinePreset) -> FramePlan {
        RenderPipelineDesc::preset(preset).plan(
            &FlyCamera::default(),
            &SceneParams::default(),
            &LightingDesc::default(),
            800.0 / 600.0,
        )
    }

    #[test]
    fn every_preset_round_trips_its_name() {
        for preset in PipelinePreset::ALL {
            assert_eq!(RenderPipelineDesc::preset(preset).preset, preset);
        }
    }

    #[test]
    fn textured_is_one_unlit_cube() {
        let desc = RenderPipelineDesc::preset(PipelinePreset::Textured);
        assert!(!desc.uses_lighting());
        let plan = plan(PipelinePreset::Textured);
        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.draws[0].mesh, MeshKind::Cube);
        assert_eq!(plan.draws[0].material.overlay, Some(TextureKey::Face));
        assert_eq!(plan.clear_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn quad_uses_index_buffer_mesh() {
        let plan = plan(PipelinePreset::Quad);
        assert_eq!(plan.draws[0].mesh, MeshKind::Plane);
        // The upright quad's normal faces +Z.
        let normal = plan.draws[0].models[0].transform_vector3(Vec3::Y);
        assert!(normal.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn lit_draws_floor_cube_and_lamp() {
        let desc = RenderPipelineDesc::preset(PipelinePreset::Lit);
        assert!(desc.uses_lighting());
        let plan = plan(PipelinePreset::Lit);
        let labels: Vec<&str> = plan.draws.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["floor", "cube", "lamp"]);
        assert_eq!(plan.instance_count(), 3);
    }

    #[test]
    fn lamp_follows_point_light() {
        let mut lighting = LightingDesc::default();
        lighting.point.position = Vec3::new(-4.0, 2.0, 1.0);
        let plan = RenderPipelineDesc::preset(PipelinePreset::Lit).plan(
            &FlyCamera::default(),
            &SceneParams::default(),
            &lighting,
            1.0,
        );
        let lamp = plan.draws.iter().find(|d| d.label == "lamp").unwrap();
        let centre = lamp.models[0].transform_point3(Vec3::ZERO);
        assert!(centre.abs_diff_eq(lighting.point.position, 1e-5));
        assert_eq!(plan.lights.lamp_position, [-4.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn field_places_ten_cubes() {
        let plan = plan(PipelinePreset::Field);
        let cubes = &plan.draws[0];
        assert_eq!(cubes.models.len(), FIELD_POSITIONS.len());
        for (model, pos) in cubes.models.iter().zip(FIELD_POSITIONS) {
            assert!(model.transform_point3(Vec3::ZERO).abs_diff_eq(pos, 1e-5));
        }
        // Each cube gets its own rotation offset.
        assert_ne!(cubes.models[1].col(0), cubes.models[2].col(0));
    }

    #[test]
    fn spinning_models_follow_scene_rotation() {
        let desc = RenderPipelineDesc::preset(PipelinePreset::Textured);
        let mut scene = SceneParams::default();
        let camera = FlyCamera::default();
        let lighting = LightingDesc::default();
        let before = desc.plan(&camera, &scene, &lighting, 1.0);
        scene.advance(0.5);
        let after = desc.plan(&camera, &scene, &lighting, 1.0);
        assert_ne!(before.draws[0].models[0], after.draws[0].models[0]);
        assert_eq!(after.draws[0].models[0], scene.model_matrix());
    }

    #[test]
    fn instance_ranges_partition_instances() {
        let plan = plan(PipelinePreset::Field);
        let ranges = plan.instance_ranges();
        assert_eq!(ranges, vec![0..10, 10..11]);
        assert_eq!(plan.instances().len(), plan.instance_count());
    }

    #[test]
    fn plan_carries_camera_projection() {
        let mut camera = FlyCamera::default();
        camera.set_fov(45.0);
        let plan = RenderPipelineDesc::preset(PipelinePreset::Textured).plan(
            &camera,
            &SceneParams::default(),
            &LightingDesc::default(),
            2.0,
        );
        assert_eq!(
            plan.frame.projection,
            camera.projection_matrix(2.0).to_cols_array_2d()
        );
    }
}
