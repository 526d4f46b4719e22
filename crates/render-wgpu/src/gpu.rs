use crate::buffer::{InstanceBuffer, UniformBuffer};
use crate::shader::{ShaderProgram, shader_kind};
use crate::texture::{Texture, TextureOrigin};
use crate::vertex_array::VertexArray;
use bytemuck::Zeroable;
use cubelab_assets::{ImageData, ShaderLibrary, geometry};
use cubelab_common::{AssetsConfig, PipelinePreset, TextureKey};
use cubelab_render::{
    FramePlan, FrameUniforms, LightUniforms, LightingDesc, MaterialDesc, MaterialUniforms,
    MeshKind, ShadingModel,
};
use std::collections::BTreeMap;

const MAX_INSTANCES: u32 = 1024;

/// Pixels used when a texture file is missing. Base textures get a visible
/// checker; overlays turn fully transparent so they blend away.
fn fallback_image(key: TextureKey) -> ImageData {
    match key {
        TextureKey::Container => ImageData::checker(64, 8),
        TextureKey::Face => ImageData::solid(1, 1, [0, 0, 0, 0]),
    }
}

/// Per-pass material: its uniform block and the group(1) bind group.
struct MaterialBinding {
    uniforms: UniformBuffer<MaterialUniforms>,
    bind_group: wgpu::BindGroup,
}

/// wgpu renderer for [`FramePlan`]s.
pub struct WgpuRenderer {
    programs: BTreeMap<ShadingModel, ShaderProgram>,
    meshes: BTreeMap<MeshKind, VertexArray>,
    frame_uniforms: UniformBuffer<FrameUniforms>,
    light_uniforms: UniformBuffer<LightUniforms>,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    textures: BTreeMap<TextureKey, Texture>,
    blank_overlay: Texture,
    sampler: wgpu::Sampler,
    materials: Vec<MaterialBinding>,
    prepared: Option<PipelinePreset>,
    instances: InstanceBuffer,
    depth_view: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        shaders: &ShaderLibrary,
        assets: &AssetsConfig,
    ) -> Self {
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                uniform_entry(3, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let programs = [
            ShadingModel::Textured,
            ShadingModel::Phong,
            ShadingModel::Emissive,
        ]
        .into_iter()
        .map(|shading| {
            let kind = shader_kind(shading);
            let program = ShaderProgram::new(
                device,
                kind,
                shaders.source(kind),
                &pipeline_layout,
                surface_format,
            );
            (shading, program)
        })
        .collect();

        let meshes = BTreeMap::from([
            (MeshKind::Cube, VertexArray::from_mesh(device, "cube", &geometry::cube())),
            (MeshKind::Plane, VertexArray::from_mesh(device, "plane", &geometry::plane())),
        ]);

        let frame_uniforms = UniformBuffer::new(device, "frame_uniforms", &FrameUniforms::zeroed());
        let light_uniforms = UniformBuffer::new(
            device,
            "light_uniforms",
            &LightUniforms::from(&LightingDesc::default()),
        );
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_uniforms.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_uniforms.binding(),
                },
            ],
        });

        let textures = TextureKey::ALL
            .into_iter()
            .map(|key| {
                let texture =
                    Texture::load(device, queue, assets.texture_path(key), &fallback_image(key));
                (key, texture)
            })
            .collect();
        let blank_overlay = Texture::from_image(
            device,
            queue,
            "blank_overlay",
            &ImageData::solid(1, 1, [0, 0, 0, 0]),
        );

        Self {
            programs,
            meshes,
            frame_uniforms,
            light_uniforms,
            frame_bind_group,
            material_layout,
            textures,
            blank_overlay,
            sampler: Texture::create_sampler(device),
            materials: Vec::new(),
            prepared: None,
            instances: InstanceBuffer::new(device, "instance_buffer", MAX_INSTANCES),
            depth_view: Texture::create_depth_view(device, width, height),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = Texture::create_depth_view(device, width, height);
    }

    /// Which textures came from disk and which fell back.
    pub fn texture_origins(&self) -> Vec<(TextureKey, TextureOrigin)> {
        self.textures
            .iter()
            .map(|(key, texture)| (*key, texture.origin().clone()))
            .collect()
    }

    /// Render one frame: clear colour and depth, then every draw in plan order.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) {
        if self.prepared != Some(plan.preset) || self.materials.len() != plan.draws.len() {
            self.prepare_materials(device, plan);
        }

        self.frame_uniforms.write(queue, &plan.frame);
        self.light_uniforms.write(queue, &plan.lights);
        for (binding, draw) in self.materials.iter().zip(&plan.draws) {
            binding
                .uniforms
                .write(queue, &MaterialUniforms::from(&draw.material));
        }
        let written = self.instances.write(queue, &plan.instances());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = plan.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for ((draw, range), material) in plan
                .draws
                .iter()
                .zip(plan.instance_ranges())
                .zip(&self.materials)
            {
                let range = range.start.min(written)..range.end.min(written);
                let (Some(program), Some(mesh)) =
                    (self.programs.get(&draw.shading), self.meshes.get(&draw.mesh))
                else {
                    continue;
                };
                pass.set_pipeline(program.pipeline());
                pass.set_bind_group(1, &material.bind_group, &[]);
                mesh.draw(&mut pass, &self.instances, range);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn prepare_materials(&mut self, device: &wgpu::Device, plan: &FramePlan) {
        let materials = plan
            .draws
            .iter()
            .map(|draw| self.material_binding(device, &draw.label, &draw.material))
            .collect();
        self.materials = materials;
        self.prepared = Some(plan.preset);
        tracing::debug!(
            "prepared {} material bindings for '{}'",
            self.materials.len(),
            plan.preset
        );
    }

    fn material_binding(
        &self,
        device: &wgpu::Device,
        label: &str,
        material: &MaterialDesc,
    ) -> MaterialBinding {
        let uniforms = UniformBuffer::new(
            device,
            &format!("{label}_material"),
            &MaterialUniforms::from(material),
        );
        let base = self.texture(material.base);
        let overlay = material
            .overlay
            .map(|key| self.texture(key))
            .unwrap_or(&self.blank_overlay);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(base.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(overlay.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: uniforms.binding(),
                },
            ],
        });
        MaterialBinding {
            uniforms,
            bind_group,
        }
    }

    fn texture(&self, key: TextureKey) -> &Texture {
        self.textures.get(&key).unwrap_or(&self.blank_overlay)
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_base_is_opaque_checker() {
        let image = fallback_image(TextureKey::Container);
        assert_eq!((image.width, image.height), (64, 64));
        assert!(image.pixels.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn fallback_overlay_is_transparent() {
        let image = fallback_image(TextureKey::Face);
        assert_eq!(image.pixels, vec![0, 0, 0, 0]);
    }
}
