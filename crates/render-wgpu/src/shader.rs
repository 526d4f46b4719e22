use crate::texture::DEPTH_FORMAT;
use crate::vertex_array::VertexArray;
use cubelab_assets::ShaderKind;
use cubelab_render::ShadingModel;

/// Shader source used for each shading model.
pub fn shader_kind(shading: ShadingModel) -> ShaderKind {
    match shading {
        ShadingModel::Textured => ShaderKind::Textured,
        ShadingModel::Phong => ShaderKind::Phong,
        ShadingModel::Emissive => ShaderKind::Lamp,
    }
}

/// A compiled WGSL module linked into a render pipeline.
///
/// Every program expects the `vs_main`/`fs_main` entry points, the shared
/// vertex + instance layout, and the renderer's two bind groups.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Build the pipeline from `source`. If the device rejects it, log the
    /// validation error and build from the embedded copy of `kind` instead.
    pub fn new(
        device: &wgpu::Device,
        kind: ShaderKind,
        source: &str,
        layout: &wgpu::PipelineLayout,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        let label = kind.file_name();
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = build_pipeline(device, label, source, layout, color_format);
        let pipeline = match pollster::block_on(device.pop_error_scope()) {
            None => pipeline,
            Some(e) if source != kind.embedded_source() => {
                tracing::warn!("shader {label} rejected: {e}; using embedded copy");
                build_pipeline(device, label, kind.embedded_source(), layout, color_format)
            }
            Some(e) => {
                tracing::error!("embedded shader {label} rejected: {e}");
                pipeline
            }
        };

        tracing::debug!("built pipeline for {label}");
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[VertexArray::vertex_layout(), VertexArray::instance_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        // The plane is viewed from both sides.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shading_model_has_a_shader() {
        assert_eq!(shader_kind(ShadingModel::Textured), ShaderKind::Textured);
        assert_eq!(shader_kind(ShadingModel::Phong), ShaderKind::Phong);
        assert_eq!(shader_kind(ShadingModel::Emissive), ShaderKind::Lamp);
    }
}
