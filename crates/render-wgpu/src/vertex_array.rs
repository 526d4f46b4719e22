use crate::buffer::{ElementBuffer, InstanceBuffer, VertexBuffer};
use cubelab_assets::{MeshData, Vertex};
use cubelab_render::InstanceData;
use std::ops::Range;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x2,
];

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

/// A mesh on the GPU: vertex buffer, its layout, and an optional element buffer.
///
/// Drawing binds both buffers plus the shared instance buffer, then issues an
/// indexed or plain draw depending on whether elements are present.
pub struct VertexArray {
    vertices: VertexBuffer,
    elements: Option<ElementBuffer>,
}

impl VertexArray {
    pub fn from_mesh(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertices = VertexBuffer::new(device, &format!("{label}_vertices"), &mesh.vertices);
        let elements = mesh
            .is_indexed()
            .then(|| ElementBuffer::new(device, &format!("{label}_elements"), &mesh.indices));
        Self { vertices, elements }
    }

    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        }
    }

    pub fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.elements.is_some()
    }

    /// Bind this mesh and draw `instances` of it.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        instance_buffer: &InstanceBuffer,
        instances: Range<u32>,
    ) {
        if instances.is_empty() {
            return;
        }
        pass.set_vertex_buffer(0, self.vertices.slice());
        pass.set_vertex_buffer(1, instance_buffer.slice());
        match &self.elements {
            Some(elements) => {
                pass.set_index_buffer(elements.slice(), ElementBuffer::FORMAT);
                pass.draw_indexed(0..elements.count(), 0, instances);
            }
            None => pass.draw(0..self.vertices.len(), instances),
        }
    }
}
