//! Owned GPU buffers. Each wrapper holds exactly one `wgpu::Buffer`, released on drop.

use bytemuck::Pod;
use cubelab_render::InstanceData;
use std::marker::PhantomData;
use wgpu::util::DeviceExt;

/// Immutable vertex data.
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    len: u32,
}

impl VertexBuffer {
    pub fn new<T: Pod>(device: &wgpu::Device, label: &str, vertices: &[T]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            len: vertices.len() as u32,
        }
    }

    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// Immutable 16-bit index data.
pub struct ElementBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

impl ElementBuffer {
    pub const FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;

    pub fn new(device: &wgpu::Device, label: &str, indices: &[u16]) -> Self {
        // Buffer writes must be a multiple of 4 bytes; pad odd index counts.
        let mut padded = indices.to_vec();
        if padded.len() % 2 == 1 {
            padded.push(0);
        }
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&padded),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            buffer,
            count: indices.len() as u32,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// A uniform block of type `T`, rewritten from the host each frame.
pub struct UniformBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str, initial: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            _marker: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

/// Pre-allocated per-instance model matrices.
pub struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: u32,
}

impl InstanceBuffer {
    pub fn new(device: &wgpu::Device, label: &str, capacity: u32) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    /// Upload as many instances as fit. Returns the number written.
    pub fn write(&self, queue: &wgpu::Queue, instances: &[InstanceData]) -> u32 {
        let count = instances.len().min(self.capacity as usize);
        if count < instances.len() {
            tracing::warn!(
                "{} instances exceed capacity {}, dropping the rest",
                instances.len(),
                self.capacity
            );
        }
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&instances[..count]));
        }
        count as u32
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}
