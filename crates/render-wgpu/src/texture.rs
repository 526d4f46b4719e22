use cubelab_assets::ImageData;
use std::path::{Path, PathBuf};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Where an uploaded texture's pixels came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureOrigin {
    File(PathBuf),
    Fallback,
}

/// A sampled 2D colour texture with a full mip chain.
pub struct Texture {
    view: wgpu::TextureView,
    origin: TextureOrigin,
}

impl Texture {
    /// Upload `image` and every level of its mip chain.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &ImageData,
    ) -> Self {
        let levels = image.mip_chain();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width.max(1),
                height: image.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            view,
            origin: TextureOrigin::Fallback,
        }
    }

    /// Load an image file, substituting `fallback` if it cannot be read or
    /// decoded, or is larger than the device allows.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        fallback: &ImageData,
    ) -> Self {
        let path = path.as_ref();
        let label = path.display().to_string();
        let max_dimension = device.limits().max_texture_dimension_2d;
        match ImageData::open(path) {
            Ok(image) if fits_device(&image, max_dimension) => {
                tracing::info!(
                    "loaded texture {} ({}x{}, alpha: {})",
                    path.display(),
                    image.width,
                    image.height,
                    image.has_alpha
                );
                let mut texture = Self::from_image(device, queue, &label, &image);
                texture.origin = TextureOrigin::File(path.to_path_buf());
                texture
            }
            Ok(image) => {
                tracing::warn!(
                    "texture {} is {}x{}, over the {max_dimension} limit; using fallback",
                    path.display(),
                    image.width,
                    image.height
                );
                Self::from_image(device, queue, &label, fallback)
            }
            Err(e) => {
                tracing::warn!("failed to load texture: {e}; using fallback");
                Self::from_image(device, queue, &label, fallback)
            }
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn origin(&self) -> &TextureOrigin {
        &self.origin
    }

    /// Repeat wrapping, linear filtering, linear between mip levels.
    pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        })
    }

    pub fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// Whether both sides of `image` are within the device's 2D texture limit.
fn fits_device(image: &ImageData, max_dimension: u32) -> bool {
    image.width <= max_dimension && image.height <= max_dimension
}
