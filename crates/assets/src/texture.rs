use crate::AssetError;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::path::Path;

/// Decoded RGBA8 image, rows ordered bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Whether the source image carried an alpha channel.
    pub has_alpha: bool,
}

impl ImageData {
    /// Decode an image file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_dynamic(img)?;
        tracing::debug!(
            "decoded {} ({}x{}, alpha={})",
            path.display(),
            data.width,
            data.height,
            data.has_alpha
        );
        Ok(data)
    }

    /// Decode an in-memory encoded image (png, jpeg).
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        Self::from_dynamic(image::load_from_memory(bytes)?)
    }

    fn from_dynamic(img: DynamicImage) -> Result<Self, AssetError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(AssetError::Empty);
        }
        let has_alpha = img.color().has_alpha();
        // Texture coordinates put v = 0 at the bottom edge.
        let rgba = img.flipv().to_rgba8();
        Ok(Self::from_rgba(rgba, has_alpha))
    }

    fn from_rgba(rgba: RgbaImage, has_alpha: bool) -> Self {
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            pixels: rgba.into_raw(),
            has_alpha,
        }
    }

    /// A single-colour image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            width,
            height,
            pixels,
            has_alpha: rgba[3] != 255,
        }
    }

    /// Two-tone checkerboard, used in place of a texture that failed to load.
    pub fn checker(size: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let c = if ((x / cell) + (y / cell)) % 2 == 0 {
                    220
                } else {
                    40
                };
                pixels.extend_from_slice(&[c, c, 255, 255]);
            }
        }
        Self {
            width: size,
            height: size,
            pixels,
            has_alpha: false,
        }
    }

    /// Number of levels in a full mip chain down to 1x1.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// Full mip chain, level 0 first. Each level halves both sides, never below 1.
    pub fn mip_chain(&self) -> Vec<ImageData> {
        let mut levels = vec![self.clone()];
        let Some(base) = RgbaImage::from_raw(self.width, self.height, self.pixels.clone()) else {
            return levels;
        };
        let (mut w, mut h) = (self.width, self.height);
        while w > 1 || h > 1 {
            w = (w / 2).max(1);
            h = (h / 2).max(1);
            let level = image::imageops::resize(&base, w, h, FilterType::Triangle);
            levels.push(Self::from_rgba(level, self.has_alpha));
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn encode_png(img: RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decode_flips_rows() {
        // Top row red, bottom row blue.
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        let data = ImageData::decode(&encode_png(img)).unwrap();

        assert_eq!((data.width, data.height), (1, 2));
        assert_eq!(&data.pixels[0..4], &[0, 0, 255, 255]);
        assert_eq!(&data.pixels[4..8], &[255, 0, 0, 255]);
        assert!(data.has_alpha);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = ImageData::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("container.jpg");
        let err = ImageData::open(&path).unwrap_err();
        assert!(err.to_string().contains("container.jpg"));
    }

    #[test]
    fn open_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.png");
        std::fs::write(&path, encode_png(RgbaImage::new(4, 4))).unwrap();
        let data = ImageData::open(&path).unwrap();
        assert_eq!(data.pixels.len(), 4 * 4 * 4);
    }

    #[test]
    fn mip_chain_halves_to_one() {
        let data = ImageData::checker(8, 2);
        let chain = data.mip_chain();
        let sizes: Vec<(u32, u32)> = chain.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(8, 8), (4, 4), (2, 2), (1, 1)]);
        assert_eq!(chain.len() as u32, data.mip_level_count());
        for level in &chain {
            assert_eq!(level.pixels.len(), (level.width * level.height * 4) as usize);
        }
    }

    #[test]
    fn mip_chain_handles_non_square() {
        let data = ImageData::solid(5, 2, [10, 20, 30, 255]);
        let sizes: Vec<(u32, u32)> = data.mip_chain().iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(5, 2), (2, 1), (1, 1)]);
        assert_eq!(data.mip_level_count(), 3);
    }

    #[test]
    fn solid_fills_every_pixel() {
        let data = ImageData::solid(2, 2, [0, 0, 0, 0]);
        assert_eq!(data.pixels, vec![0; 16]);
        assert!(data.has_alpha);
    }

    #[test]
    fn checker_alternates() {
        let data = ImageData::checker(4, 2);
        assert_eq!(data.pixels[0], 220);
        // Third pixel of the first row starts the next cell.
        assert_eq!(data.pixels[2 * 4], 40);
    }
}
