use std::fmt;
use std::path::Path;

use image::RgbaImage;

use crate::colors::{self, rgba};

/// Errors raised while building a [`Texture`].
#[derive(Debug)]
pub enum TextureError {
    /// The image could not be opened or decoded.
    Image(image::ImageError),
    /// Width or height is zero; a texture needs at least one sample.
    Empty { width: u32, height: u32 },
    /// The pixel slice does not hold exactly `width * height` samples.
    DataLength { expected: usize, actual: usize },
}

impl From<image::ImageError> for TextureError {
    fn from(err: image::ImageError) -> Self {
        TextureError::Image(err)
    }
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Image(err) => write!(f, "image error: {}", err),
            TextureError::Empty { width, height } => {
                write!(f, "texture must be at least 1x1, got {}x{}", width, height)
            }
            TextureError::DataLength { expected, actual } => write!(
                f,
                "texture data holds {} samples, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Image(err) => Some(err),
            _ => None,
        }
    }
}

/// A 2D grid of ARGB samples.
///
/// Construction guarantees at least one sample, so sampling never has to
/// handle an empty grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    data: Vec<u32>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Wraps row-major ARGB samples.
    pub fn new(width: u32, height: u32, data: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(TextureError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A 1x1 texture holding a single color.
    pub fn solid(color: u32) -> Self {
        Self {
            data: vec![color],
            width: 1,
            height: 1,
        }
    }

    /// A square checkerboard of `size` pixels with `cell`-sized squares.
    pub fn checkerboard(size: u32, cell: u32, a: u32, b: u32) -> Result<Self, TextureError> {
        let cell = cell.max(1);
        let data = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .map(|(x, y)| if (x / cell + y / cell) % 2 == 0 { a } else { b })
            .collect();
        Self::new(size, size, data)
    }

    pub fn from_image(img: &RgbaImage) -> Result<Self, TextureError> {
        let (width, height) = img.dimensions();
        let data = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                rgba(r, g, b, a)
            })
            .collect();
        Self::new(width, height, data)
    }

    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        Self::from_image(&img)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The sample at integer coordinates. Panics when out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> u32 {
        assert!(
            x < self.width && y < self.height,
            "texel ({}, {}) outside {}x{} texture",
            x,
            y,
            self.width,
            self.height
        );
        self.data[(y * self.width + x) as usize]
    }

    /// Nearest-neighbor lookup with repeat wrapping.
    ///
    /// Both coordinates are wrapped into [0, 1) and mapped onto
    /// `[0, width-1] x [0, height-1]`. V is not flipped: (0, 0) is the
    /// top-left sample.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        // rem_euclid can round up to exactly 1.0 for tiny negatives
        let x = ((u * (self.width - 1) as f32).round() as u32).min(self.width - 1);
        let y = ((v * (self.height - 1) as f32).round() as u32).min(self.height - 1);

        self.data[(y * self.width + x) as usize]
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::solid(colors::TEXTURE_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::rgb;

    fn gradient() -> Texture {
        // 5x1 strip, each texel a distinct red value
        let data = (0..5).map(|i| rgb(i * 10, 0, 0)).collect();
        Texture::new(5, 1, data).unwrap()
    }

    #[test]
    fn test_empty_texture_rejected() {
        assert!(matches!(
            Texture::new(0, 4, vec![]),
            Err(TextureError::Empty { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_data_length_checked() {
        assert!(matches!(
            Texture::new(2, 2, vec![0; 3]),
            Err(TextureError::DataLength {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_sample_endpoints() {
        let tex = gradient();
        assert_eq!(tex.sample(0.0, 0.0), rgb(0, 0, 0));
        assert_eq!(tex.sample(0.5, 0.0), rgb(20, 0, 0));
        assert_eq!(tex.sample(0.99, 0.0), rgb(40, 0, 0));
    }

    #[test]
    fn test_uv_wraps_for_tiling() {
        let tex = gradient();
        assert_eq!(tex.sample(1.25, 0.0), tex.sample(0.25, 0.0));
        assert_eq!(tex.sample(-0.75, 3.0), tex.sample(0.25, 0.0));
    }

    #[test]
    fn test_solid_samples_everywhere() {
        let tex = Texture::solid(rgb(1, 2, 3));
        assert_eq!(tex.sample(0.7, 12.3), rgb(1, 2, 3));
        assert_eq!(tex.get_pixel(0, 0), rgb(1, 2, 3));
    }

    #[test]
    fn test_checkerboard_cells() {
        let tex = Texture::checkerboard(4, 2, colors::WHITE, colors::BLACK).unwrap();
        assert_eq!(tex.get_pixel(0, 0), colors::WHITE);
        assert_eq!(tex.get_pixel(2, 0), colors::BLACK);
        assert_eq!(tex.get_pixel(2, 2), colors::WHITE);
    }

    #[test]
    fn test_from_image_keeps_channels() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(1, 0, image::Rgba([10, 20, 30, 40]));
        let tex = Texture::from_image(&img).unwrap();
        assert_eq!(tex.get_pixel(1, 0), rgba(10, 20, 30, 40));
    }
}
