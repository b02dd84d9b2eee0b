//! Pixel targets the rasterizer can draw into.
//!
//! The renderer never needs a live window: anything that can report its size
//! and read/write packed ARGB pixels implements [`Surface`].

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::colors::{rgba, unpack_rgba};

/// A 2D grid of ARGB8888 pixels.
///
/// Coordinates are signed so callers can hand over unclipped positions;
/// writes outside the grid are silently ignored.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// The color at (x, y), or `None` if out of bounds.
    fn get_pixel(&self, x: i32, y: i32) -> Option<u32>;

    fn set_pixel(&mut self, x: i32, y: i32, color: u32);

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i32 && y < self.height() as i32
    }
}

/// An owned, row-major pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: Vec<u32>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, fill: u32) -> Self {
        Self {
            data: vec![fill; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: u32) {
        self.data.fill(color);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    /// Number of pixels that differ from `background`.
    pub fn count_not(&self, background: u32) -> usize {
        self.data.iter().filter(|&&c| c != background).count()
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(unpack_rgba(self.data[(y * self.width + x) as usize]))
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y)
            .then(|| (y as u32 * self.width + x as u32) as usize)
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.data[i])
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = color;
        }
    }
}

impl Surface for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.get_pixel_checked(x.try_into().ok()?, y.try_into().ok()?)
            .map(|p| {
                let [r, g, b, a] = p.0;
                rgba(r, g, b, a)
            })
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if Surface::contains(self, x, y) {
            self.put_pixel(x as u32, y as u32, Rgba(unpack_rgba(color)));
        }
    }
}
