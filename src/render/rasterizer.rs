//! Depth-tested, perspective-correct triangle fill.
//!
//! # Algorithm Overview
//!
//! 1. Compute the triangle's screen bounding box and move the triangle into a
//!    local frame whose origin is the box's top-left corner
//! 2. Pre-divide each vertex's UV by its depth relative to the nearest vertex
//! 3. For every pixel of the box that lies on the surface, resolve its
//!    barycentric weights; pixels with a negative weight are outside
//! 4. Interpolate `1/z`, take its reciprocal and run the depth test
//! 5. Interpolate the pre-divided UVs, undo the division with the pixel's own
//!    depth, wrap into [0, 1) and sample the texture
//! 6. Composite the winning pixels onto the surface
//!
//! # Perspective Correction
//!
//! Screen-space positions are a projective image of view space, so an
//! attribute that is linear across the triangle in view space is *not*
//! linear across the triangle on screen. `attr/z` and `1/z` are, though:
//!
//! ```text
//! z(P)    = 1 / (b0/z0 + b1/z1 + b2/z2)
//! attr(P) = z(P) * (b0*a0/z0 + b1*a1/z1 + b2*a2/z2)
//! ```
//!
//! Dividing by `z/rz` instead of `z`, with `rz` the nearest vertex depth,
//! keeps the scaled UVs close to their original magnitude.
//!
//! # Visibility
//!
//! Only pixels that win the depth test are ever written to the local tile, so
//! the final image does not depend on the order triangles arrive in. Ties go
//! to whichever triangle got there first.

use super::barycentric::{barycentric_to_cartesian, cartesian_to_barycentric, is_degenerate, is_inside};
use super::depth::DepthBuffer;
use super::surface::Surface;
use crate::math::Vec2;
use crate::texture::Texture;

/// A projected triangle ready for rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTriangle {
    /// Integer pixel positions.
    pub points: [Vec2; 3],
    /// View-space depth of each vertex. All must be positive.
    pub depths: [f32; 3],
    pub uvs: [Vec2; 3],
}

impl ScreenTriangle {
    pub fn new(points: [Vec2; 3], depths: [f32; 3], uvs: [Vec2; 3]) -> Self {
        Self {
            points,
            depths,
            uvs,
        }
    }
}

/// What happened to a triangle handed to [`rasterize_triangle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterOutcome {
    /// Zero screen area; nothing was touched.
    Degenerate,
    /// The number of pixels that won the depth test and were written.
    Filled(usize),
}

/// Pixels won by one triangle, positioned over the surface.
struct Tile {
    x: i32,
    y: i32,
    width: usize,
    pixels: Vec<Option<u32>>,
}

impl Tile {
    fn new(x: i32, y: i32, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            pixels: vec![None; width * height],
        }
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x] = Some(color);
    }

    /// Writes every filled pixel to `surface`, returning how many there were.
    fn composite<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let mut written = 0;
        for (i, color) in self.pixels.iter().enumerate() {
            if let Some(color) = *color {
                let x = self.x + (i % self.width) as i32;
                let y = self.y + (i / self.width) as i32;
                surface.set_pixel(x, y, color);
                written += 1;
            }
        }
        written
    }
}

/// Fills `triangle` with texture samples wherever it is the nearest surface.
///
/// `depth` must share the surface's dimensions. Pixels outside the surface
/// are skipped individually; the triangle itself is never clipped.
pub fn rasterize_triangle<S: Surface + ?Sized>(
    triangle: &ScreenTriangle,
    texture: &Texture,
    depth: &mut DepthBuffer,
    surface: &mut S,
) -> RasterOutcome {
    // ─────────────────────────────────────────────────────────────────────
    // Step 1: Bounding box and local frame
    // ─────────────────────────────────────────────────────────────────────
    let [p0, p1, p2] = triangle.points;
    let min_x = p0.x.min(p1.x).min(p2.x).floor();
    let min_y = p0.y.min(p1.y).min(p2.y).floor();
    let max_x = p0.x.max(p1.x).max(p2.x).ceil();
    let max_y = p0.y.max(p1.y).max(p2.y).ceil();

    let origin = Vec2::new(min_x, min_y);
    let local = triangle.points.map(|p| p - origin);
    if is_degenerate(&local) {
        return RasterOutcome::Degenerate;
    }

    // Clip the iteration range to the surface. The float bounds may lie far
    // outside i32, so only the clipped range is ever cast.
    let start_x = min_x.max(0.0) as i32;
    let start_y = min_y.max(0.0) as i32;
    let end_x = max_x.min(surface.width() as f32 - 1.0) as i32;
    let end_y = max_y.min(surface.height() as f32 - 1.0) as i32;
    if start_x > end_x || start_y > end_y {
        return RasterOutcome::Filled(0);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Step 2: Perspective pre-division
    // ─────────────────────────────────────────────────────────────────────
    let rz = triangle.depths[0].min(triangle.depths[1]).min(triangle.depths[2]);
    let inv_depths = triangle.depths.map(|z| 1.0 / z);
    let uvs = [0, 1, 2].map(|i| triangle.uvs[i] / (triangle.depths[i] / rz));

    // ─────────────────────────────────────────────────────────────────────
    // Step 3: Per-pixel coverage, depth test and sampling
    // ─────────────────────────────────────────────────────────────────────
    let mut tile = Tile::new(
        start_x,
        start_y,
        (end_x - start_x + 1) as usize,
        (end_y - start_y + 1) as usize,
    );

    for y in start_y..=end_y {
        for x in start_x..=end_x {
            let point = Vec2::new(x as f32, y as f32) - origin;
            let Some(bary) = cartesian_to_barycentric(point, &local) else {
                continue;
            };
            if !is_inside(bary) {
                continue;
            }

            let z = 1.0
                / (bary[0] * inv_depths[0] + bary[1] * inv_depths[1] + bary[2] * inv_depths[2]);
            if !depth.test_and_set(x, y, z) {
                continue;
            }

            let uv = barycentric_to_cartesian(bary, &uvs) * (z / rz);
            tile.set(
                (x - start_x) as usize,
                (y - start_y) as usize,
                texture.sample(uv.x, uv.y),
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Step 4: Composite
    // ─────────────────────────────────────────────────────────────────────
    RasterOutcome::Filled(tile.composite(surface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{self, rgb};
    use crate::render::surface::PixelBuffer;
    use approx::assert_relative_eq;

    const SIZE: u32 = 20;

    fn target() -> (PixelBuffer, DepthBuffer) {
        (PixelBuffer::new(SIZE, SIZE, colors::BLACK), DepthBuffer::new(SIZE, SIZE))
    }

    fn flat(points: [(f32, f32); 3], depth: f32) -> ScreenTriangle {
        ScreenTriangle::new(
            points.map(|(x, y)| Vec2::new(x, y)),
            [depth; 3],
            [Vec2::ZERO; 3],
        )
    }

    #[test]
    fn test_fills_covered_pixels_only() {
        let (mut surface, mut depth) = target();
        let red = Texture::solid(rgb(255, 0, 0));
        let tri = flat([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], 5.0);

        let outcome = rasterize_triangle(&tri, &red, &mut depth, &mut surface);
        let RasterOutcome::Filled(count) = outcome else {
            panic!("expected pixels, got {:?}", outcome);
        };

        // 66 lattice points satisfy x + y <= 10; edge rounding may drop a few
        assert!((55..=66).contains(&count), "filled {}", count);
        assert_eq!(surface.count_not(colors::BLACK), count);
        assert_eq!(surface.get_pixel(2, 2), Some(rgb(255, 0, 0)));
        assert_eq!(surface.get_pixel(8, 8), Some(colors::BLACK));
        assert_eq!(surface.get_pixel(11, 0), Some(colors::BLACK));
        assert_relative_eq!(depth.get(2, 2).unwrap(), 5.0, epsilon = 1e-4);
        assert_eq!(depth.get(8, 8), Some(f32::INFINITY));
    }

    #[test]
    fn test_degenerate_triangle_writes_nothing() {
        let (mut surface, mut depth) = target();
        let tex = Texture::solid(colors::WHITE);

        let collinear = flat([(1.0, 1.0), (5.0, 5.0), (9.0, 9.0)], 3.0);
        assert_eq!(
            rasterize_triangle(&collinear, &tex, &mut depth, &mut surface),
            RasterOutcome::Degenerate
        );
        let point = flat([(4.0, 4.0); 3], 3.0);
        assert_eq!(
            rasterize_triangle(&point, &tex, &mut depth, &mut surface),
            RasterOutcome::Degenerate
        );
        assert_eq!(surface.count_not(colors::BLACK), 0);
    }

    #[test]
    fn test_draw_order_does_not_matter() {
        let near_tex = Texture::solid(rgb(0, 255, 0));
        let far_tex = Texture::solid(rgb(0, 0, 255));
        let near = flat([(2.0, 2.0), (14.0, 3.0), (4.0, 15.0)], 4.0);
        let far = flat([(6.0, 1.0), (18.0, 10.0), (3.0, 18.0)], 9.0);

        let (mut first_surface, mut first_depth) = target();
        rasterize_triangle(&near, &near_tex, &mut first_depth, &mut first_surface);
        rasterize_triangle(&far, &far_tex, &mut first_depth, &mut first_surface);

        let (mut second_surface, mut second_depth) = target();
        rasterize_triangle(&far, &far_tex, &mut second_depth, &mut second_surface);
        rasterize_triangle(&near, &near_tex, &mut second_depth, &mut second_surface);

        assert_eq!(first_surface, second_surface);
        assert_eq!(first_depth, second_depth);

        // (6, 6) is covered by both; the nearer one owns it
        assert_eq!(first_surface.get_pixel(6, 6), Some(rgb(0, 255, 0)));
        assert_relative_eq!(first_depth.get(6, 6).unwrap(), 4.0, epsilon = 1e-4);
        // (15, 9) is only covered by the far triangle
        assert_eq!(first_surface.get_pixel(15, 9), Some(rgb(0, 0, 255)));
        assert_relative_eq!(first_depth.get(15, 9).unwrap(), 9.0, epsilon = 1e-4);
    }

    #[test]
    fn test_occluded_triangle_writes_nothing() {
        let (mut surface, mut depth) = target();
        let tri = flat([(0.0, 0.0), (19.0, 0.0), (0.0, 19.0)], 2.0);
        rasterize_triangle(&tri, &Texture::solid(colors::WHITE), &mut depth, &mut surface);

        let behind = flat([(1.0, 1.0), (8.0, 1.0), (1.0, 8.0)], 6.0);
        let outcome = rasterize_triangle(&behind, &Texture::solid(rgb(9, 9, 9)), &mut depth, &mut surface);
        assert_eq!(outcome, RasterOutcome::Filled(0));
        assert_eq!(surface.get_pixel(2, 2), Some(colors::WHITE));
    }

    #[test]
    fn test_perspective_correct_uv() {
        // 256x1 ramp: texel i has red channel i
        let ramp = Texture::new(256, 1, (0..=255).map(|i| rgb(i, 0, 0)).collect()).unwrap();
        let tri = ScreenTriangle::new(
            [Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(0.0, 100.0)],
            [1.0, 4.0, 1.0],
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)],
        );
        let mut surface = PixelBuffer::new(128, 128, colors::BLACK);
        let mut depth = DepthBuffer::new(128, 128);

        rasterize_triangle(&tri, &ramp, &mut depth, &mut surface);

        // Weights at (50, 10) are (0.4, 0.5, 0.1): z = 1 / (0.4 + 0.5/4 + 0.1) = 1.6
        // and u = 1.6 * 0.5 / 4 = 0.2, where affine interpolation would give 0.5
        assert_relative_eq!(depth.get(50, 10).unwrap(), 1.6, epsilon = 1e-4);
        assert_eq!(surface.get_pixel(50, 10), Some(rgb(51, 0, 0)));
    }

    #[test]
    fn test_uv_tiling_wraps() {
        let ramp = Texture::new(5, 1, (0..5).map(|i| rgb(i * 50, 0, 0)).collect()).unwrap();
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];

        let (mut tiled, mut tiled_depth) = target();
        let uv = Vec2::new(1.25, 0.0);
        rasterize_triangle(
            &ScreenTriangle::new(points, [3.0; 3], [uv; 3]),
            &ramp,
            &mut tiled_depth,
            &mut tiled,
        );

        let (mut plain, mut plain_depth) = target();
        let uv = Vec2::new(0.25, 0.0);
        rasterize_triangle(
            &ScreenTriangle::new(points, [3.0; 3], [uv; 3]),
            &ramp,
            &mut plain_depth,
            &mut plain,
        );

        assert_eq!(tiled, plain);
        assert_eq!(plain.get_pixel(1, 1), Some(rgb(50, 0, 0)));
    }

    #[test]
    fn test_partly_off_screen() {
        let (mut surface, mut depth) = target();
        let tri = flat([(-10.0, -10.0), (30.0, -10.0), (-10.0, 30.0)], 1.0);
        let outcome = rasterize_triangle(&tri, &Texture::solid(colors::WHITE), &mut depth, &mut surface);

        assert!(matches!(outcome, RasterOutcome::Filled(n) if n > 0));
        assert_eq!(surface.get_pixel(0, 0), Some(colors::WHITE));
        assert_eq!(surface.get_pixel(19, 19), Some(colors::BLACK));
    }

    #[test]
    fn test_vertex_beyond_integer_range() {
        let (mut surface, mut depth) = target();
        let tri = flat([(-3.0e9, 0.0), (10.0, 0.0), (10.0, 10.0)], 1.0);
        let outcome = rasterize_triangle(&tri, &Texture::solid(colors::WHITE), &mut depth, &mut surface);
        assert!(matches!(outcome, RasterOutcome::Filled(_)));

        let tri = flat([(5.0, 5.0), (3.0e9, 4.0e9), (-3.0e9, 4.0e9)], 1.0);
        let outcome = rasterize_triangle(&tri, &Texture::solid(colors::WHITE), &mut depth, &mut surface);
        assert!(matches!(outcome, RasterOutcome::Filled(_)));
    }

    #[test]
    fn test_fully_off_screen() {
        let (mut surface, mut depth) = target();
        let tri = flat([(30.0, 30.0), (40.0, 30.0), (30.0, 40.0)], 1.0);
        let outcome = rasterize_triangle(&tri, &Texture::solid(colors::WHITE), &mut depth, &mut surface);
        assert_eq!(outcome, RasterOutcome::Filled(0));
    }
}
