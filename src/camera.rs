//! The viewer and the per-frame render pass.
//!
//! # Coordinate System
//!
//! - X: positive right
//! - Y: positive down the screen
//! - Z: positive forward (into the screen)
//!
//! # Orientation
//!
//! Orientation is a forward direction vector. Each frame it is normalized and
//! broken into pitch (`asin(forward.y)`) and yaw (`atan2(forward.x,
//! forward.z)`), both in degrees. The view transform turns the world by the
//! inverse yaw about Y and then by the pitch about X, which lands the forward
//! vector on +Z.

use crate::math::{Vec2, Vec3};
use crate::model::Model;
use crate::projection::Projection;
use crate::render::{rasterize_triangle, DepthBuffer, RasterOutcome, ScreenTriangle, Surface};

/// Field of view handed to the projection, see [`Projection`].
pub const DEFAULT_FOV: f32 = 80.0;

/// Pitch and yaw derived from a forward vector, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
}

/// Counters collected during one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Faces visited across all models.
    pub faces: usize,
    /// Faces dropped because a vertex sat on or behind the camera plane.
    pub culled: usize,
    /// Faces that projected to zero area.
    pub degenerate: usize,
    /// Pixels written to the surface.
    pub pixels: usize,
}

/// A physical viewer: a position, a direction and a field of view.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// A camera at the origin looking along +Z.
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::FORWARD,
            fov: DEFAULT_FOV,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Sets the viewing direction. It need not be normalized.
    pub fn set_forward(&mut self, forward: Vec3) {
        self.forward = forward;
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }

    /// Moves the camera along its forward direction.
    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.unit_forward() * distance;
    }

    /// Points the camera at a world position. Ignored if `target` is the
    /// camera's own position.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(direction) = (target - self.position).try_normalize() {
            self.forward = direction;
        }
    }

    /// The forward vector normalized, or +Z if it has no direction.
    fn unit_forward(&self) -> Vec3 {
        self.forward.try_normalize().unwrap_or(Vec3::FORWARD)
    }

    pub fn orientation(&self) -> Orientation {
        let forward = self.unit_forward();
        Orientation {
            pitch: forward.y.clamp(-1.0, 1.0).asin().to_degrees(),
            yaw: forward.x.atan2(forward.z).to_degrees(),
        }
    }

    /// Moves a world-space point into this camera's view space.
    pub fn to_view_space(&self, world: Vec3) -> Vec3 {
        view_transform(world, self.position, self.orientation())
    }

    /// Draws every model into `surface`.
    pub fn render<S: Surface + ?Sized>(&mut self, models: &[Model], surface: &mut S) {
        self.render_with_stats(models, surface);
    }

    /// Draws every model into `surface` and reports what happened.
    ///
    /// Visibility is resolved by a depth buffer private to this call. A face
    /// with any vertex at depth zero or behind the camera is dropped whole.
    pub fn render_with_stats<S: Surface + ?Sized>(
        &mut self,
        models: &[Model],
        surface: &mut S,
    ) -> RenderStats {
        let projection = Projection::new(surface.width(), surface.height(), self.fov);
        self.forward = self.unit_forward();
        let orientation = self.orientation();
        let mut depth = DepthBuffer::new(surface.width(), surface.height());
        let mut stats = RenderStats::default();

        for model in models {
            let transform = model.transform();
            let texture = model.texture();

            for face in model.mesh().faces() {
                stats.faces += 1;

                let mut points = [Vec2::ZERO; 3];
                let mut depths = [0.0; 3];
                let mut uvs = [Vec2::ZERO; 3];
                for (i, vertex) in face.iter().enumerate() {
                    let world = transform.apply(vertex.position);
                    let view = view_transform(world, self.position, orientation);
                    depths[i] = view.z.trunc();
                    points[i] = projection.project(view);
                    uvs[i] = vertex.uv;
                }

                if depths.iter().any(|&z| z <= 0.0) {
                    stats.culled += 1;
                    continue;
                }
                if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                    stats.degenerate += 1;
                    continue;
                }

                let triangle = ScreenTriangle::new(points, depths, uvs);
                match rasterize_triangle(&triangle, texture, &mut depth, surface) {
                    RasterOutcome::Degenerate => stats.degenerate += 1,
                    RasterOutcome::Filled(pixels) => stats.pixels += pixels,
                }
            }
        }

        stats
    }
}

#[inline]
fn view_transform(world: Vec3, eye: Vec3, orientation: Orientation) -> Vec3 {
    (world - eye)
        // Undo the yaw: turning by +yaw would swing the forward vector to -Z
        .rotate_y(-orientation.yaw.to_radians())
        .rotate_x(orientation.pitch.to_radians())
}
