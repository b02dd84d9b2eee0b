//! Perspective division from view space to pixel coordinates.
//!
//! The projection is a true perspective divide with the eye placed `xf`
//! (or `yf`) units behind the view origin:
//!
//! ```text
//! xf      = -(half_width  / tan(fov / 2))
//! yf      = -(half_height / tan(fov / 2))
//! screen' = (view * f) / (view.z + f) + half_size
//! ```
//!
//! The fov is handed to `tan` as-is. The default of 80 lands on a negative
//! tangent, which is what makes `xf` and `yf` positive and keeps the
//! denominator above zero for every point in front of the camera.

use crate::math::{Vec2, Vec3};

/// Per-frame projection factors for one target size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    half_width: f32,
    half_height: f32,
    xf: f32,
    yf: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fov: f32) -> Self {
        let half_width = width as f32 / 2.0;
        let half_height = height as f32 / 2.0;
        let tan = (fov / 2.0).tan();
        Self {
            half_width,
            half_height,
            xf: -(half_width / tan),
            yf: -(half_height / tan),
        }
    }

    pub fn xf(&self) -> f32 {
        self.xf
    }

    pub fn yf(&self) -> f32 {
        self.yf
    }

    /// Projects a view-space point to integer pixel coordinates, with the
    /// view axis landing on the centre of the target.
    #[inline]
    pub fn project(&self, view: Vec3) -> Vec2 {
        let x = (view.x * self.xf) / (view.z + self.xf);
        let y = (view.y * self.yf) / (view.z + self.yf);
        Vec2::new(
            (x + self.half_width).trunc(),
            (y + self.half_height).trunc(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::DEFAULT_FOV;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_fov_gives_positive_factors() {
        let proj = Projection::new(500, 500, DEFAULT_FOV);
        assert!(proj.xf() > 0.0);
        assert_relative_eq!(proj.xf(), proj.yf());
        assert_relative_eq!(proj.xf(), 250.0 / -(40.0f32.tan()), epsilon = 1e-3);
    }

    #[test]
    fn test_axis_hits_centre() {
        let proj = Projection::new(100, 60, DEFAULT_FOV);
        assert_eq!(proj.project(Vec3::new(0.0, 0.0, 25.0)), Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_farther_points_shrink_towards_centre() {
        let proj = Projection::new(100, 100, DEFAULT_FOV);
        let near = proj.project(Vec3::new(10.0, 10.0, 5.0));
        let far = proj.project(Vec3::new(10.0, 10.0, 50.0));
        assert!(near.x > far.x && far.x > 50.0);
        assert!(near.y > far.y && far.y > 50.0);
    }

    #[test]
    fn test_true_perspective_divide() {
        let proj = Projection::new(100, 100, DEFAULT_FOV);
        let f = proj.xf();
        let p = proj.project(Vec3::new(-20.0, 0.0, 30.0));
        assert_eq!(p.x, ((-20.0 * f) / (30.0 + f) + 50.0).trunc());
    }
}
