//! Object placement: a world-space offset plus Euler rotation.

use crate::math::Vec3;

/// Position and rotation of an object in world space.
///
/// Rotation is a set of Euler angles in degrees, applied about X, then Y,
/// then Z. Mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform
///     .set_position_xyz(0.0, 0.0, 400.0)
///     .rotate_x(180.0)
///     .rotate_y(1.5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Position ============

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Translate by a delta vector.
    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position += delta;
        self
    }

    // ============ Rotation ============

    /// Euler angles in degrees.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    pub fn set_rotation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    /// Add a delta rotation (degrees).
    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation += delta;
        self
    }

    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        self.rotation.x += degrees;
        self
    }

    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.rotation.y += degrees;
        self
    }

    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.rotation.z += degrees;
        self
    }

    // ============ Application ============

    /// Rotates `point` about the object's origin (X, then Y, then Z) and
    /// moves it to world space.
    pub fn apply(&self, point: Vec3) -> Vec3 {
        point
            .rotate_x(self.rotation.x.to_radians())
            .rotate_y(self.rotation.y.to_radians())
            .rotate_z(self.rotation.z.to_radians())
            + self.position
    }
}
