//! Small value types for positions, directions and texture coordinates.

pub mod vec2;
pub mod vec3;

pub use vec2::Vec2;
pub use vec3::Vec3;
