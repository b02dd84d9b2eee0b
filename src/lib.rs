//! A CPU perspective projector with a depth-tested, textured triangle fill.
//!
//! Models are placed in the world, seen through a [`Camera`], projected with
//! true perspective and rasterized into any [`Surface`]: an in-memory
//! [`PixelBuffer`](render::PixelBuffer) or an `image::RgbaImage`.
//!
//! # Quick Start
//!
//! ```ignore
//! use projector::prelude::*;
//!
//! let mut model = Model::new(Mesh::cube(), 20.0);
//! model.transform_mut().set_position_xyz(0.0, 0.0, 400.0);
//!
//! let mut frame = PixelBuffer::new(500, 500, colors::WHITE);
//! let mut camera = Camera::new();
//! camera.render(&[model], &mut frame);
//! frame.save("frame.png")?;
//! ```

pub mod camera;
pub mod colors;
pub mod config;
pub mod math;
pub mod mesh;
pub mod model;
pub mod projection;
pub mod render;
pub mod texture;
pub mod transform;

// Re-export commonly needed types at crate root for convenience
pub use camera::{Camera, RenderStats};
pub use mesh::{LoadError, Mesh};
pub use model::Model;
pub use projection::Projection;
pub use texture::{Texture, TextureError};
pub use transform::Transform;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::{Camera, RenderStats};
    pub use crate::colors;
    pub use crate::config::{Scene, SceneConfig};
    pub use crate::math::{Vec2, Vec3};
    pub use crate::mesh::Mesh;
    pub use crate::model::Model;
    pub use crate::render::{PixelBuffer, Surface};
    pub use crate::texture::Texture;
    pub use crate::transform::Transform;
}
