//! Renderable objects: geometry, placement and a texture handle.

use std::rc::Rc;

use crate::colors;
use crate::mesh::Mesh;
use crate::texture::Texture;
use crate::transform::Transform;

/// A mesh placed in the world.
///
/// The uniform scale is baked into the geometry by [`Model::new`]; position
/// and rotation stay mutable through [`Model::transform_mut`] so callers can
/// animate between frames.
///
/// `Clone` copies the geometry and transform. Only the texture handle is
/// shared, so moving or reshaping a clone never touches the original.
#[derive(Debug, Clone)]
pub struct Model {
    mesh: Mesh,
    scale: f32,
    transform: Transform,
    color: u32,
    texture: Rc<Texture>,
}

impl Model {
    pub fn new(mut mesh: Mesh, scale: f32) -> Self {
        mesh.scale(scale);
        Self {
            mesh,
            scale,
            transform: Transform::default(),
            color: colors::MODEL_DEFAULT,
            texture: Rc::new(Texture::default()),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The scale baked into the geometry at construction.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    // ============ Transform Accessors ============

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    // ============ Appearance ============

    /// Flat color of the model. Rasterization samples the texture instead.
    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    pub fn set_texture(&mut self, texture: Rc<Texture>) {
        self.texture = texture;
    }
}
