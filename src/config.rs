//! Scene descriptions read from RON files.
//!
//! ```ron
//! (
//!     width: 500,
//!     height: 500,
//!     frames: 60,
//!     output: "frames/cube",
//!     camera: (position: (0.0, 0.0, 0.0), forward: (0.0, 0.0, 1.0)),
//!     models: [
//!         (
//!             mesh: Obj("cube.obj"),
//!             texture: Some(Checker(size: 8, cell: 1)),
//!             scale: 20.0,
//!             position: (0.0, 0.0, 400.0),
//!             rotation: (180.0, 0.0, 0.0),
//!             spin: (0.0, 1.5, 0.0),
//!         ),
//!     ],
//! )
//! ```
//!
//! Relative asset paths resolve against the directory of the scene file.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, DEFAULT_FOV};
use crate::colors::{self, rgb};
use crate::math::Vec3;
use crate::mesh::{LoadError, Mesh};
use crate::model::Model;
use crate::texture::{Texture, TextureError};

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Mesh { path: PathBuf, source: LoadError },
    Texture { path: PathBuf, source: TextureError },
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::Parse(e)
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::Mesh { path, source } => {
                write!(f, "Mesh {}: {}", path.display(), source)
            }
            SceneError::Texture { path, source } => {
                write!(f, "Texture {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            SceneError::Parse(e) => Some(e),
            SceneError::Mesh { source, .. } => Some(source),
            SceneError::Texture { source, .. } => Some(source),
        }
    }
}

/// Where a model's geometry comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeshSource {
    Quad,
    Cube,
    Obj(PathBuf),
}

/// Where a model's texture comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextureSource {
    File(PathBuf),
    Solid(u8, u8, u8),
    /// Black and white squares.
    Checker { size: u32, cell: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub position: (f32, f32, f32),
    #[serde(default = "default_forward")]
    pub forward: (f32, f32, f32),
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// Distance moved along the forward vector after each frame.
    #[serde(default)]
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: (0.0, 0.0, 0.0),
            forward: default_forward(),
            fov: DEFAULT_FOV,
            speed: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub mesh: MeshSource,
    #[serde(default)]
    pub texture: Option<TextureSource>,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub position: (f32, f32, f32),
    /// Euler angles in degrees.
    #[serde(default)]
    pub rotation: (f32, f32, f32),
    /// Rotation added after each frame, in degrees.
    #[serde(default)]
    pub spin: (f32, f32, f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Frame `n` is written to `{output}_{n:03}.png`.
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_background")]
    pub background: (u8, u8, u8),
    #[serde(default)]
    pub camera: CameraConfig,
    pub models: Vec<ModelConfig>,
}

fn default_forward() -> (f32, f32, f32) {
    (0.0, 0.0, 1.0)
}

fn default_fov() -> f32 {
    DEFAULT_FOV
}

fn default_scale() -> f32 {
    1.0
}

fn default_size() -> u32 {
    500
}

fn default_frames() -> u32 {
    1
}

fn default_output() -> String {
    "frame".to_string()
}

fn default_background() -> (u8, u8, u8) {
    (255, 255, 255)
}

fn vec3((x, y, z): (f32, f32, f32)) -> Vec3 {
    Vec3::new(x, y, z)
}

/// A camera and its models, plus the per-frame motion to apply.
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub models: Vec<Model>,
    spins: Vec<Vec3>,
    speed: f32,
}

impl Scene {
    /// Steps the animation by one frame.
    pub fn advance(&mut self) {
        for (model, spin) in self.models.iter_mut().zip(&self.spins) {
            model.transform_mut().rotate(*spin);
        }
        self.camera.move_forward(self.speed);
    }
}

impl SceneConfig {
    /// Load a scene description from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(s: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(s)?)
    }

    pub fn background_color(&self) -> u32 {
        let (r, g, b) = self.background;
        rgb(r, g, b)
    }

    /// Loads every asset and builds the scene. Models naming the same
    /// texture file share one texture.
    pub fn build(&self, base_dir: &Path) -> Result<Scene, SceneError> {
        let mut textures: HashMap<PathBuf, Rc<Texture>> = HashMap::new();
        let mut models = Vec::with_capacity(self.models.len());

        for config in &self.models {
            let mesh = match &config.mesh {
                MeshSource::Quad => Mesh::quad(),
                MeshSource::Cube => Mesh::cube(),
                MeshSource::Obj(path) => {
                    let path = base_dir.join(path);
                    Mesh::from_obj_file(&path)
                        .map_err(|source| SceneError::Mesh { path, source })?
                }
            };

            let mut model = Model::new(mesh, config.scale);
            model
                .transform_mut()
                .set_position(vec3(config.position))
                .set_rotation(vec3(config.rotation));

            match &config.texture {
                None => {}
                Some(TextureSource::Solid(r, g, b)) => {
                    model.set_texture(Rc::new(Texture::solid(rgb(*r, *g, *b))));
                }
                Some(TextureSource::Checker { size, cell }) => {
                    let texture =
                        Texture::checkerboard(*size, *cell, colors::WHITE, colors::BLACK)
                            .map_err(|source| SceneError::Texture {
                                path: PathBuf::from("<checker>"),
                                source,
                            })?;
                    model.set_texture(Rc::new(texture));
                }
                Some(TextureSource::File(path)) => {
                    let path = base_dir.join(path);
                    let texture = match textures.get(&path) {
                        Some(texture) => Rc::clone(texture),
                        None => {
                            let texture = Rc::new(Texture::from_file(&path).map_err(|source| {
                                SceneError::Texture {
                                    path: path.clone(),
                                    source,
                                }
                            })?);
                            textures.insert(path, Rc::clone(&texture));
                            texture
                        }
                    };
                    model.set_texture(texture);
                }
            }

            models.push(model);
        }

        let mut camera = Camera::new();
        camera.set_position(vec3(self.camera.position));
        camera.set_forward(vec3(self.camera.forward));
        camera.set_fov(self.camera.fov);

        Ok(Scene {
            camera,
            models,
            spins: self.models.iter().map(|m| vec3(m.spin)).collect(),
            speed: self.camera.speed,
        })
    }
}
