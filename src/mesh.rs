//! Triangle meshes and the OBJ loader.
//!
//! A [`Mesh`] is a vertex arena plus an index buffer of triangle triples.
//! Loading goes through `tobj` after a lenient normalization pass that drops
//! malformed records, resolves relative indices and fills in the attributes a
//! face slot leaves out.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::math::{Vec2, Vec3};

/// Texture coordinates handed to face slots that do not name one, indexed by
/// the slot's position inside the face (cyclic).
pub const DEFAULT_UVS: [Vec2; 3] = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];

/// Which attribute list a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Position => write!(f, "position"),
            Attribute::TexCoord => write!(f, "texture coordinate"),
            Attribute::Normal => write!(f, "normal"),
        }
    }
}

/// Errors raised while loading a mesh.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Obj(tobj::LoadError),
    /// A face references an attribute that was never declared.
    IndexOutOfBounds {
        attribute: Attribute,
        index: i64,
        available: usize,
        line: usize,
    },
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(err: tobj::LoadError) -> Self {
        LoadError::Obj(err)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "io error: {}", err),
            LoadError::Obj(err) => write!(f, "obj error: {}", err),
            LoadError::IndexOutOfBounds {
                attribute,
                index,
                available,
                line,
            } => write!(
                f,
                "line {}: {} index {} out of range ({} declared)",
                line, attribute, index, available
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Obj(err) => Some(err),
            LoadError::IndexOutOfBounds { .. } => None,
        }
    }
}

/// One corner of a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    /// `None` when the source never supplied a normal for this corner.
    pub normal: Option<Vec3>,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Option<Vec3>) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

/// Vertex arena plus triangle index buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn face_count(&self) -> usize {
        self.triangles.len()
    }

    /// Faces in index-buffer order.
    pub fn faces(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.triangles.iter().map(move |&[a, b, c]| {
            [
                &self.vertices[a as usize],
                &self.vertices[b as usize],
                &self.vertices[c as usize],
            ]
        })
    }

    /// Multiplies every position by `scale`.
    pub fn scale(&mut self, scale: f32) {
        for vertex in &mut self.vertices {
            vertex.position = vertex.position * scale;
        }
    }

    // ============ Built-in Shapes ============

    /// A unit square in the XY plane centred on the origin, facing -Z.
    pub fn quad() -> Self {
        let normal = Some(Vec3::new(0.0, 0.0, -1.0));
        let corner = |x: f32, y: f32, u: f32, v: f32| {
            Vertex::new(Vec3::new(x, y, 0.0), Vec2::new(u, v), normal)
        };
        Self {
            vertices: vec![
                corner(-0.5, -0.5, 0.0, 0.0),
                corner(0.5, -0.5, 1.0, 0.0),
                corner(0.5, 0.5, 1.0, 1.0),
                corner(-0.5, 0.5, 0.0, 1.0),
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    /// A unit cube centred on the origin; every side maps the whole texture.
    pub fn cube() -> Self {
        // (outward normal, u axis, v axis)
        const SIDES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, 1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ];

        let mut mesh = Mesh::default();
        for (normal, u_axis, v_axis) in SIDES {
            let (normal, u_axis, v_axis) = (Vec3::from(normal), Vec3::from(u_axis), Vec3::from(v_axis));
            let base = mesh.vertices.len() as u32;
            for (u, v) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                let position = normal * 0.5 + u_axis * (u - 0.5) + v_axis * (v - 0.5);
                mesh.vertices
                    .push(Vertex::new(position, Vec2::new(u, v), Some(normal)));
            }
            mesh.triangles.push([base, base + 1, base + 2]);
            mesh.triangles.push([base, base + 2, base + 3]);
        }
        mesh
    }

    // ============ OBJ Loading ============

    pub fn from_obj_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_obj_reader(BufReader::new(file))
    }

    pub fn from_obj_reader<R: Read>(mut reader: R) -> Result<Self, LoadError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Self::from_obj_str(&source)
    }

    /// Parses OBJ text. Every object and group lands in the same mesh.
    pub fn from_obj_str(source: &str) -> Result<Self, LoadError> {
        let normalized = normalize_obj(source)?;
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _materials) =
            tobj::load_obj_buf(&mut normalized.source.as_bytes(), &options, |_| {
                Err(tobj::LoadError::OpenFileFailed)
            })?;

        // tobj keeps face order, so corner flags line up with its indices
        let mut has_normal = normalized.has_normal.iter().copied();
        let mut mesh = Mesh::default();
        for model in &models {
            mesh.append_tobj(&model.mesh, &mut has_normal);
        }
        Ok(mesh)
    }

    fn append_tobj(&mut self, source: &tobj::Mesh, has_normal: &mut impl Iterator<Item = bool>) {
        let base = self.vertices.len() as u32;
        let count = source.positions.len() / 3;

        for i in 0..count {
            let position = Vec3::new(
                source.positions[i * 3],
                source.positions[i * 3 + 1],
                source.positions[i * 3 + 2],
            );
            let uv = match source.texcoords.get(i * 2..i * 2 + 2) {
                Some(&[u, v]) => Vec2::new(u, v),
                _ => DEFAULT_UVS[0],
            };
            let normal = match source.normals.get(i * 3..i * 3 + 3) {
                Some(&[x, y, z]) => Some(Vec3::new(x, y, z)),
                _ => None,
            };
            self.vertices.push(Vertex::new(position, uv, normal));
        }

        // Corners pointing at the placeholder normal share arena slots only
        // with each other, so clearing per corner is consistent.
        for &index in &source.indices {
            if !has_normal.next().unwrap_or(false) {
                self.vertices[(base + index) as usize].normal = None;
            }
        }

        self.triangles.extend(
            source
                .indices
                .chunks_exact(3)
                .map(|t| [base + t[0], base + t[1], base + t[2]]),
        );
    }
}

// ============ Normalization ============

/// Records emitted ahead of the file's own so every face slot can name a
/// texture coordinate and a normal. Slots without a normal point at the
/// first normal, which is tracked by position rather than by value.
const PRELUDE: &str = "vt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 0\n";
const TEXCOORD_OFFSET: usize = DEFAULT_UVS.len();
const NORMAL_OFFSET: usize = 1;

#[derive(Default)]
struct Declared {
    positions: usize,
    texcoords: usize,
    normals: usize,
}

struct Slot {
    v: i64,
    vt: Option<i64>,
    vn: Option<i64>,
}

struct Normalized {
    source: String,
    /// One flag per emitted triangle corner, in output order.
    has_normal: Vec<bool>,
}

/// Rewrites OBJ text into a form tobj accepts without complaint.
///
/// Short or unparseable records are dropped. Polygons are fanned into
/// triangles with absolute indices into the prelude-offset attribute lists.
fn normalize_obj(source: &str) -> Result<Normalized, LoadError> {
    let mut out = String::with_capacity(source.len() + PRELUDE.len());
    out.push_str(PRELUDE);
    let mut has_normal = Vec::new();
    let mut declared = Declared::default();

    for (number, line) in source.lines().enumerate() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("v") => {
                if let Some([x, y, z]) = leading_floats(words) {
                    declared.positions += 1;
                    out.push_str(&format!("v {} {} {}\n", x, y, z));
                }
            }
            Some("vt") => {
                if let Some([u, v]) = leading_floats(words) {
                    declared.texcoords += 1;
                    out.push_str(&format!("vt {} {}\n", u, v));
                }
            }
            Some("vn") => {
                if let Some([x, y, z]) = leading_floats(words) {
                    declared.normals += 1;
                    out.push_str(&format!("vn {} {} {}\n", x, y, z));
                }
            }
            Some("f") => {
                let Some(slots) = words.map(parse_slot).collect::<Option<Vec<_>>>() else {
                    continue;
                };
                if slots.len() < 3 {
                    continue;
                }
                let line = number + 1;
                let mut corners = Vec::with_capacity(slots.len());
                for (corner, slot) in slots.iter().enumerate() {
                    let v = resolve(slot.v, declared.positions, Attribute::Position, line)?;
                    let vt = match slot.vt {
                        Some(vt) => {
                            resolve(vt, declared.texcoords, Attribute::TexCoord, line)?
                                + TEXCOORD_OFFSET
                        }
                        None => corner % DEFAULT_UVS.len() + 1,
                    };
                    let vn = match slot.vn {
                        Some(vn) => {
                            resolve(vn, declared.normals, Attribute::Normal, line)? + NORMAL_OFFSET
                        }
                        None => 1,
                    };
                    corners.push((format!("{}/{}/{}", v, vt, vn), slot.vn.is_some()));
                }

                // Fan out here so every emitted face is a triangle
                for i in 1..corners.len() - 1 {
                    let triangle = [&corners[0], &corners[i], &corners[i + 1]];
                    out.push_str(&format!(
                        "f {} {} {}\n",
                        triangle[0].0, triangle[1].0, triangle[2].0
                    ));
                    has_normal.extend(triangle.iter().map(|corner| corner.1));
                }
            }
            Some(kind @ ("o" | "g")) => {
                let name = words.collect::<Vec<_>>().join(" ");
                if !name.is_empty() {
                    out.push_str(&format!("{} {}\n", kind, name));
                }
            }
            _ => {}
        }
    }

    Ok(Normalized {
        source: out,
        has_normal,
    })
}

/// The first `N` words as floats, or `None` if any is missing or malformed.
fn leading_floats<'a, const N: usize>(
    mut words: impl Iterator<Item = &'a str>,
) -> Option<[f32; N]> {
    let mut values = [0.0; N];
    for value in &mut values {
        *value = words.next()?.parse().ok()?;
    }
    Some(values)
}

/// Parses `v`, `v/vt`, `v//vn` or `v/vt/vn`.
fn parse_slot(word: &str) -> Option<Slot> {
    let mut parts = word.split('/');
    let v = parts.next()?.parse().ok()?;
    let optional = |part: Option<&str>| match part {
        None | Some("") => Some(None),
        Some(text) => text.parse().ok().map(Some),
    };
    let vt = optional(parts.next())?;
    let vn = optional(parts.next())?;
    if parts.next().is_some() {
        return None;
    }
    Some(Slot { v, vt, vn })
}

/// Turns a 1-based or negative-relative index into a 1-based absolute one.
fn resolve(
    index: i64,
    available: usize,
    attribute: Attribute,
    line: usize,
) -> Result<usize, LoadError> {
    let absolute = if index < 0 {
        available as i64 + index + 1
    } else {
        index
    };
    if absolute < 1 || absolute > available as i64 {
        return Err(LoadError::IndexOutOfBounds {
            attribute,
            index,
            available,
            line,
        });
    }
    Ok(absolute as usize)
}
