//! Read-only mesh geometry for the intersection engine.
//!
//! A [`GeometryProvider`] exposes vertex positions, texture coordinates and
//! normals plus per-face index lists. Intersectables only ever read from a
//! provider, so one provider can be shared by many mesh instances.

use glint_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors raised while loading or validating mesh geometry.
///
/// These are scene-assembly errors: they surface before rendering starts
/// and abort the run.
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Face {face} has {arity} vertices, only triangles are supported")]
    MalformedFace { face: usize, arity: usize },

    #[error("Face {face} references {kind} index {index}, but only {len} exist")]
    IndexOutOfRange {
        face: usize,
        kind: &'static str,
        index: u32,
        len: usize,
    },

    #[error("{kind} face list has {got} entries, expected {expected}")]
    MismatchedFaceLists {
        kind: &'static str,
        got: usize,
        expected: usize,
    },
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Immutable vertex and face data for a mesh.
///
/// Indices are zero-based. `texture_face(i)` and `normal_face(i)` are only
/// meaningful when `has_texture_coords()` / `has_normals()` return true.
pub trait GeometryProvider: Send + Sync {
    fn vertex_count(&self) -> usize;
    fn vertex(&self, i: usize) -> Vec3;

    fn texture_coord_count(&self) -> usize;
    fn texture_coord(&self, i: usize) -> Vec2;

    fn normal_count(&self) -> usize;
    fn normal(&self, i: usize) -> Vec3;

    fn has_normals(&self) -> bool {
        self.normal_count() > 0
    }

    fn has_texture_coords(&self) -> bool {
        self.texture_coord_count() > 0
    }

    fn face_count(&self) -> usize;

    /// Vertex indices of face `i`, in winding order.
    fn face(&self, i: usize) -> &[u32];

    /// Texture-coordinate indices of face `i`.
    fn texture_face(&self, i: usize) -> &[u32];

    /// Normal indices of face `i`.
    fn normal_face(&self, i: usize) -> &[u32];
}

/// Check that every face of a provider is a well-formed triangle.
///
/// Every face must reference exactly three in-range vertices, and the same
/// holds for the texture and normal face lists when the provider has that
/// data.
pub fn validate_triangles(provider: &dyn GeometryProvider) -> GeometryResult<()> {
    let faces = provider.face_count();
    let has_tex = provider.has_texture_coords();
    let has_normals = provider.has_normals();

    for face in 0..faces {
        check_face(face, provider.face(face), "vertex", provider.vertex_count())?;
        if has_tex {
            check_face(
                face,
                provider.texture_face(face),
                "texture coordinate",
                provider.texture_coord_count(),
            )?;
        }
        if has_normals {
            check_face(face, provider.normal_face(face), "normal", provider.normal_count())?;
        }
    }

    Ok(())
}

fn check_face(face: usize, indices: &[u32], kind: &'static str, len: usize) -> GeometryResult<()> {
    if indices.len() != 3 {
        return Err(GeometryError::MalformedFace {
            face,
            arity: indices.len(),
        });
    }

    match indices.iter().find(|&&index| index as usize >= len) {
        Some(&index) => Err(GeometryError::IndexOutOfRange {
            face,
            kind,
            index,
            len,
        }),
        None => Ok(()),
    }
}

/// In-memory geometry provider with separate index lists per attribute.
///
/// This mirrors the OBJ layout, where a face can reference a different
/// position, texture coordinate and normal at each corner.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Texture coordinates (may be empty)
    pub tex_coords: Vec<Vec2>,

    /// Vertex normals (may be empty)
    pub normals: Vec<Vec3>,

    /// Position indices per face
    pub faces: Vec<Vec<u32>>,

    /// Texture coordinate indices per face (empty without tex coords)
    pub texture_faces: Vec<Vec<u32>>,

    /// Normal indices per face (empty without normals)
    pub normal_faces: Vec<Vec<u32>>,
}

impl MeshData {
    /// Create a mesh from positions and faces, without normals or UVs.
    pub fn new(positions: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            positions,
            faces,
            ..Default::default()
        }
    }

    /// Create a triangle mesh from positions and index triplets.
    pub fn from_triangles(positions: Vec<Vec3>, triangles: &[[u32; 3]]) -> Self {
        let faces = triangles.iter().map(|t| t.to_vec()).collect();
        Self::new(positions, faces)
    }

    /// Attach per-vertex normals and their face index lists.
    pub fn with_normals(mut self, normals: Vec<Vec3>, normal_faces: Vec<Vec<u32>>) -> Self {
        self.normals = normals;
        self.normal_faces = normal_faces;
        self
    }

    /// Attach texture coordinates and their face index lists.
    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>, texture_faces: Vec<Vec<u32>>) -> Self {
        self.tex_coords = tex_coords;
        self.texture_faces = texture_faces;
        self
    }

    /// Check that the mesh is made of well-formed triangles.
    pub fn validate(&self) -> GeometryResult<()> {
        if self.has_texture_coords() && self.texture_faces.len() != self.faces.len() {
            return Err(GeometryError::MismatchedFaceLists {
                kind: "texture",
                got: self.texture_faces.len(),
                expected: self.faces.len(),
            });
        }
        if self.has_normals() && self.normal_faces.len() != self.faces.len() {
            return Err(GeometryError::MismatchedFaceLists {
                kind: "normal",
                got: self.normal_faces.len(),
                expected: self.faces.len(),
            });
        }

        validate_triangles(self)
    }
}

impl GeometryProvider for MeshData {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn vertex(&self, i: usize) -> Vec3 {
        self.positions[i]
    }

    fn texture_coord_count(&self) -> usize {
        self.tex_coords.len()
    }

    fn texture_coord(&self, i: usize) -> Vec2 {
        self.tex_coords[i]
    }

    fn normal_count(&self) -> usize {
        self.normals.len()
    }

    fn normal(&self, i: usize) -> Vec3 {
        self.normals[i]
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, i: usize) -> &[u32] {
        &self.faces[i]
    }

    // Short attribute lists read as empty faces, which validation rejects
    fn texture_face(&self, i: usize) -> &[u32] {
        self.texture_faces.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    fn normal_face(&self, i: usize) -> &[u32] {
        self.normal_faces.get(i).map(Vec::as_slice).unwrap_or(&[])
    }
}
