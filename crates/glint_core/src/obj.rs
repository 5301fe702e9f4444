//! Wavefront OBJ loading.
//!
//! OBJ files are read with `tobj` without triangulation, so polygons with
//! more than three corners are reported as malformed instead of being
//! silently split. All objects in a file are merged into one `MeshData`.

use std::path::Path;

use glint_math::{Vec2, Vec3};

use crate::geometry::{GeometryResult, MeshData};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file and validate that it is a triangle mesh.
///
/// Material libraries referenced by the file are ignored; shading is
/// assigned when the scene is assembled.
pub fn load_obj<P: AsRef<Path>>(path: P) -> GeometryResult<MeshData> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &load_options())?;

    let mesh = merge_models(&models)?;
    log::info!(
        "Loaded {}: {} vertices, {} faces from {} objects",
        path.display(),
        mesh.positions.len(),
        mesh.faces.len(),
        models.len()
    );

    Ok(mesh)
}

/// Parse OBJ source text. Any `mtllib` statement is ignored.
pub fn load_obj_from_str(source: &str) -> GeometryResult<MeshData> {
    let mut reader = source.as_bytes();
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    merge_models(&models)
}

/// Concatenate models, offsetting each model's indices past the data of
/// the models before it.
fn merge_models(models: &[tobj::Model]) -> GeometryResult<MeshData> {
    let mut merged = MeshData::default();

    for model in models {
        let mesh = &model.mesh;
        let position_offset = merged.positions.len() as u32;
        let tex_offset = merged.tex_coords.len() as u32;
        let normal_offset = merged.normals.len() as u32;

        merged.positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        merged
            .tex_coords
            .extend(mesh.texcoords.chunks_exact(2).map(|t| Vec2::new(t[0], t[1])));
        merged.normals.extend(
            mesh.normals
                .chunks_exact(3)
                .map(|n| Vec3::new(n[0], n[1], n[2])),
        );

        let arities = face_arities(mesh);
        merged
            .faces
            .extend(split_faces(&mesh.indices, &arities, position_offset));
        if !mesh.texcoord_indices.is_empty() {
            merged
                .texture_faces
                .extend(split_faces(&mesh.texcoord_indices, &arities, tex_offset));
        }
        if !mesh.normal_indices.is_empty() {
            merged
                .normal_faces
                .extend(split_faces(&mesh.normal_indices, &arities, normal_offset));
        }

        log::debug!(
            "OBJ object '{}': {} faces",
            model.name,
            arities.len()
        );
    }

    merged.validate()?;
    Ok(merged)
}

/// Corner count of every face. tobj leaves `face_arities` empty when
/// every face is a triangle.
fn face_arities(mesh: &tobj::Mesh) -> Vec<usize> {
    if mesh.face_arities.is_empty() {
        vec![3; mesh.indices.len() / 3]
    } else {
        mesh.face_arities.iter().map(|&a| a as usize).collect()
    }
}

fn split_faces(indices: &[u32], arities: &[usize], offset: u32) -> Vec<Vec<u32>> {
    let mut faces = Vec::with_capacity(arities.len());
    let mut start = 0;

    for &arity in arities {
        let end = (start + arity).min(indices.len());
        faces.push(indices[start..end].iter().map(|&i| i + offset).collect());
        start = end;
    }

    faces
}
