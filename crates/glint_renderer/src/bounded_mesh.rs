//! Mesh wrapped in a world-space bounding box.

use glint_math::{Aabb, Interval, Mat4, Ray};

use crate::{HitRecord, Intersectable, Mesh, ShapeKind, VisibilityMask};

/// Margin around the enclosing box, relative to the largest coordinate.
/// The face test can accept points that rounding puts just outside the
/// exact bounds.
const BOUNDS_MARGIN: f32 = 1e-5;

fn world_bounds(mesh: &Mesh) -> Aabb {
    let bounds = Aabb::enclosing(mesh.world_vertices());
    if bounds.is_empty() {
        return bounds;
    }
    let scale = bounds.min().abs().max(bounds.max().abs()).max_element().max(1.0);
    bounds.grow(scale * BOUNDS_MARGIN)
}

/// A [`Mesh`] that rejects rays missing its bounding box before testing
/// any face. Reports exactly the hits the bare mesh would.
pub struct BoundedMesh {
    mesh: Mesh,
    bounds: Aabb,
}

impl BoundedMesh {
    pub fn new(mesh: Mesh) -> Self {
        let bounds = world_bounds(&mesh);
        Self { mesh, bounds }
    }

    /// World-space bounds of the mesh.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

impl Intersectable for BoundedMesh {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        query: VisibilityMask,
    ) -> bool {
        if !self.mesh.mask().accepts(query) {
            return false;
        }
        if !self.bounds.hit(ray, ray_t) {
            return false;
        }

        self.mesh.intersect(ray, ray_t, rec, query)
    }

    fn mask(&self) -> VisibilityMask {
        self.mesh.mask()
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::BoundedMesh
    }

    fn model_to_world(&self) -> Mat4 {
        self.mesh.model_to_world()
    }

    fn set_model_to_world(&mut self, model_to_world: Mat4) {
        self.mesh.set_model_to_world(model_to_world);
        self.bounds = world_bounds(&self.mesh);
    }
}
