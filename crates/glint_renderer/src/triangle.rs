//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection. The
//! same test backs every face of a [`Mesh`](crate::Mesh).

use std::sync::Arc;

use crate::{HitRecord, Intersectable, Placement, Shader, ShapeKind, VisibilityMask};
use glint_math::{Interval, Mat4, Ray, Vec2, Vec3};

/// Determinants below this are treated as parallel (or back-facing).
pub(crate) const DET_EPSILON: f32 = 1e-6;

/// Parameters of a ray-triangle hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl TriangleHit {
    /// Barycentric weights of `(v0, v1, v2)`.
    #[inline]
    pub fn weights(&self) -> (f32, f32, f32) {
        (1.0 - self.u - self.v, self.u, self.v)
    }
}

/// Möller-Trumbore ray-triangle intersection.
///
/// With `culling`, triangles whose determinant is below `DET_EPSILON`
/// (back-facing or parallel) are skipped; without it only near-zero
/// determinants are. The caller checks `t` against its range.
#[inline]
pub(crate) fn intersect_triangle(ray: &Ray, v: [Vec3; 3], culling: bool) -> Option<TriangleHit> {
    let edge1 = v[1] - v[0];
    let edge2 = v[2] - v[0];

    let pvec = ray.direction().cross(edge2);
    let det = edge1.dot(pvec);

    if culling {
        if det < DET_EPSILON {
            return None;
        }
    } else if det.abs() < DET_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray.origin() - v[0];
    let u = tvec.dot(pvec) * inv_det;

    // Check if intersection is outside triangle (u parameter)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v_bary = ray.direction().dot(qvec) * inv_det;

    // Check if intersection is outside triangle (v parameter)
    if v_bary < 0.0 || u + v_bary > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    Some(TriangleHit { t, u, v: v_bary })
}

/// Flat normal of a triangle, from the edge cross product.
#[inline]
pub(crate) fn face_normal(v: [Vec3; 3]) -> Vec3 {
    (v[1] - v[0]).cross(v[2] - v[0]).normalize()
}

/// A single triangle given by three model-space vertices.
pub struct Triangle {
    vertices: [Vec3; 3],
    shader: Arc<dyn Shader>,
    mask: VisibilityMask,
    culling: bool,
    placement: Placement,
    /// World-space vertices, derived from the placement
    world: [Vec3; 3],
    /// Pre-computed world face normal (unit length)
    normal: Vec3,
}

impl Triangle {
    /// Create a new two-sided triangle.
    pub fn new(shader: Arc<dyn Shader>, v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let vertices = [v0, v1, v2];
        Self {
            vertices,
            shader,
            mask: VisibilityMask::DEFAULT,
            culling: false,
            placement: Placement::default(),
            world: vertices,
            normal: face_normal(vertices),
        }
    }

    /// Enable or disable back-face culling.
    pub fn with_culling(mut self, culling: bool) -> Self {
        self.culling = culling;
        self
    }

    /// Set the visibility mask.
    pub fn with_mask(mut self, mask: VisibilityMask) -> Self {
        self.mask = mask;
        self
    }

    /// Set the model-to-world transform.
    pub fn with_transform(mut self, model_to_world: Mat4) -> Self {
        self.set_model_to_world(model_to_world);
        self
    }
}

impl Intersectable for Triangle {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        query: VisibilityMask,
    ) -> bool {
        if !self.mask.accepts(query) {
            return false;
        }

        let hit = match intersect_triangle(ray, self.world, self.culling) {
            Some(hit) if ray_t.contains(hit.t) => hit,
            _ => return false,
        };

        rec.set_ray_hit(ray, hit.t);
        rec.normal = self.normal;
        rec.tex_coords = Vec2::new(hit.u, hit.v);
        rec.shader = self.shader.as_ref();

        true
    }

    fn mask(&self) -> VisibilityMask {
        self.mask
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Triangle
    }

    fn model_to_world(&self) -> Mat4 {
        self.placement.matrix()
    }

    fn set_model_to_world(&mut self, model_to_world: Mat4) {
        self.placement = Placement::new(model_to_world);
        self.world = self.vertices.map(|v| self.placement.point(v));
        self.normal = face_normal(self.world);
    }
}
