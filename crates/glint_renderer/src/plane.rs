//! Infinite plane primitive.

use std::sync::Arc;

use crate::{HitRecord, Intersectable, Placement, Shader, ShapeKind, VisibilityMask};
use glint_math::{Interval, Mat4, Ray, Vec2, Vec3};

/// Rays closer to parallel than this never hit a plane.
const PARALLEL_EPSILON: f32 = 1e-6;

/// An infinite plane through the model-space origin.
pub struct Plane {
    normal: Vec3,
    shader: Arc<dyn Shader>,
    mask: VisibilityMask,
    placement: Placement,
    // World-space point and unit normal
    world_point: Vec3,
    world_normal: Vec3,
}

impl Plane {
    /// Create a plane through the origin with the given model-space normal.
    pub fn new(shader: Arc<dyn Shader>, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            shader,
            mask: VisibilityMask::DEFAULT,
            placement: Placement::default(),
            world_point: Vec3::ZERO,
            world_normal: normal,
        }
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

    pub fn world_normal(&self) -> Vec3 {
        self.world_normal
    }
}

impl Intersectable for Plane {
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

        let denominator = self.world_normal.dot(ray.direction());
        if denominator.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.world_point - ray.origin()).dot(self.world_normal) / denominator;
        if !ray_t.contains(t) {
            return false;
        }

        rec.set_ray_hit(ray, t);
        rec.normal = self.world_normal;
        rec.tex_coords = Vec2::ZERO;
        rec.shader = self.shader.as_ref();

        true
    }

    fn mask(&self) -> VisibilityMask {
        self.mask
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Plane
    }

    fn model_to_world(&self) -> Mat4 {
        self.placement.matrix()
    }

    fn set_model_to_world(&mut self, model_to_world: Mat4) {
        self.placement = Placement::new(model_to_world);
        self.world_point = self.placement.point(Vec3::ZERO);
        self.world_normal = self.placement.normal(self.normal);
    }
}
