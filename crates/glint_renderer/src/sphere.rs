//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{HitRecord, Intersectable, Placement, Shader, ShapeKind, VisibilityMask};
use glint_math::{Interval, Mat4, Ray, Vec2, Vec3};

/// A sphere centered on its model-space origin.
///
/// The transform positions the center; the radius is not scaled.
pub struct Sphere {
    radius: f32,
    shader: Arc<dyn Shader>,
    mask: VisibilityMask,
    placement: Placement,
    /// World-space center, derived from the placement
    center: Vec3,
}

impl Sphere {
    /// Create a new sphere at the origin.
    pub fn new(shader: Arc<dyn Shader>, radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            shader,
            mask: VisibilityMask::DEFAULT,
            placement: Placement::default(),
            center: Vec3::ZERO,
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

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Intersectable for Sphere {
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

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return false;
            }
        }

        rec.set_ray_hit(ray, root);
        let outward_normal = (rec.location - self.center) / self.radius;
        rec.normal = outward_normal.normalize();
        rec.tex_coords = Self::sphere_uv(rec.normal);
        rec.shader = self.shader.as_ref();

        true
    }

    fn mask(&self) -> VisibilityMask {
        self.mask
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Sphere
    }

    fn model_to_world(&self) -> Mat4 {
        self.placement.matrix()
    }

    fn set_model_to_world(&mut self, model_to_world: Mat4) {
        self.placement = Placement::new(model_to_world);
        self.center = self.placement.point(Vec3::ZERO);
    }
}
