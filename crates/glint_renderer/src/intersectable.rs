//! Intersectable trait and HitRecord for ray-object intersection.

use std::fmt;

use crate::{shader::NULL_SHADER, Shader, VisibilityMask};
use glint_math::{Interval, Mat3, Mat4, Mat4Ext, Ray, Vec2, Vec3};

/// Record of a ray-object intersection.
///
/// Owned by the caller of [`Intersectable::intersect`]; the callee only
/// writes to it when it reports a hit.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// World-space surface normal (unit length)
    pub normal: Vec3,
    /// World-space point of intersection
    pub location: Vec3,
    /// Direction of the ray that produced this hit
    pub in_direction: Vec3,
    /// Shader of the surface that was hit
    pub shader: &'a dyn Shader,
    /// Interpolated texture coordinates
    pub tex_coords: Vec2,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            normal: Vec3::ZERO,
            location: Vec3::ZERO,
            in_direction: Vec3::ZERO,
            shader: &NULL_SHADER,
            tex_coords: Vec2::ZERO,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Fill in everything that follows from the ray and t alone.
    #[inline]
    pub(crate) fn set_ray_hit(&mut self, ray: &Ray, t: f32) {
        self.t = t;
        self.location = ray.at(t);
        self.in_direction = ray.direction();
    }

    /// True if both records resolved to the same shader instance.
    pub fn same_shader(&self, other: &HitRecord<'_>) -> bool {
        std::ptr::addr_eq(self.shader, other.shader)
    }
}

impl fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitRecord")
            .field("t", &self.t)
            .field("normal", &self.normal)
            .field("location", &self.location)
            .field("in_direction", &self.in_direction)
            .field("shader", &std::ptr::from_ref(self.shader).cast::<()>())
            .field("tex_coords", &self.tex_coords)
            .finish()
    }
}

/// Shape variants that implement [`Intersectable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Plane,
    Triangle,
    Mesh,
    BoundedMesh,
    Scene,
}

/// Model-to-world transform together with its normal matrix.
///
/// Both are computed together whenever the transform is set, so nothing
/// is derived lazily while rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    model_to_world: Mat4,
    normal_matrix: Mat3,
}

impl Placement {
    pub fn new(model_to_world: Mat4) -> Self {
        Self {
            model_to_world,
            normal_matrix: model_to_world.normal_matrix(),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.model_to_world
    }

    /// Model-space point to world space.
    #[inline]
    pub fn point(&self, p: Vec3) -> Vec3 {
        self.model_to_world.transform_point3(p)
    }

    /// Model-space normal to a unit world-space normal.
    #[inline]
    pub fn normal(&self, n: Vec3) -> Vec3 {
        (self.normal_matrix * n).normalize()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

/// Trait for scene objects that rays can hit.
///
/// Implementations are shared read-only across render threads, hence the
/// `Send + Sync` bound. Transforms are only changed while the scene is
/// being assembled.
pub trait Intersectable: Send + Sync {
    /// Test whether `ray` hits this object with `t` inside `ray_t`.
    ///
    /// Returns false without touching any geometry when `self.mask()` and
    /// `query` share no bits. On a hit, `rec` is fully populated and
    /// `ray_t.contains(rec.t)` holds; on a miss `rec` is left alone.
    /// A zero-length ray direction gives an unspecified (but non-panicking)
    /// answer.
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        query: VisibilityMask,
    ) -> bool;

    /// Categories of rays this object takes part in.
    fn mask(&self) -> VisibilityMask;

    fn kind(&self) -> ShapeKind;

    fn model_to_world(&self) -> Mat4;

    /// Replace the model-to-world transform and recompute derived state.
    fn set_model_to_world(&mut self, model_to_world: Mat4);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_uses_null_shader() {
        let a = HitRecord::default();
        let b = HitRecord::default();
        assert!(a.same_shader(&b));
        assert_eq!(a.t, f32::INFINITY);
    }

    #[test]
    fn test_set_ray_hit() {
        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 2.0));
        rec.set_ray_hit(&ray, 2.0);

        assert_eq!(rec.t, 2.0);
        assert_eq!(rec.location, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(rec.in_direction, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_placement_translation() {
        let placement = Placement::new(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));

        assert_eq!(placement.point(Vec3::ZERO), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(placement.normal(Vec3::new(0.0, 3.0, 0.0)), Vec3::Y);
    }
}
