//! Scene container holding every intersectable in the world.

use glint_math::{Interval, Mat4, Ray};

use crate::{HitRecord, Intersectable, Placement, ShapeKind, VisibilityMask};

/// An ordered collection of intersectables, itself intersectable.
///
/// Scenes can nest. The scene's own mask accepts every query; each child
/// applies its own mask.
pub struct Scene {
    objects: Vec<Box<dyn Intersectable>>,
    mask: VisibilityMask,
    placement: Placement,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            mask: VisibilityMask::ALL,
            placement: Placement::default(),
        }
    }

    /// Append an object. Iteration follows insertion order.
    pub fn add(&mut self, object: impl Intersectable + 'static) {
        self.objects.push(Box::new(object));
    }

    pub fn add_boxed(&mut self, object: Box<dyn Intersectable>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Intersectable> {
        self.objects.iter().map(|o| o.as_ref())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Intersectable for Scene {
    /// Nearest hit over all children.
    ///
    /// A child only replaces the current hit when strictly nearer, so on
    /// equal distances the earlier child wins.
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

        let mut temp_rec = HitRecord::default();
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if !object.intersect(ray, ray_t.with_max(closest_so_far), &mut temp_rec, query) {
                continue;
            }
            if hit_anything && temp_rec.t >= closest_so_far {
                continue;
            }

            hit_anything = true;
            closest_so_far = temp_rec.t;
            *rec = temp_rec;
        }

        hit_anything
    }

    fn mask(&self) -> VisibilityMask {
        self.mask
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Scene
    }

    /// Recorded only; children keep their own transforms.
    fn model_to_world(&self) -> Mat4 {
        self.placement.matrix()
    }

    fn set_model_to_world(&mut self, model_to_world: Mat4) {
        self.placement = Placement::new(model_to_world);
    }
}
