use crate::{Interval, Ray, Vec3};

/// Minimum thickness of a box along any axis.
///
/// Keeps boxes around flat, axis-aligned geometry from collapsing to a
/// zero-width slab that every ray would miss.
const MIN_EXTENT: f32 = 0.0001;

/// Unit roundoff of `f32` arithmetic.
const MACHINE_EPSILON: f32 = f32::EPSILON * 0.5;

/// Growth applied to each far slab distance.
///
/// `1 + 2 * gamma(3)`, where `gamma(n)` bounds the relative error of `n`
/// chained float operations. A ray aimed at a corner or edge of the box
/// then keeps its single-point overlap instead of losing it to rounding.
const FAR_SCALE: f32 = 1.0 + 2.0 * (3.0 * MACHINE_EPSILON) / (1.0 - 3.0 * MACHINE_EPSILON);

/// Axis-Aligned Bounding Box used to reject rays before expensive tests.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create the smallest AABB enclosing every point.
    ///
    /// Returns [`Aabb::EMPTY`] when the iterator yields nothing.
    pub fn enclosing<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let bounds = points.into_iter().fold(Aabb::EMPTY, |acc, p| Aabb {
            x: acc.x.include(p.x),
            y: acc.y.include(p.y),
            z: acc.z.include(p.z),
        });

        if bounds.is_empty() {
            bounds
        } else {
            Self::new(bounds.x, bounds.y, bounds.z)
        }
    }

    /// True if the box contains no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Corner with the smallest coordinates.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Corner with the largest coordinates.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Box enlarged by `margin` on every side.
    pub fn grow(&self, margin: f32) -> Aabb {
        Aabb {
            x: self.x.expand(2.0 * margin),
            y: self.y.expand(2.0 * margin),
            z: self.z.expand(2.0 * margin),
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component yields an infinite inverse;
    /// `f32::max`/`f32::min` discard the NaN produced when the origin sits
    /// exactly on a slab plane, so the test still terminates with a
    /// well-defined answer.
    ///
    /// The overlap is closed: a ray touching the box at a single parameter
    /// (a corner or an edge) counts as a hit.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let orig = r.origin[axis];

            let mut t0 = (slab.min - orig) * adinv;
            let mut t1 = (slab.max - orig) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t1 *= FAR_SCALE;

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::enclosing([Vec3::splat(-1.0), Vec3::splat(1.0)])
    }

    #[test]
    fn test_aabb_new_keeps_thick_intervals() {
        let aabb = Aabb::new(
            Interval::new(0.0, 10.0),
            Interval::new(0.0, 10.0),
            Interval::new(0.0, 10.0),
        );

        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_enclosing() {
        let aabb = Aabb::enclosing([
            Vec3::new(-1.0, 2.0, 0.5),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
        ]);

        assert_eq!(aabb.min(), Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max(), Vec3::new(3.0, 2.0, 4.0));
    }

    #[test]
    fn test_aabb_enclosing_nothing_is_empty() {
        let aabb = Aabb::enclosing(std::iter::empty());
        assert!(aabb.is_empty());

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::new(f32::NEG_INFINITY, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_flat_box_is_padded() {
        // A quad lying in z = 0
        let aabb = Aabb::enclosing([Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)]);
        assert!(aabb.z.size() >= MIN_EXTENT * 0.999);

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_grow() {
        let grown = unit_box().grow(0.5);
        assert_eq!(grown.min(), Vec3::splat(-1.5));
        assert_eq!(grown.max(), Vec3::splat(1.5));

        assert!(Aabb::EMPTY.grow(1.0).is_empty());
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_respects_range() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        // Box spans t in [4, 6]
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.5)));
        assert!(!aabb.hit(&ray, Interval::new(6.5, 10.0)));
        assert!(aabb.hit(&ray, Interval::new(5.0, 5.5)));
    }

    #[test]
    fn test_aabb_hit_zero_direction_component() {
        let aabb = unit_box();

        // Parallel to the x slabs, inside them
        let inside = Ray::new(Vec3::new(0.5, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&inside, Interval::new(0.0, 100.0)));

        // Parallel to the x slabs, outside them
        let outside = Ray::new(Vec3::new(2.0, 0.0, -5.0), Vec3::Z);
        assert!(!aabb.hit(&outside, Interval::new(0.0, 100.0)));

        // Origin exactly on a slab plane produces NaN; must not panic
        let on_plane = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::Z);
        let _ = aabb.hit(&on_plane, Interval::new(0.0, 100.0));
    }

    #[test]
    fn test_aabb_hit_negative_direction() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_grazing_edge() {
        let aabb = unit_box();

        // Touches the edge x = 1, y = -1 at t = 1 and nowhere else
        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, -1.0, 0.0));
        assert!(aabb.hit(&ray, Interval::new(1e-6, 1e6)));

        // Same direction, shifted off the edge
        let ray = Ray::new(Vec3::new(2.1, 0.0, 0.0), Vec3::new(-1.0, -1.0, 0.0));
        assert!(!aabb.hit(&ray, Interval::new(1e-6, 1e6)));
    }

    #[test]
    fn test_aabb_hit_grazing_corner() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(2.0, 0.0, 2.0), Vec3::new(-1.0, -1.0, -1.0));
        assert!(aabb.hit(&ray, Interval::new(1e-6, 1e6)));
    }
}
