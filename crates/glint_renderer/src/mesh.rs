//! Triangle meshes backed by a geometry provider.
//!
//! Every face is tested on every query, which is slow for large meshes.
//! See [`BoundedMesh`](crate::BoundedMesh) for the accelerated variant.

use std::sync::Arc;

use glint_core::{validate_triangles, GeometryProvider, GeometryResult};
use glint_math::{Interval, Mat4, Ray, Vec2, Vec3};

use crate::triangle::{face_normal, intersect_triangle, TriangleHit};
use crate::{HitRecord, Intersectable, Placement, Shader, ShapeKind, VisibilityMask};

/// A triangle mesh placed in the world by a model-to-world transform.
pub struct Mesh {
    geometry: Arc<dyn GeometryProvider>,
    shader: Arc<dyn Shader>,
    mask: VisibilityMask,
    culling: bool,
    placement: Placement,
}

impl Mesh {
    /// Create a mesh with back-face culling enabled.
    ///
    /// Fails if any face is not a triangle or references an index that
    /// does not exist; these are reported here, never while rendering.
    pub fn new(shader: Arc<dyn Shader>, geometry: Arc<dyn GeometryProvider>) -> GeometryResult<Self> {
        validate_triangles(geometry.as_ref())?;
        log::debug!(
            "Mesh with {} faces, {} vertices",
            geometry.face_count(),
            geometry.vertex_count()
        );

        Ok(Self {
            geometry,
            shader,
            mask: VisibilityMask::DEFAULT,
            culling: true,
            placement: Placement::default(),
        })
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

    pub fn geometry(&self) -> &Arc<dyn GeometryProvider> {
        &self.geometry
    }

    /// World-space corners of face `f`.
    #[inline]
    fn world_face(&self, f: usize) -> [Vec3; 3] {
        let face = self.geometry.face(f);
        [face[0], face[1], face[2]].map(|i| self.placement.point(self.geometry.vertex(i as usize)))
    }

    /// World-space position of every face corner.
    pub fn world_vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.geometry.face_count()).flat_map(move |f| self.world_face(f))
    }

    /// Write the shading attributes of a face hit into `rec`.
    fn fill_record<'a>(&'a self, f: usize, corners: [Vec3; 3], hit: TriangleHit, ray: &Ray, rec: &mut HitRecord<'a>) {
        let (w0, w1, w2) = hit.weights();
        let geometry = self.geometry.as_ref();

        rec.set_ray_hit(ray, hit.t);
        rec.shader = self.shader.as_ref();

        rec.normal = if geometry.has_normals() {
            let n = geometry.normal_face(f);
            let [n0, n1, n2] =
                [n[0], n[1], n[2]].map(|i| self.placement.normal(geometry.normal(i as usize)));
            (w0 * n0 + w1 * n1 + w2 * n2).normalize()
        } else {
            face_normal(corners)
        };

        rec.tex_coords = if geometry.has_texture_coords() {
            let uv = geometry.texture_face(f);
            let [t0, t1, t2] = [uv[0], uv[1], uv[2]].map(|i| geometry.texture_coord(i as usize));
            w0 * t0 + w1 * t1 + w2 * t2
        } else {
            Vec2::new(hit.u, hit.v)
        };
    }
}

impl Intersectable for Mesh {
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

        let mut closest = f32::INFINITY;
        let mut hit_anything = false;

        for f in 0..self.geometry.face_count() {
            let corners = self.world_face(f);
            let hit = match intersect_triangle(ray, corners, self.culling) {
                Some(hit) => hit,
                None => continue,
            };

            // Later faces never replace an equally near hit
            if hit.t >= closest || !ray_t.contains(hit.t) {
                continue;
            }

            self.fill_record(f, corners, hit, ray, rec);
            closest = hit.t;
            hit_anything = true;
        }

        hit_anything
    }

    fn mask(&self) -> VisibilityMask {
        self.mask
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Mesh
    }

    fn model_to_world(&self) -> Mat4 {
        self.placement.matrix()
    }

    fn set_model_to_world(&mut self, model_to_world: Mat4) {
        self.placement = Placement::new(model_to_world);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::Lambertian;
    use glint_core::{GeometryError, MeshData};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geometry provider that counts every read of vertex or face data.
    pub(crate) struct CountingGeometry {
        pub inner: MeshData,
        pub reads: AtomicUsize,
    }

    impl CountingGeometry {
        pub fn new(inner: MeshData) -> Self {
            Self {
                inner,
                reads: AtomicUsize::new(0),
            }
        }

        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        fn touch(&self) {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl GeometryProvider for CountingGeometry {
        fn vertex_count(&self) -> usize {
            self.inner.vertex_count()
        }
        fn vertex(&self, i: usize) -> Vec3 {
            self.touch();
            self.inner.vertex(i)
        }
        fn texture_coord_count(&self) -> usize {
            self.inner.texture_coord_count()
        }
        fn texture_coord(&self, i: usize) -> Vec2 {
            self.touch();
            self.inner.texture_coord(i)
        }
        fn normal_count(&self) -> usize {
            self.inner.normal_count()
        }
        fn normal(&self, i: usize) -> Vec3 {
            self.touch();
            self.inner.normal(i)
        }
        fn face_count(&self) -> usize {
            self.inner.face_count()
        }
        fn face(&self, i: usize) -> &[u32] {
            self.touch();
            self.inner.face(i)
        }
        fn texture_face(&self, i: usize) -> &[u32] {
            self.touch();
            self.inner.texture_face(i)
        }
        fn normal_face(&self, i: usize) -> &[u32] {
            self.touch();
            self.inner.normal_face(i)
        }
    }

    /// Unit square in z = 0 split along the (1,-1)-(-1,1) diagonal,
    /// wound to face -Z. The diagonal is u + v == 1 in both faces.
    pub(crate) fn square() -> MeshData {
        MeshData::from_triangles(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            &[[0, 1, 2], [3, 2, 1]],
        )
    }

    fn shader() -> Arc<dyn Shader> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)))
    }

    fn toward_square(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, -5.0), Vec3::Z)
    }

    #[test]
    fn test_mesh_hit() {
        let mesh = Mesh::new(shader(), Arc::new(square())).unwrap();
        let mut rec = HitRecord::default();

        assert!(mesh.intersect(&toward_square(0.5, 0.5), Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));
        assert!((rec.t - 5.0).abs() < 1e-5);
        assert!((rec.normal - Vec3::NEG_Z).length() < 1e-5);
        assert!((rec.location - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_mesh_culls_back_faces_by_default() {
        let mesh = Mesh::new(shader(), Arc::new(square())).unwrap();
        let from_behind = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(!mesh.intersect(&from_behind, Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));

        let two_sided = Mesh::new(shader(), Arc::new(square())).unwrap().with_culling(false);
        assert!(two_sided.intersect(&from_behind, Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));
    }

    #[test]
    fn test_mesh_nearest_face_wins() {
        // Two parallel triangles at z = 0 and z = 2; the far one comes first
        let tri = |z: f32| {
            [
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(0.0, 1.0, z),
                Vec3::new(1.0, -1.0, z),
            ]
        };
        let positions = tri(2.0).into_iter().chain(tri(0.0)).collect();
        let data = MeshData::from_triangles(positions, &[[0, 1, 2], [3, 4, 5]]);
        let mesh = Mesh::new(shader(), Arc::new(data)).unwrap();
        let mut rec = HitRecord::default();

        assert!(mesh.intersect(&toward_square(0.0, 0.0), Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));
        assert!((rec.t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_shared_edge_single_hit() {
        // Tag each face through its texture coordinates
        let data = square().with_tex_coords(
            vec![Vec2::ZERO, Vec2::ONE],
            vec![vec![0, 0, 0], vec![1, 1, 1]],
        );
        let mesh = Mesh::new(shader(), Arc::new(data)).unwrap();
        let mut rec = HitRecord::default();

        assert!(mesh.intersect(&toward_square(0.0, 0.0), Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));
        // Both faces hit at the same t; the first face keeps it
        assert_eq!(rec.tex_coords, Vec2::ZERO);
    }

    #[test]
    fn test_mesh_range_clipping() {
        let mesh = Mesh::new(shader(), Arc::new(square())).unwrap();
        let mut rec = HitRecord::default();

        assert!(!mesh.intersect(&toward_square(0.5, 0.5), Interval::new(1e-6, 4.0), &mut rec, VisibilityMask::VISIBLE));
        assert!(!mesh.intersect(&toward_square(0.5, 0.5), Interval::new(6.0, 1e6), &mut rec, VisibilityMask::VISIBLE));
        assert_eq!(rec.t, f32::INFINITY);
    }

    #[test]
    fn test_mesh_interpolates_normals_and_uvs() {
        let data = MeshData::from_triangles(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
            ],
            &[[0, 1, 2]],
        )
        .with_normals(
            vec![Vec3::NEG_Z, Vec3::new(0.0, 1.0, -1.0).normalize(), Vec3::NEG_Z],
            vec![vec![0, 1, 2]],
        )
        .with_tex_coords(
            vec![Vec2::new(0.0, 0.0), Vec2::new(0.5, 1.0), Vec2::new(1.0, 0.0)],
            vec![vec![0, 1, 2]],
        );
        let mesh = Mesh::new(shader(), Arc::new(data)).unwrap();
        let mut rec = HitRecord::default();

        // Straight at v1
        assert!(mesh.intersect(&toward_square(0.0, 1.0), Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));
        assert!((rec.normal - Vec3::new(0.0, 1.0, -1.0).normalize()).length() < 1e-4);
        assert!((rec.tex_coords - Vec2::new(0.5, 1.0)).length() < 1e-4);
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_transform() {
        let mesh = Mesh::new(shader(), Arc::new(square()))
            .unwrap()
            .with_transform(Mat4::from_translation(Vec3::new(2.0, 0.0, 1.0)));
        let mut rec = HitRecord::default();

        assert!(!mesh.intersect(&toward_square(0.0, 0.0), Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));
        assert!(mesh.intersect(&toward_square(2.5, 0.5), Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));
        assert!((rec.t - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_mask_gating_reads_no_geometry() {
        let geometry = Arc::new(CountingGeometry::new(square()));
        let mesh = Mesh::new(shader(), geometry.clone())
            .unwrap()
            .with_mask(VisibilityMask::VISIBLE);
        let before = geometry.reads();
        let mut rec = HitRecord::default();

        assert!(!mesh.intersect(&toward_square(0.5, 0.5), Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::SHADOW));
        assert_eq!(geometry.reads(), before);

        assert!(mesh.intersect(&toward_square(0.5, 0.5), Interval::new(1e-6, 1e6), &mut rec, VisibilityMask::VISIBLE));
        assert!(geometry.reads() > before);
    }

    #[test]
    fn test_malformed_mesh_is_rejected() {
        let data = MeshData::new(square().positions, vec![vec![0, 1, 2, 3]]);
        let err = Mesh::new(shader(), Arc::new(data)).err().unwrap();

        assert!(matches!(err, GeometryError::MalformedFace { face: 0, arity: 4 }));
    }
}
