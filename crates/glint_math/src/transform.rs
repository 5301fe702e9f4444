// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and
// inverse(). Normals need the inverse transpose so they stay perpendicular
// to surfaces under non-uniform scale.

use glam::{Mat3, Mat4};

/// Extension trait for Mat4 with the transforms ray tracing needs.
pub trait Mat4Ext {
    /// Matrix that maps model-space normals to world space.
    ///
    /// Inverse transpose of the upper 3x3. Falls back to the upper 3x3
    /// itself when the matrix is singular.
    fn normal_matrix(&self) -> Mat3;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        let linear = Mat3::from_mat4(*self);
        if linear.determinant().abs() <= f32::EPSILON {
            return linear;
        }
        linear.inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn transform_normal(mat: &Mat4, normal: Vec3) -> Vec3 {
        (mat.normal_matrix() * normal).normalize()
    }

    #[test]
    fn test_transform_point3_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let transformed = mat.transform_point3(Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(transformed, Vec3::new(11.0, 22.0, 33.0));
    }

    #[test]
    fn test_normal_ignores_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(transform_normal(&mat, Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_normal_rotation() {
        use std::f32::consts::PI;

        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let transformed = transform_normal(&mat, Vec3::X);

        assert!((transformed - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_normal_non_uniform_scale_stays_perpendicular() {
        // Plane x + y = 0 has normal (1, 1, 0); stretch x by 4
        let mat = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
        let tangent = mat.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        let normal = transform_normal(&mat, Vec3::new(1.0, 1.0, 0.0).normalize());

        assert!(tangent.dot(normal).abs() < 1e-5);
        assert!((normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_singular_falls_back() {
        let mat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(mat.normal_matrix(), Mat3::from_mat4(mat));
    }
}
