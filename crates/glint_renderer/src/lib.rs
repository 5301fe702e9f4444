//! Glint Renderer - recursive ray tracing on the CPU.
//!
//! Scene objects implement [`Intersectable`]; surfaces implement
//! [`Shader`]. Shaders trace shadow and reflection rays back through the
//! scene with a bounded bounce budget, and [`render`] runs the whole image
//! in parallel over scanlines.

mod mask;
mod intersectable;
mod sphere;
mod plane;
mod triangle;
mod mesh;
mod bounded_mesh;
mod scene;
mod light;
mod shader;
mod camera;
mod renderer;

pub use mask::VisibilityMask;
pub use intersectable::{HitRecord, Intersectable, Placement, ShapeKind};
pub use sphere::Sphere;
pub use plane::Plane;
pub use triangle::Triangle;
pub use mesh::Mesh;
pub use bounded_mesh::BoundedMesh;
pub use scene::Scene;
pub use light::Light;
pub use shader::{
    direct_lighting, reflect, trace_reflection, Color, LightSample, Lambertian, Mirror,
    NullShader, Phong, Shader, TexturedLambertian, BACKGROUND, REFLECTION_BIAS, SHADOW_BIAS,
};
pub use camera::Camera;
pub use renderer::{
    color_to_rgb, linear_to_gamma, render, render_scanline, scanline_order, trace_ray, ConfigError,
    ConfigResult, ImageBuffer, RenderConfig,
};

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Interval, Mat4, Ray, Vec2, Vec3};
