//! Shader trait and the surface shaders used by the renderer.
//!
//! A shader turns a [`HitRecord`] into a color. Reflective shaders trace
//! further rays through the scene, bounded by an explicit bounce budget:
//! at `depth >= max_bounces` only the local term is returned.

use std::sync::Arc;

use glint_core::Texture;
use glint_math::{Interval, Ray, Vec3};

use crate::{HitRecord, Intersectable, Light, VisibilityMask};

/// Color type alias (linear RGB, unclamped)
pub type Color = Vec3;

/// Offset along the normal for shadow ray origins.
pub const SHADOW_BIAS: f32 = 1e-4;

/// Minimum distance for reflection hits.
pub const REFLECTION_BIAS: f32 = 1e-4;

/// Color of rays that leave the scene.
pub const BACKGROUND: Color = Color::ZERO;

/// Trait for surfaces that compute the color seen along a hit.
pub trait Shader: Send + Sync {
    /// Color leaving the surface at `hit` back along the incoming ray.
    ///
    /// `scene` is borrowed for the call only. `depth` is the number of
    /// bounces already taken.
    fn shade(
        &self,
        hit: &HitRecord,
        scene: &dyn Intersectable,
        lights: &[Light],
        ambient: Color,
        depth: u32,
        max_bounces: u32,
    ) -> Color;
}

/// Shader that is always black.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullShader;

impl Shader for NullShader {
    fn shade(&self, _: &HitRecord, _: &dyn Intersectable, _: &[Light], _: Color, _: u32, _: u32) -> Color {
        Color::ZERO
    }
}

pub(crate) static NULL_SHADER: NullShader = NullShader;

/// Light arriving at a surface point from one unoccluded light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit vector from the surface toward the light
    pub direction: Vec3,
    /// Radiance arriving at the surface
    pub radiance: Color,
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Sum `contribution` over every light not blocked from `hit`.
///
/// Shadow rays start just off the surface and only see objects whose mask
/// includes [`VisibilityMask::SHADOW`].
pub fn direct_lighting<F>(hit: &HitRecord, scene: &dyn Intersectable, lights: &[Light], mut contribution: F) -> Color
where
    F: FnMut(&LightSample) -> Color,
{
    let origin = hit.location + SHADOW_BIAS * hit.normal;
    let mut total = Color::ZERO;

    for light in lights {
        let (shadow_ray, range) = light.shadow_ray(origin);
        let mut occluder = HitRecord::default();
        if scene.intersect(&shadow_ray, range, &mut occluder, VisibilityMask::SHADOW) {
            continue;
        }

        total += contribution(&LightSample {
            direction: light.direction_from(hit.location),
            radiance: light.radiance_at(hit.location),
        });
    }

    total
}

/// Color seen along the mirror reflection of the incoming ray.
///
/// Returns `None` once the bounce budget is spent, and [`BACKGROUND`] when
/// the reflected ray leaves the scene.
pub fn trace_reflection(
    hit: &HitRecord,
    scene: &dyn Intersectable,
    lights: &[Light],
    ambient: Color,
    depth: u32,
    max_bounces: u32,
) -> Option<Color> {
    if depth >= max_bounces {
        return None;
    }

    let direction = reflect(hit.in_direction.normalize(), hit.normal);
    let ray = Ray::new(hit.location, direction);
    let mut rec = HitRecord::default();

    if !scene.intersect(&ray, Interval::from_min(REFLECTION_BIAS), &mut rec, VisibilityMask::VISIBLE) {
        return Some(BACKGROUND);
    }

    Some(rec.shader.shade(&rec, scene, lights, ambient, depth + 1, max_bounces))
}

#[inline]
fn lambert(albedo: Color, hit: &HitRecord, scene: &dyn Intersectable, lights: &[Light], ambient: Color) -> Color {
    let direct = direct_lighting(hit, scene, lights, |sample| {
        sample.radiance * hit.normal.dot(sample.direction).max(0.0)
    });
    albedo * (ambient + direct)
}

/// Lambertian (diffuse) shader.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Shader for Lambertian {
    fn shade(&self, hit: &HitRecord, scene: &dyn Intersectable, lights: &[Light], ambient: Color, _: u32, _: u32) -> Color {
        lambert(self.albedo, hit, scene, lights, ambient)
    }
}

/// Lambertian shader with albedo looked up from a texture.
pub struct TexturedLambertian {
    texture: Arc<Texture>,
}

impl TexturedLambertian {
    pub fn new(texture: Arc<Texture>) -> Self {
        Self { texture }
    }
}

impl Shader for TexturedLambertian {
    fn shade(&self, hit: &HitRecord, scene: &dyn Intersectable, lights: &[Light], ambient: Color, _: u32, _: u32) -> Color {
        let albedo = self.texture.sample(hit.tex_coords);
        lambert(albedo, hit, scene, lights, ambient)
    }
}

/// Phong shader: diffuse plus a specular highlight, optionally reflective.
#[derive(Debug, Clone, Copy)]
pub struct Phong {
    diffuse: Color,
    specular: Color,
    exponent: f32,
    reflectivity: f32,
}

impl Phong {
    pub fn new(diffuse: Color, specular: Color, exponent: f32) -> Self {
        Self {
            diffuse,
            specular,
            exponent,
            reflectivity: 0.0,
        }
    }

    /// Blend in `reflectivity` times the mirrored color.
    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }
}

impl Shader for Phong {
    fn shade(
        &self,
        hit: &HitRecord,
        scene: &dyn Intersectable,
        lights: &[Light],
        ambient: Color,
        depth: u32,
        max_bounces: u32,
    ) -> Color {
        let view = -hit.in_direction.normalize();

        let direct = direct_lighting(hit, scene, lights, |sample| {
            let diffuse = self.diffuse * hit.normal.dot(sample.direction).max(0.0);
            let mirrored = reflect(-sample.direction, hit.normal);
            let specular = self.specular * mirrored.dot(view).max(0.0).powf(self.exponent);
            sample.radiance * (diffuse + specular)
        });
        let local = self.diffuse * ambient + direct;

        if self.reflectivity <= 0.0 {
            return local;
        }
        match trace_reflection(hit, scene, lights, ambient, depth, max_bounces) {
            Some(reflected) => local + self.reflectivity * reflected,
            None => local,
        }
    }
}

/// Perfect mirror: ambient plus the attenuated reflection, with an
/// optional diffuse tint lit by the scene's lights.
///
/// The diffuse weight defaults to zero, which leaves a pure mirror whose
/// appearance comes from the reflection alone.
#[derive(Debug, Clone, Copy)]
pub struct Mirror {
    reflectance: f32,
    diffuse: Color,
}

impl Mirror {
    pub fn new(reflectance: f32) -> Self {
        Self {
            reflectance,
            diffuse: Color::ZERO,
        }
    }

    /// Weight of the directly lit diffuse term.
    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn diffuse(&self) -> Color {
        self.diffuse
    }
}

impl Shader for Mirror {
    fn shade(
        &self,
        hit: &HitRecord,
        scene: &dyn Intersectable,
        lights: &[Light],
        ambient: Color,
        depth: u32,
        max_bounces: u32,
    ) -> Color {
        let mut color = ambient;

        // No shadow rays for a pure mirror
        if self.diffuse != Color::ZERO {
            color += self.diffuse
                * direct_lighting(hit, scene, lights, |sample| {
                    sample.radiance * hit.normal.dot(sample.direction).max(0.0)
                });
        }

        let reflected = trace_reflection(hit, scene, lights, ambient, depth, max_bounces).unwrap_or(Color::ZERO);
        color + self.reflectance * reflected
    }
}
