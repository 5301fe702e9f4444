//! Light sources for direct illumination.

use glint_math::{Interval, Ray, Vec3};

use crate::shader::Color;

/// A light that can be sampled from a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Emits from a single world position, falling off with squared distance.
    Point { position: Vec3, intensity: Color },
    /// Emits along a fixed direction from infinitely far away.
    Directional { direction: Vec3, intensity: Color },
}

impl Light {
    pub fn point(position: Vec3, intensity: Color) -> Self {
        Light::Point { position, intensity }
    }

    /// `direction` is the way the light travels and is normalized here.
    pub fn directional(direction: Vec3, intensity: Color) -> Self {
        Light::Directional {
            direction: direction.normalize(),
            intensity,
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        match self {
            Light::Point { position, .. } => Some(*position),
            Light::Directional { .. } => None,
        }
    }

    pub fn direction(&self) -> Option<Vec3> {
        match self {
            Light::Point { .. } => None,
            Light::Directional { direction, .. } => Some(*direction),
        }
    }

    pub fn intensity(&self) -> Color {
        match self {
            Light::Point { intensity, .. } | Light::Directional { intensity, .. } => *intensity,
        }
    }

    /// Unit vector from `point` toward the light.
    pub fn direction_from(&self, point: Vec3) -> Vec3 {
        match self {
            Light::Point { position, .. } => (*position - point).normalize(),
            Light::Directional { direction, .. } => -*direction,
        }
    }

    /// Shadow ray from `origin` toward the light and the range an occluder
    /// must fall in.
    ///
    /// For a point light the ray direction spans the full distance, so the
    /// light itself sits at `t = 1`.
    pub fn shadow_ray(&self, origin: Vec3) -> (Ray, Interval) {
        match self {
            Light::Point { position, .. } => (Ray::new(origin, *position - origin), Interval::new(0.0, 1.0)),
            Light::Directional { direction, .. } => (Ray::new(origin, -*direction), Interval::from_min(0.0)),
        }
    }

    /// Radiance arriving at `point`, ignoring occlusion.
    pub fn radiance_at(&self, point: Vec3) -> Color {
        match self {
            Light::Point { position, intensity } => {
                let distance_squared = position.distance_squared(point);
                if distance_squared > 0.0 {
                    *intensity / distance_squared
                } else {
                    Color::ZERO
                }
            }
            Light::Directional { intensity, .. } => *intensity,
        }
    }
}
