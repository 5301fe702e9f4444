//! Parallel scanline renderer.
//!
//! Each scanline is an independent rayon task that owns its hit record
//! and its row of colors. Rows are copied into the [`ImageBuffer`] once
//! every task has finished.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use glint_math::{Interval, Ray};
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Camera, Color, HitRecord, Intersectable, Light, VisibilityMask, BACKGROUND};

/// Errors raised while loading render settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Result type for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Render configuration.
///
/// Every field has a default, so a settings file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Maximum reflection bounces per primary ray
    pub max_bounces: u32,
    /// Ambient light applied by every shader
    pub ambient: Color,
    /// Primary ray range
    pub min_t: f32,
    pub max_t: f32,
    /// Render scanlines in random order for better load balance
    pub shuffle_scanlines: bool,
    /// Apply gamma 2.0 when converting to 8-bit
    pub gamma_correct: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            max_bounces: 10,
            ambient: Color::splat(0.1),
            min_t: 1e-6,
            max_t: 1e6,
            shuffle_scanlines: true,
            gamma_correct: true,
        }
    }
}

impl RenderConfig {
    /// Parse and validate settings from JSON text.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a settings file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::debug!("Loaded render settings from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.min_t < self.max_t) {
            return Err(ConfigError::Invalid(format!(
                "min_t ({}) must be less than max_t ({})",
                self.min_t, self.max_t
            )));
        }
        Ok(())
    }

    /// Primary ray range.
    pub fn ray_range(&self) -> Interval {
        Interval::new(self.min_t, self.max_t)
    }
}

/// Compute the color seen along a primary ray.
pub fn trace_ray(ray: &Ray, scene: &dyn Intersectable, lights: &[Light], config: &RenderConfig) -> Color {
    let mut rec = HitRecord::default();

    if !scene.intersect(ray, config.ray_range(), &mut rec, VisibilityMask::VISIBLE) {
        return BACKGROUND;
    }

    rec.shader.shade(&rec, scene, lights, config.ambient, 0, config.max_bounces)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGB, clamping each channel to [0, 1].
pub fn color_to_rgb(color: Color, gamma_correct: bool) -> [u8; 3] {
    let encode = |c: f32| {
        let c = if gamma_correct { linear_to_gamma(c) } else { c };
        (255.0 * c.clamp(0.0, 1.0)) as u8
    };
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Linear color image, row-major with row 0 at the top.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Offset of pixel (x, y) in `pixels`, computed in `usize`.
    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Overwrite row `y` with `row`.
    pub fn set_row(&mut self, y: u32, row: &[Color]) {
        let start = self.index(0, y);
        self.pixels[start..start + self.width as usize].copy_from_slice(row);
    }

    /// Convert to RGB bytes.
    pub fn to_rgb8(&self, gamma_correct: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color, gamma_correct));
        }
        bytes
    }

    /// Write the image to disk; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P, gamma_correct: bool) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.to_rgb8(gamma_correct),
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
    }
}

/// Order in which scanlines are handed to the thread pool.
pub fn scanline_order(height: u32, shuffle: bool) -> Vec<u32> {
    let mut rows: Vec<u32> = (0..height).collect();
    if shuffle {
        rows.shuffle(&mut rand::thread_rng());
    }
    rows
}

/// Colors of every pixel in row `y`.
pub fn render_scanline(
    y: u32,
    camera: &Camera,
    scene: &dyn Intersectable,
    lights: &[Light],
    config: &RenderConfig,
) -> Vec<Color> {
    (0..camera.image_width)
        .map(|x| trace_ray(&camera.get_ray(x, y), scene, lights, config))
        .collect()
}

/// Render the entire scene in parallel, one task per scanline.
pub fn render(camera: &Camera, scene: &dyn Intersectable, lights: &[Light], config: &RenderConfig) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height;
    log::info!(
        "Rendering {}x{} with {} lights, max {} bounces",
        width,
        height,
        lights.len(),
        config.max_bounces
    );

    let start = Instant::now();
    let done = AtomicUsize::new(0);
    let report_every = (height as usize / 10).max(1);

    let rows: Vec<(u32, Vec<Color>)> = scanline_order(height, config.shuffle_scanlines)
        .into_par_iter()
        .map(|y| {
            let row = render_scanline(y, camera, scene, lights, config);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % report_every == 0 {
                log::debug!("Scanlines remaining: {}", height as usize - finished);
            }
            (y, row)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for (y, row) in &rows {
        image.set_row(*y, row);
    }

    log::info!("Rendered in {:.2?}", start.elapsed());
    image
}
