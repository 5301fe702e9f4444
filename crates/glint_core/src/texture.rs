//! Image textures for surface shaders.
//!
//! Textures are decoded once during scene assembly and stored as linear
//! RGB floats, so sampling during rendering is a pure read.

use std::path::Path;

use glint_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture has {got} pixels, expected {width}x{height}")]
    SizeMismatch { width: u32, height: u32, got: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with linear RGB pixel data in row-major order.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Texture {
    /// Create a texture from pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec3>) -> TextureResult<Self> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                got: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Load a texture from an image file, converting sRGB to linear.
    pub fn open<P: AsRef<Path>>(path: P) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels = rgb
            .pixels()
            .map(|p| {
                Vec3::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);
        Self::from_pixels(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample the texture at UV coordinates (bilinear filtering).
    ///
    /// UVs wrap, with (0, 0) at the bottom-left of the image.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        // Convert to pixel coordinates
        let x = u * (self.width - 1) as f32;
        let y = (1.0 - v) * (self.height - 1) as f32; // Flip V for image rows

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let top = self.pixel(x0, y0).lerp(self.pixel(x1, y0), fx);
        let bottom = self.pixel(x0, y1).lerp(self.pixel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    fn pixel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y.min(self.height - 1) * self.width + x.min(self.width - 1)) as usize;
        self.pixels[idx]
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: top row black/white, bottom row white/black
        Texture::from_pixels(
            2,
            2,
            vec![Vec3::ZERO, Vec3::ONE, Vec3::ONE, Vec3::ZERO],
        )
        .unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width(), 1);
        assert_eq!(tex.height(), 1);

        let sample = tex.sample(Vec2::new(0.3, 0.7));
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_sample_corners() {
        let tex = checker();

        // v = 1 is the top row
        assert!((tex.sample(Vec2::new(0.0, 0.999)) - Vec3::ZERO).length() < 0.01);
        // v = 0 is the bottom row
        assert!((tex.sample(Vec2::new(0.0, 0.0)) - Vec3::ONE).length() < 0.001);
    }

    #[test]
    fn test_sample_blends() {
        let tex = checker();
        let center = tex.sample(Vec2::new(0.5, 0.5));
        assert!((center - Vec3::splat(0.5)).length() < 0.001);
    }

    #[test]
    fn test_from_pixels_rejects_wrong_size() {
        let err = Texture::from_pixels(2, 2, vec![Vec3::ZERO]).unwrap_err();
        assert!(matches!(err, TextureError::SizeMismatch { got: 1, .. }));
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }

    #[test]
    fn test_open_missing_file() {
        assert!(Texture::open("/definitely/not/here.png").is_err());
    }
}
