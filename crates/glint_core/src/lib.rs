//! Glint Core - geometry and texture inputs for the ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry providers**: the read-only `GeometryProvider` interface and
//!   its in-memory implementation, `MeshData`
//! - **OBJ support**: loading Wavefront OBJ files into `MeshData`
//! - **Textures**: image-backed textures sampled at UV coordinates
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{load_obj, GeometryProvider};
//!
//! let mesh = load_obj("models/spot.obj")?;
//! println!("Loaded {} faces", mesh.face_count());
//! ```

pub mod geometry;
pub mod obj;
pub mod texture;

// Re-export commonly used types
pub use geometry::{validate_triangles, GeometryError, GeometryProvider, GeometryResult, MeshData};
pub use obj::{load_obj, load_obj_from_str};
pub use texture::{Texture, TextureError, TextureResult};
