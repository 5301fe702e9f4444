//! The demo scene: two spheres, a box of planes, a triangle and an
//! optional mesh, lit by one point and one directional light.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use glint_core::{load_obj, Texture};
use glint_math::{Mat4, Vec3};
use glint_renderer::{
    BoundedMesh, Camera, Color, Lambertian, Light, Mesh, Mirror, Phong, Plane, Scene, Shader,
    Sphere, TexturedLambertian, Triangle, VisibilityMask,
};

const AQUA: Color = Color::new(0.0, 0.8, 0.8);
const LAVENDER: Color = Color::new(178.0 / 255.0, 164.0 / 255.0, 212.0 / 255.0);
const BLUE: Color = Color::new(0.0, 0.0, 1.0);

fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

/// Assemble the demo scene, loading the optional mesh and texture.
pub fn build_scene(obj: Option<&Path>, texture: Option<&Path>) -> Result<Scene> {
    let blue_plastic: Arc<dyn Shader> = Arc::new(Phong::new(BLUE, Color::ONE, 100.0));
    let aqua: Arc<dyn Shader> = Arc::new(Lambertian::new(AQUA));
    let lavender: Arc<dyn Shader> = Arc::new(Lambertian::new(LAVENDER));
    let mirror: Arc<dyn Shader> = Arc::new(Mirror::new(1.0));

    let mut scene = Scene::new();
    scene.add(Sphere::new(blue_plastic.clone(), 0.8).with_transform(translate(-2.0, 0.0, 0.0)));
    scene.add(Sphere::new(mirror, 1.0));

    // Back wall, floor, and a wall behind the camera that casts no shadows
    scene.add(Plane::new(aqua.clone(), Vec3::NEG_Z).with_transform(translate(0.0, 0.0, 3.0)));
    scene.add(Plane::new(lavender, Vec3::Y).with_transform(translate(0.0, -3.0, 0.0)));
    scene.add(
        Plane::new(aqua, Vec3::Z)
            .with_mask(VisibilityMask::VISIBLE)
            .with_transform(translate(0.0, 0.0, -6.0)),
    );

    scene.add(Triangle::new(
        blue_plastic,
        Vec3::new(-1.0, 2.0, 1.0),
        Vec3::new(1.0, 2.0, 1.0),
        Vec3::new(0.0, 1.5, 1.0),
    ));

    if let Some(path) = obj {
        let geometry = load_obj(path).with_context(|| format!("loading mesh {}", path.display()))?;
        let shader: Arc<dyn Shader> = match texture {
            Some(path) => {
                let texture =
                    Texture::open(path).with_context(|| format!("loading texture {}", path.display()))?;
                Arc::new(TexturedLambertian::new(Arc::new(texture)))
            }
            None => Arc::new(Lambertian::new(Color::splat(0.7))),
        };

        let mesh = Mesh::new(shader, Arc::new(geometry))
            .with_context(|| format!("building mesh {}", path.display()))?
            .with_transform(translate(2.0, 0.0, 0.0));
        let bounded = BoundedMesh::new(mesh);
        log::info!("Mesh bounds: {:?} .. {:?}", bounded.bounds().min(), bounded.bounds().max());
        scene.add(bounded);
    }

    log::info!("Scene assembled with {} objects", scene.len());
    Ok(scene)
}

pub fn lights() -> Vec<Light> {
    vec![
        Light::point(Vec3::new(-1.0, 3.0, -1.0), 3.0 * Color::ONE),
        Light::directional(Vec3::new(0.0, -1.0, 1.0), 0.5 * Color::ONE),
    ]
}

/// Camera five units in front of the origin, looking down +Z.
pub fn camera(width: u32, height: u32) -> Camera {
    Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), Vec3::Y)
        .with_fov(45.0)
}
