use glam::Vec3;

use crate::space::{CameraSpace, Light, Position, Space};

/// Unit direction from the fragment to the light. Both must be in the same
/// space, which the shared type parameter enforces.
pub fn light_direction<S: Space>(light: &Light<S>, fragment: Position<S>) -> Vec3 {
    (light.position.vec() - fragment.vec()).normalize()
}

/// Direction from a camera-space fragment toward the camera at the origin.
pub fn view_direction(fragment: Position<CameraSpace>) -> Vec3 {
    (-fragment.vec()).normalize()
}

/// Lambertian term, clamped to `[0, 1]`. A NaN direction yields zero.
pub fn diffuse(normal: Vec3, light_dir: Vec3) -> f32 {
    unit_clamp(normal.dot(light_dir))
}

/// Blinn-Phong highlight from the half vector of the light and view
/// directions.
pub fn blinn_phong_specular(normal: Vec3, light_dir: Vec3, view_dir: Vec3, shininess: f32) -> f32 {
    let half_dir = (light_dir + view_dir).normalize();
    unit_clamp(half_dir.dot(normal)).powf(shininess)
}

// `f32::clamp` keeps NaN; max/min map it to zero.
fn unit_clamp(cosine: f32) -> f32 {
    cosine.max(0.0).min(1.0)
}
