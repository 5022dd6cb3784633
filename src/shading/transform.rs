use glam::{Mat3, Mat4, Vec3, Vec4};

/// `matrix * (position, 1)`. For the camera-space pipeline `matrix` is the
/// pre-multiplied model-view-projection, otherwise `view_proj * model`.
pub fn clip_position(matrix: Mat4, position: Vec3) -> Vec4 {
    matrix * position.extend(1.0)
}

/// Position handed to the fragment stage for lighting.
///
/// The homogeneous result is divided by its own `w` per vertex and only then
/// interpolated. This is exact for affine matrices (`w == 1`); a projective
/// model or model-view matrix would interpolate incorrectly.
pub fn shading_position(matrix: Mat4, position: Vec3) -> Vec3 {
    let homogeneous: Vec4 = matrix * position.extend(1.0);
    homogeneous.truncate() / homogeneous.w
}

/// Normal matrix times the object-space normal. Not renormalized here; the
/// fragment stage normalizes after interpolation.
pub fn transform_normal(normal_matrix: Mat3, normal: Vec3) -> Vec3 {
    normal_matrix * normal
}
