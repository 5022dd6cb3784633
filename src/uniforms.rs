//! Uniform blocks shared by the WGSL programs and the host.
//!
//! Every struct here is `#[repr(C)]` and laid out to match the WGSL uniform
//! address space: `mat3x3<f32>` occupies three `vec4` columns and `vec3`
//! values are widened to `vec4`.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec4};
use log::warn;

use crate::material::ShadingCoefficients;
use crate::space::{Light, Space};

/// Frame-frequency block: the combined view-projection matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl FrameUniform {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// Object block for the unlit pipelines.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// Object block for the world-space lit pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LitObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}

impl LitObjectUniform {
    /// Builds the block and derives the normal matrix from `model`.
    pub fn from_model(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: mat3_to_3x4(normal_matrix(model)),
        }
    }

    /// Builds the block from a caller-supplied normal matrix.
    ///
    /// The normal matrix must be the inverse-transpose of `model`'s upper 3x3;
    /// debug builds assert it.
    pub fn with_normal(model: Mat4, normal: Mat3) -> Self {
        debug_assert!(
            normal.abs_diff_eq(normal_matrix(model), 1e-4),
            "normal matrix is not the inverse-transpose of the model matrix"
        );
        Self {
            model: model.to_cols_array_2d(),
            normal: mat3_to_3x4(normal),
        }
    }
}

/// Object block for the camera-space lit pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraObjectUniform {
    pub model_view_proj: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}

impl CameraObjectUniform {
    /// Composes every matrix from the same `model` so clip and lighting
    /// positions can never disagree.
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        let model_view = view * model;
        Self {
            model_view_proj: (projection * model_view).to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            normal: mat3_to_3x4(normal_matrix(model_view)),
        }
    }
}

/// Point light position, `w` fixed to 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
}

impl LightUniform {
    pub fn new<S: Space>(light: &Light<S>) -> Self {
        Self {
            position: light.position.vec().extend(1.0).into(),
        }
    }
}

/// Material coefficients: ambient, diffuse, specular, shininess.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub coefficients: [f32; 4],
}

impl MaterialUniform {
    pub fn new(coefficients: &ShadingCoefficients) -> Self {
        Self {
            coefficients: Vec4::new(
                coefficients.ambient,
                coefficients.diffuse,
                coefficients.specular,
                coefficients.shininess,
            )
            .into(),
        }
    }
}

/// Inverse-transpose of the upper-left 3x3 of `matrix`.
///
/// A singular matrix has no normal matrix; identity is returned instead and
/// the lighting of that object will be wrong.
pub fn normal_matrix(matrix: Mat4) -> Mat3 {
    let upper = Mat3::from_mat4(matrix);
    let determinant = upper.determinant();
    // relative to the column scales so small uniform scales stay invertible
    let scale = upper.x_axis.length() * upper.y_axis.length() * upper.z_axis.length();
    let invertible = determinant.abs() > scale * f32::EPSILON;
    if !invertible || !determinant.is_finite() {
        warn!("singular model matrix (det={determinant}); using identity normal matrix");
        return Mat3::IDENTITY;
    }
    upper.inverse().transpose()
}

pub(crate) fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

pub(crate) fn mat3_from_3x4(columns: &[[f32; 4]; 3]) -> Mat3 {
    Mat3::from_cols(
        Vec4::from_array(columns[0]).truncate(),
        Vec4::from_array(columns[1]).truncate(),
        Vec4::from_array(columns[2]).truncate(),
    )
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use glam::Vec3;

    use super::*;
    use crate::space::{CameraSpace, Position};

    #[test]
    fn block_sizes_match_wgsl_layout() {
        assert_eq!(size_of::<FrameUniform>(), 64);
        assert_eq!(size_of::<ModelUniform>(), 64);
        assert_eq!(size_of::<LitObjectUniform>(), 112);
        assert_eq!(size_of::<CameraObjectUniform>(), 176);
        assert_eq!(size_of::<LightUniform>(), 16);
        assert_eq!(size_of::<MaterialUniform>(), 16);
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular_under_non_uniform_scale() {
        let model = Mat4::from_rotation_y(0.4) * Mat4::from_scale(Vec3::new(4.0, 1.0, 0.5));
        let tangent = Vec3::new(1.0, 1.0, 0.0).normalize();
        let normal = Vec3::new(1.0, -1.0, 0.0).normalize();
        let transformed_tangent = model.transform_vector3(tangent);
        let transformed_normal = normal_matrix(model) * normal;
        assert!(transformed_tangent.dot(transformed_normal).abs() < 1e-5);
        // the plain model matrix would break perpendicularity
        assert!(transformed_tangent.dot(model.transform_vector3(normal)).abs() > 1e-2);
    }

    #[test]
    fn small_uniform_scale_keeps_rotation() {
        let model = Mat4::from_rotation_y(1.0) * Mat4::from_scale(Vec3::splat(0.004));
        let normal = (normal_matrix(model) * Vec3::X).normalize();
        let expected = Mat4::from_rotation_y(1.0).transform_vector3(Vec3::X);
        assert!(normal.abs_diff_eq(expected, 1e-4), "{normal:?}");
    }

    #[test]
    fn singular_model_falls_back_to_identity() {
        let model = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(normal_matrix(model), Mat3::IDENTITY);
    }

    #[test]
    fn lit_object_normal_round_trips_through_padding() {
        let model = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        let block = LitObjectUniform::from_model(model);
        let normal = mat3_from_3x4(&block.normal);
        assert!(normal.abs_diff_eq(normal_matrix(model), 1e-6));
        assert!(block.normal.iter().all(|column| column[3] == 0.0));
    }

    #[test]
    fn camera_object_matrices_share_one_model() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0);
        let block = CameraObjectUniform::new(model, view, projection);
        let model_view = Mat4::from_cols_array_2d(&block.model_view);
        let mvp = Mat4::from_cols_array_2d(&block.model_view_proj);
        assert!(mvp.abs_diff_eq(projection * model_view, 1e-5));
        assert!(model_view.abs_diff_eq(view * model, 1e-5));
    }

    #[test]
    fn light_block_is_a_point() {
        let light = Light::new(Position::<CameraSpace>::from_xyz(1.0, 2.0, 3.0));
        assert_eq!(LightUniform::new(&light).position, [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "inverse-transpose")]
    #[cfg(debug_assertions)]
    fn inconsistent_normal_matrix_is_caught_in_debug() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let _ = LitObjectUniform::with_normal(model, Mat3::IDENTITY);
    }
}
