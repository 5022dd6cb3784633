//! Camera-space lit, textured pipeline with a Blinn-Phong highlight.
//!
//! The light must be moved into camera space by the host before it reaches
//! [`fragment`]; see [`crate::space::Light::to_camera`].

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::{lighting, modulate, transform, BoundTexture, LitVarying};
use crate::space::{CameraSpace, Light, Position};
use crate::uniforms::{mat3_from_3x4, CameraObjectUniform, MaterialUniform};
use crate::vertex::LitVertex;

pub fn vertex(object: &CameraObjectUniform, input: &LitVertex) -> LitVarying<CameraSpace> {
    let model_view_proj = Mat4::from_cols_array_2d(&object.model_view_proj);
    let model_view = Mat4::from_cols_array_2d(&object.model_view);
    let position = Vec3::from(input.position);
    LitVarying {
        clip_position: transform::clip_position(model_view_proj, position),
        position: Position::new(transform::shading_position(model_view, position)),
        tex_coords: Vec2::from(input.tex_coords),
        normal: transform::transform_normal(
            mat3_from_3x4(&object.normal),
            Vec3::from(input.normal),
        ),
    }
}

/// Diffuse and specular are summed before the texel modulates them, so the
/// highlight takes the surface color.
pub fn fragment(
    light: &Light<CameraSpace>,
    material: &MaterialUniform,
    texture: &BoundTexture<'_>,
    input: &LitVarying<CameraSpace>,
) -> Vec4 {
    let texel = texture.sample(input.tex_coords);
    let normal = input.normal.normalize();
    let light_dir = lighting::light_direction(light, input.position);
    let view_dir = lighting::view_direction(input.position);

    let [ambient, k_diffuse, k_specular, shininess] = material.coefficients;
    let diffuse = lighting::diffuse(normal, light_dir);
    let specular = lighting::blinn_phong_specular(normal, light_dir, view_dir, shininess);
    modulate(texel, ambient + k_diffuse * diffuse + k_specular * specular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShadingCoefficients;
    use crate::space::WorldSpace;
    use crate::texture::{SamplerPolicy, Texels};

    fn run(
        light: Light<CameraSpace>,
        object: CameraObjectUniform,
        input: LitVertex,
        texels: &Texels,
    ) -> Vec4 {
        let texture = BoundTexture::new(texels, SamplerPolicy::default());
        let material = MaterialUniform::new(&ShadingCoefficients::default());
        fragment(&light, &material, &texture, &vertex(&object, &input))
    }

    fn facing_camera(z: f32) -> LitVertex {
        LitVertex {
            position: [0.0, 0.0, z],
            tex_coords: [0.5, 0.5],
            normal: [0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn head_on_light_gives_diffuse_plus_full_highlight() {
        let object = CameraObjectUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
        let light = Light::new(Position::from_xyz(0.0, 0.0, 5.0));
        let texels = Texels::solid([255, 255, 255, 200]);
        let out = run(light, object, facing_camera(-1.0), &texels);
        assert!(out.truncate().abs_diff_eq(Vec3::splat(2.0), 1e-5));
        assert!((out.w - 200.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn highlight_is_tinted_by_the_texture() {
        let object = CameraObjectUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
        let light = Light::new(Position::from_xyz(0.0, 0.0, 5.0));
        let texels = Texels::solid([255, 0, 0, 255]);
        let out = run(light, object, facing_camera(-1.0), &texels);
        assert!((out.x - 2.0).abs() < 1e-5);
        assert_eq!(out.y, 0.0);
        assert_eq!(out.z, 0.0);
    }

    #[test]
    fn identity_vertex_passes_through() {
        let object = CameraObjectUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
        let out = vertex(&object, &facing_camera(-1.0));
        assert_eq!(out.clip_position, Vec4::new(0.0, 0.0, -1.0, 1.0));
        assert_eq!(out.position.vec(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn world_light_must_be_moved_into_camera_space() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y);
        let object = CameraObjectUniform::new(Mat4::IDENTITY, view, Mat4::IDENTITY);
        let world_light = Light::new(Position::<WorldSpace>::from_xyz(0.0, 0.0, 10.0));
        let texels = Texels::solid([255, 255, 255, 255]);

        let out = run(world_light.to_camera(view), object, facing_camera(0.0), &texels);
        assert!(out.truncate().abs_diff_eq(Vec3::splat(2.0), 1e-4));
    }

    #[test]
    fn specular_disappears_when_the_light_is_behind() {
        let object = CameraObjectUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
        let light = Light::new(Position::from_xyz(0.0, 1.0, -10.0));
        let texels = Texels::solid([255, 255, 255, 255]);
        let out = run(light, object, facing_camera(-1.0), &texels);
        assert!(out.truncate().length() < 1e-6);
    }
}
