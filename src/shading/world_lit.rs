//! World-space lit, textured pipeline: diffuse only, no ambient floor.

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::{lighting, modulate, transform, BoundTexture, LitVarying};
use crate::space::{Light, Position, WorldSpace};
use crate::uniforms::{mat3_from_3x4, FrameUniform, LitObjectUniform, MaterialUniform};
use crate::vertex::LitVertex;

pub fn vertex(
    frame: &FrameUniform,
    object: &LitObjectUniform,
    input: &LitVertex,
) -> LitVarying<WorldSpace> {
    let model = Mat4::from_cols_array_2d(&object.model);
    let view_proj = Mat4::from_cols_array_2d(&frame.view_proj);
    let position = Vec3::from(input.position);
    LitVarying {
        clip_position: transform::clip_position(view_proj * model, position),
        position: Position::new(transform::shading_position(model, position)),
        tex_coords: Vec2::from(input.tex_coords),
        normal: transform::transform_normal(
            mat3_from_3x4(&object.normal),
            Vec3::from(input.normal),
        ),
    }
}

pub fn fragment(
    light: &Light<WorldSpace>,
    material: &MaterialUniform,
    texture: &BoundTexture<'_>,
    input: &LitVarying<WorldSpace>,
) -> Vec4 {
    let texel = texture.sample(input.tex_coords);
    let normal = input.normal.normalize();
    let light_dir = lighting::light_direction(light, input.position);
    let diffuse = lighting::diffuse(normal, light_dir);
    let [ambient, k_diffuse, _, _] = material.coefficients;
    modulate(texel, ambient + k_diffuse * diffuse)
}
