//! The two unlit pipelines. Their fragment output depends only on the texel
//! or the interpolated vertex color.

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::{transform, BoundTexture, ColoredVarying, TexturedVarying};
use crate::uniforms::{FrameUniform, ModelUniform};
use crate::vertex::{ColoredVertex, TexturedVertex};

fn object_clip(frame: &FrameUniform, object: &ModelUniform, position: [f32; 3]) -> Vec4 {
    let view_proj = Mat4::from_cols_array_2d(&frame.view_proj);
    let model = Mat4::from_cols_array_2d(&object.model);
    transform::clip_position(view_proj * model, Vec3::from(position))
}

pub fn textured_vertex(
    frame: &FrameUniform,
    object: &ModelUniform,
    input: &TexturedVertex,
) -> TexturedVarying {
    TexturedVarying {
        clip_position: object_clip(frame, object, input.position),
        tex_coords: Vec2::from(input.tex_coords),
    }
}

pub fn textured_fragment(texture: &BoundTexture<'_>, input: &TexturedVarying) -> Vec4 {
    texture.sample(input.tex_coords)
}

pub fn colored_vertex(
    frame: &FrameUniform,
    object: &ModelUniform,
    input: &ColoredVertex,
) -> ColoredVarying {
    ColoredVarying {
        clip_position: object_clip(frame, object, input.position),
        color: Vec3::from(input.color),
    }
}

pub fn colored_fragment(input: &ColoredVarying) -> Vec4 {
    input.color.extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{ProceduralTexture, SamplerPolicy};

    fn transforms() -> Vec<(FrameUniform, ModelUniform)> {
        vec![
            (FrameUniform::new(Mat4::IDENTITY), ModelUniform::new(Mat4::IDENTITY)),
            (
                FrameUniform::new(Mat4::perspective_rh(1.2, 1.6, 0.1, 50.0)),
                ModelUniform::new(Mat4::from_scale_rotation_translation(
                    Vec3::new(2.0, 0.5, 1.0),
                    glam::Quat::from_rotation_y(0.7),
                    Vec3::new(1.0, -2.0, -8.0),
                )),
            ),
        ]
    }

    #[test]
    fn textured_output_ignores_transforms() {
        let texels = ProceduralTexture::Gradient.texels();
        let texture = BoundTexture::new(&texels, SamplerPolicy::default());
        let input = TexturedVertex {
            position: [0.3, 0.1, -0.2],
            tex_coords: [0.6, 0.3],
        };
        let expected = texels.sample(&SamplerPolicy::default(), Vec2::new(0.6, 0.3));
        for (frame, object) in transforms() {
            let out = textured_fragment(&texture, &textured_vertex(&frame, &object, &input));
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn colored_output_is_opaque_vertex_color() {
        let input = ColoredVertex {
            position: [1.0, 2.0, 3.0],
            color: [0.2, 0.4, 0.6],
        };
        for (frame, object) in transforms() {
            let out = colored_fragment(&colored_vertex(&frame, &object, &input));
            assert_eq!(out, Vec4::new(0.2, 0.4, 0.6, 1.0));
        }
    }

    #[test]
    fn identity_clip_position_is_homogeneous_input() {
        let (frame, object) = transforms().remove(0);
        let input = ColoredVertex {
            position: [1.0, 2.0, 3.0],
            color: [0.0; 3],
        };
        let out = colored_vertex(&frame, &object, &input);
        assert_eq!(out.clip_position, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }
}
