//! CPU evaluation of the four material pipelines.
//!
//! Every function here mirrors a stage of the WGSL programs in
//! [`crate::shaders`] and consumes the same uniform blocks the GPU does, so
//! the shading model can be exercised without an adapter. Degenerate inputs
//! (zero-length normals or directions) produce NaN intermediates exactly as
//! they do on the GPU; `f32::max` then clamps a NaN dot product to zero.

pub mod camera_lit;
pub mod lighting;
pub mod transform;
pub mod unlit;
pub mod world_lit;

use glam::{Vec2, Vec3, Vec4};

use crate::space::{Position, Space};
use crate::texture::{SamplerPolicy, Texels};

pub use lighting::{blinn_phong_specular, diffuse, light_direction, view_direction};
pub use transform::{clip_position, shading_position, transform_normal};

/// A texture and the sampler it is read through.
#[derive(Debug, Clone, Copy)]
pub struct BoundTexture<'a> {
    pub texels: &'a Texels,
    pub sampler: SamplerPolicy,
}

impl<'a> BoundTexture<'a> {
    pub fn new(texels: &'a Texels, sampler: SamplerPolicy) -> Self {
        Self { texels, sampler }
    }

    pub fn sample(&self, uv: Vec2) -> Vec4 {
        self.texels.sample(&self.sampler, uv)
    }
}

/// Vertex output of the lit pipelines. `position` is in the space the
/// fragment stage lights in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitVarying<S: Space> {
    pub clip_position: Vec4,
    pub position: Position<S>,
    pub tex_coords: Vec2,
    pub normal: Vec3,
}

/// Vertex output of the unlit textured pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedVarying {
    pub clip_position: Vec4,
    pub tex_coords: Vec2,
}

/// Vertex output of the unlit colored pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredVarying {
    pub clip_position: Vec4,
    pub color: Vec3,
}

fn modulate(texel: Vec4, shade: f32) -> Vec4 {
    (texel.truncate() * shade).extend(texel.w)
}
