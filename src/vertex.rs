use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

/// Vertex of the two lit pipelines: position, texture coordinates, normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LitVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

/// Vertex of the unlit textured pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Vertex of the unlit vertex-colored pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LitVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl TexturedVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl ColoredVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<LitVertex> for TexturedVertex {
    fn from(vertex: LitVertex) -> Self {
        Self {
            position: vertex.position,
            tex_coords: vertex.tex_coords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_position_first(layout: &wgpu::VertexBufferLayout<'_>) {
        let first = layout.attributes[0];
        assert_eq!(first.shader_location, 0);
        assert_eq!(first.offset, 0);
        assert_eq!(first.format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn strides_match_struct_sizes() {
        assert_eq!(LitVertex::layout().array_stride, 32);
        assert_eq!(TexturedVertex::layout().array_stride, 20);
        assert_eq!(ColoredVertex::layout().array_stride, 24);
    }

    #[test]
    fn position_is_always_location_zero() {
        assert_position_first(&LitVertex::layout());
        assert_position_first(&TexturedVertex::layout());
        assert_position_first(&ColoredVertex::layout());
    }

    #[test]
    fn lit_attributes_are_packed() {
        let layout = LitVertex::layout();
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 20]);
    }
}
