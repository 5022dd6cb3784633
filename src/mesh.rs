use std::f32::consts::PI;

use glam::Vec3;

use crate::vertex::{ColoredVertex, LitVertex, TexturedVertex};

/// Indexed triangle list in one of the pipeline vertex formats.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> Mesh<V> {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Mesh<LitVertex> {
    /// Latitude/longitude unit sphere centered on the origin. Texture `u`
    /// runs around the equator, `v` from the north pole down.
    pub fn sphere(stacks: u32, slices: u32) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
        for stack in 0..=stacks {
            let v = stack as f32 / stacks as f32;
            let phi = v * PI;
            for slice in 0..=slices {
                let u = slice as f32 / slices as f32;
                let theta = u * 2.0 * PI;
                let normal = Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    -phi.sin() * theta.sin(),
                );
                vertices.push(LitVertex {
                    position: normal.into(),
                    tex_coords: [u, v],
                    normal: normal.into(),
                });
            }
        }

        let row = slices + 1;
        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
        Self { vertices, indices }
    }

    pub fn to_textured(&self) -> Mesh<TexturedVertex> {
        Mesh {
            vertices: self.vertices.iter().copied().map(TexturedVertex::from).collect(),
            indices: self.indices.clone(),
        }
    }

    pub fn to_colored(&self, color: Vec3) -> Mesh<ColoredVertex> {
        Mesh {
            vertices: self
                .vertices
                .iter()
                .map(|vertex| ColoredVertex {
                    position: vertex.position,
                    color: color.into(),
                })
                .collect(),
            indices: self.indices.clone(),
        }
    }
}
