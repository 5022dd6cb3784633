use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::material::Material;
use crate::mesh::Mesh;
use crate::pipeline::PipelineKind;
use crate::vertex::LitVertex;

pub struct MeshBuffers {
    pub vertex: wgpu::Buffer,
    pub index: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffers {
    pub fn from_mesh<V: Pod>(device: &wgpu::Device, mesh: &Mesh<V>, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Uploads `shape` in the vertex format of the material's pipeline.
    pub fn for_material(
        device: &wgpu::Device,
        material: &Material,
        shape: &Mesh<LitVertex>,
    ) -> Self {
        let label = material.name.as_str();
        match material.pipeline {
            PipelineKind::WorldLitTextured | PipelineKind::CameraLitSpecular => {
                Self::from_mesh(device, shape, label)
            }
            PipelineKind::UnlitTextured => Self::from_mesh(device, &shape.to_textured(), label),
            PipelineKind::UnlitColored => {
                Self::from_mesh(device, &shape.to_colored(material.color), label)
            }
        }
    }
}

pub(crate) fn uniform_buffer<T: Pod>(
    device: &wgpu::Device,
    label: &str,
    value: &T,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}
