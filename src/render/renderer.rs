use std::collections::HashMap;

use anyhow::{anyhow, Result};
use glam::{Mat4, Vec3};
use log::debug;

use crate::binding::BindingFrequency;
use crate::camera::CameraParams;
use crate::material::MaterialSet;
use crate::mesh::Mesh;
use crate::pipeline::PipelineKind;

use super::bindings::{draw_resources, FrameResources, MaterialBindings, ObjectBindings};
use super::buffers::MeshBuffers;
use super::context::GpuContext;
use super::pipelines::MaterialPipeline;
use super::plan::{plan_draws, BindCommand, DrawItem, RenderStats};
use super::target::{DepthBuffer, OffscreenTarget};

const SPHERE_STACKS: u32 = 16;
const SPHERE_SLICES: u32 = 24;
const SPACING: f32 = 2.5;

/// Draws one sphere per material into an offscreen target.
pub struct Renderer {
    context: GpuContext,
    pipelines: HashMap<PipelineKind, MaterialPipeline>,
    target: OffscreenTarget,
    depth: DepthBuffer,
}

impl Renderer {
    pub fn new(context: GpuContext, width: u32, height: u32) -> Self {
        let pipelines = PipelineKind::ALL
            .into_iter()
            .map(|kind| (kind, MaterialPipeline::new(&context.device, kind)))
            .collect();
        let target = OffscreenTarget::create(&context.device, width, height);
        let depth = DepthBuffer::create(&context.device, width, height);
        Self {
            context,
            pipelines,
            target,
            depth,
        }
    }

    pub fn adapter_name(&self) -> &str {
        self.context.adapter_name()
    }

    /// Camera that frames a row of `count` spheres.
    pub fn camera_for(&self, count: usize) -> CameraParams {
        let half_width = (count.max(1) as f32 * SPACING) / 2.0;
        let eye = Vec3::new(0.0, 1.0, half_width + 4.0);
        CameraParams::looking_at(eye, Vec3::ZERO, self.target.aspect())
    }

    fn pipeline(&self, kind: PipelineKind) -> Result<&MaterialPipeline> {
        self.pipelines
            .get(&kind)
            .ok_or_else(|| anyhow!("pipeline {kind} was not created"))
    }

    pub fn render(&self, set: &MaterialSet, camera: &CameraParams) -> Result<RenderStats> {
        let device = &self.context.device;
        let frame = FrameResources::new(device, camera, &set.world_light());

        let mut frame_groups = HashMap::new();
        let mut objects = Vec::with_capacity(set.materials.len());
        let mut materials = Vec::with_capacity(set.materials.len());
        let mut meshes = Vec::with_capacity(set.materials.len());
        let mut items = Vec::with_capacity(set.materials.len());

        let sphere = Mesh::sphere(SPHERE_STACKS, SPHERE_SLICES);
        for (index, material) in set.materials.iter().enumerate() {
            let pipeline = self.pipeline(material.pipeline)?;
            if !frame_groups.contains_key(&material.pipeline) {
                material.pipeline.validate(&draw_resources(material.pipeline))?;
                frame_groups.insert(material.pipeline, frame.bind_group(device, pipeline)?);
            }
            let model = Mat4::from_translation(row_position(index, set.materials.len()));
            objects.push(ObjectBindings::new(device, pipeline, model, camera)?);
            materials.push(MaterialBindings::new(device, &self.context.queue, pipeline, material)?);
            meshes.push(MeshBuffers::for_material(device, material, &sphere));
            items.push(DrawItem {
                pipeline: material.pipeline,
                material: index,
                object: index,
            });
        }

        let commands = plan_draws(&items);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("materials-encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("materials-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.03,
                            g: 0.03,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for command in &commands {
                match *command {
                    BindCommand::SetPipeline(kind) => {
                        pass.set_pipeline(self.pipeline(kind)?.render_pipeline());
                    }
                    BindCommand::BindFrame(kind) => {
                        let group = frame_groups
                            .get(&kind)
                            .ok_or_else(|| anyhow!("no frame bind group for {kind}"))?;
                        pass.set_bind_group(BindingFrequency::Frame.group(), group, &[]);
                    }
                    BindCommand::BindObject(index) => {
                        let group = &objects[index].group;
                        pass.set_bind_group(BindingFrequency::Object.group(), group, &[]);
                    }
                    BindCommand::BindMaterial(index) => {
                        if let Some(bindings) = &materials[index] {
                            let group = BindingFrequency::Material.group();
                            pass.set_bind_group(group, &bindings.group, &[]);
                        }
                    }
                    BindCommand::Draw(index) => {
                        let mesh = &meshes[index];
                        pass.set_vertex_buffer(0, mesh.vertex.slice(..));
                        pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                    }
                }
            }
        }
        self.context.queue.submit(std::iter::once(encoder.finish()));

        let stats = RenderStats::from_commands(&commands);
        debug!("rendered {stats:?} into {:?} target", self.target.size());
        Ok(stats)
    }
}

/// Centers `count` objects on the X axis.
fn row_position(index: usize, count: usize) -> Vec3 {
    let offset = (count.saturating_sub(1)) as f32 / 2.0;
    Vec3::new((index as f32 - offset) * SPACING, 0.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_is_centered_on_the_origin() {
        assert_eq!(row_position(0, 1), Vec3::ZERO);
        let left = row_position(0, 3);
        let right = row_position(2, 3);
        assert_eq!(left, -right);
        assert_eq!(row_position(1, 3), Vec3::ZERO);
    }
}
