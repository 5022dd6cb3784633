use log::debug;

use crate::binding::BindingFrequency;
use crate::pipeline::PipelineKind;
use crate::shaders::{FRAGMENT_ENTRY, VERTEX_ENTRY};

use super::target::{DepthBuffer, OffscreenTarget};

/// Layout entries of one bind group, straight from the pipeline's binding
/// table.
pub fn layout_entries(
    kind: PipelineKind,
    frequency: BindingFrequency,
) -> Vec<wgpu::BindGroupLayoutEntry> {
    kind.group_slots(frequency)
        .map(|slot| slot.layout_entry())
        .collect()
}

/// Number of bind group layouts the pipeline layout needs. Groups are
/// indexed by frequency, so a gap would still occupy a slot.
pub fn group_count(kind: PipelineKind) -> u32 {
    kind.frequencies()
        .last()
        .map_or(0, |frequency| frequency.group() + 1)
}

/// A compiled render pipeline and the bind group layouts it was built with.
pub struct MaterialPipeline {
    kind: PipelineKind,
    layouts: Vec<wgpu::BindGroupLayout>,
    pipeline: wgpu::RenderPipeline,
}

impl MaterialPipeline {
    pub fn new(device: &wgpu::Device, kind: PipelineKind) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(kind.name()),
            source: wgpu::ShaderSource::Wgsl(kind.shader_source().into()),
        });

        let layouts: Vec<wgpu::BindGroupLayout> = (0..group_count(kind))
            .map(|group| {
                let entries = BindingFrequency::from_group(group)
                    .map(|frequency| layout_entries(kind, frequency))
                    .unwrap_or_default();
                let label = format!("{kind}-group-{group}-layout");
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&label),
                    entries: &entries,
                })
            })
            .collect();
        let layout_refs: Vec<&wgpu::BindGroupLayout> = layouts.iter().collect();

        let layout_label = format!("{kind}-pipeline-layout");
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&layout_label),
            bind_group_layouts: &layout_refs,
            push_constant_ranges: &[],
        });

        let label = format!("{kind}-pipeline");
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[kind.vertex_layout()],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: OffscreenTarget::FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });
        debug!("created {kind} pipeline with {} bind group layout(s)", layouts.len());

        Self {
            kind,
            layouts,
            pipeline,
        }
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    pub fn render_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Layout of the group bound at `frequency`, if the pipeline binds
    /// anything there.
    pub fn group_layout(&self, frequency: BindingFrequency) -> Option<&wgpu::BindGroupLayout> {
        self.kind.group_slots(frequency).next()?;
        self.layouts.get(frequency.group() as usize)
    }
}
