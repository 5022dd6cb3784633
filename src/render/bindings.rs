//! Bind groups for the three binding frequencies.
//!
//! Each constructor states what it binds as [`BoundResource`] tags and checks
//! them against the pipeline's binding table before touching the device, so
//! a host-side mistake surfaces as a [`BindingError`] instead of a wgpu
//! validation panic.

use glam::Mat4;

use crate::binding::{BindingError, BindingFrequency, BoundResource, ResourceKind};
use crate::camera::CameraParams;
use crate::material::Material;
use crate::pipeline::PipelineKind;
use crate::space::{Light, SpaceKind, WorldSpace};
use crate::uniforms::{
    CameraObjectUniform, LightUniform, LitObjectUniform, MaterialUniform, ModelUniform,
};

use super::buffers::uniform_buffer;
use super::pipelines::MaterialPipeline;
use super::texture::GpuTexture;

/// One resource of a bind group, tagged with what it holds.
struct Binding<'a> {
    binding: u32,
    resource: ResourceKind,
    entry: wgpu::BindingResource<'a>,
}

impl<'a> Binding<'a> {
    fn buffer(binding: u32, resource: ResourceKind, buffer: &'a wgpu::Buffer) -> Self {
        Self {
            binding,
            resource,
            entry: buffer.as_entire_binding(),
        }
    }
}

fn tags(frequency: BindingFrequency, bindings: &[Binding<'_>]) -> Vec<BoundResource> {
    bindings
        .iter()
        .map(|binding| BoundResource::new(frequency.group(), binding.binding, binding.resource))
        .collect()
}

/// Validates `bindings` and creates the group. `Ok(None)` when the pipeline
/// has no group at this frequency and nothing was offered for it.
fn create_group(
    device: &wgpu::Device,
    pipeline: &MaterialPipeline,
    frequency: BindingFrequency,
    bindings: &[Binding<'_>],
) -> Result<Option<wgpu::BindGroup>, BindingError> {
    pipeline
        .kind()
        .validate_group(frequency, &tags(frequency, bindings))?;
    let Some(layout) = pipeline.group_layout(frequency) else {
        return Ok(None);
    };
    let entries: Vec<wgpu::BindGroupEntry<'_>> = bindings
        .iter()
        .map(|binding| wgpu::BindGroupEntry {
            binding: binding.binding,
            resource: binding.entry.clone(),
        })
        .collect();
    let label = format!("{}-{:?}-bind-group", pipeline.kind(), frequency).to_lowercase();
    Ok(Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&label),
        layout,
        entries: &entries,
    })))
}

fn required(
    group: Option<wgpu::BindGroup>,
    pipeline: PipelineKind,
    frequency: BindingFrequency,
) -> anyhow::Result<wgpu::BindGroup> {
    group.ok_or_else(|| anyhow::anyhow!("{pipeline} has no {frequency:?} bind group"))
}

/// Which of the frame buffers a pipeline's group 0 takes, by binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBuffer {
    ViewProjection,
    WorldLight,
    CameraLight,
}

impl FrameBuffer {
    pub fn resource(self) -> ResourceKind {
        match self {
            FrameBuffer::ViewProjection => ResourceKind::ViewProjection,
            FrameBuffer::WorldLight => ResourceKind::Light(SpaceKind::World),
            FrameBuffer::CameraLight => ResourceKind::Light(SpaceKind::Camera),
        }
    }

    /// The frame group each pipeline is fed.
    pub fn for_pipeline(kind: PipelineKind) -> &'static [(u32, FrameBuffer)] {
        match kind {
            PipelineKind::WorldLitTextured => &[
                (0, FrameBuffer::ViewProjection),
                (1, FrameBuffer::WorldLight),
            ],
            PipelineKind::UnlitTextured | PipelineKind::UnlitColored => {
                &[(0, FrameBuffer::ViewProjection)]
            }
            PipelineKind::CameraLitSpecular => &[(0, FrameBuffer::CameraLight)],
        }
    }
}

/// Frame-frequency buffers, written once per frame and shared by every
/// pipeline's group 0.
pub struct FrameResources {
    view_proj: wgpu::Buffer,
    world_light: wgpu::Buffer,
    camera_light: wgpu::Buffer,
}

impl FrameResources {
    pub fn new(device: &wgpu::Device, camera: &CameraParams, light: &Light<WorldSpace>) -> Self {
        let camera_light = camera.light_in_camera_space(light);
        Self {
            view_proj: uniform_buffer(device, "frame-uniform", &camera.frame_uniform()),
            world_light: uniform_buffer(device, "world-light", &LightUniform::new(light)),
            camera_light: uniform_buffer(device, "camera-light", &LightUniform::new(&camera_light)),
        }
    }

    fn buffer(&self, which: FrameBuffer) -> &wgpu::Buffer {
        match which {
            FrameBuffer::ViewProjection => &self.view_proj,
            FrameBuffer::WorldLight => &self.world_light,
            FrameBuffer::CameraLight => &self.camera_light,
        }
    }

    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        pipeline: &MaterialPipeline,
    ) -> anyhow::Result<wgpu::BindGroup> {
        let bindings: Vec<Binding<'_>> = FrameBuffer::for_pipeline(pipeline.kind())
            .iter()
            .map(|(binding, which)| {
                Binding::buffer(*binding, which.resource(), self.buffer(*which))
            })
            .collect();
        let group = create_group(device, pipeline, BindingFrequency::Frame, &bindings)?;
        required(group, pipeline.kind(), BindingFrequency::Frame)
    }
}

/// Object-frequency uniform of one draw.
pub struct ObjectBindings {
    _buffer: wgpu::Buffer,
    pub group: wgpu::BindGroup,
}

impl ObjectBindings {
    pub fn new(
        device: &wgpu::Device,
        pipeline: &MaterialPipeline,
        model: Mat4,
        camera: &CameraParams,
    ) -> anyhow::Result<Self> {
        let buffer = match pipeline.kind() {
            PipelineKind::WorldLitTextured => {
                uniform_buffer(device, "object-uniform", &LitObjectUniform::from_model(model))
            }
            PipelineKind::CameraLitSpecular => uniform_buffer(
                device,
                "object-uniform",
                &CameraObjectUniform::new(model, camera.view(), camera.projection()),
            ),
            PipelineKind::UnlitTextured | PipelineKind::UnlitColored => {
                uniform_buffer(device, "object-uniform", &ModelUniform::new(model))
            }
        };
        let resource = object_resource(pipeline.kind());
        let group = create_group(
            device,
            pipeline,
            BindingFrequency::Object,
            &[Binding::buffer(0, resource, &buffer)],
        )?;
        let group = required(group, pipeline.kind(), BindingFrequency::Object)?;
        Ok(Self {
            _buffer: buffer,
            group,
        })
    }
}

/// The uniform block an object group carries at binding 0.
pub fn object_resource(kind: PipelineKind) -> ResourceKind {
    match kind {
        PipelineKind::WorldLitTextured => ResourceKind::ModelNormal,
        PipelineKind::CameraLitSpecular => ResourceKind::ModelViewNormal,
        PipelineKind::UnlitTextured | PipelineKind::UnlitColored => ResourceKind::Model,
    }
}

/// Everything the host binds for one draw with `kind`, across all groups.
pub fn draw_resources(kind: PipelineKind) -> Vec<BoundResource> {
    let frame = FrameBuffer::for_pipeline(kind).iter().map(|(binding, which)| {
        BoundResource::new(BindingFrequency::Frame.group(), *binding, which.resource())
    });
    let object = std::iter::once(BoundResource::new(
        BindingFrequency::Object.group(),
        0,
        object_resource(kind),
    ));
    let material = material_resources(kind).into_iter().map(|(binding, resource)| {
        BoundResource::new(BindingFrequency::Material.group(), binding, resource)
    });
    frame.chain(object).chain(material).collect()
}

/// What a material group holds: texture and sampler, plus the shading
/// coefficients for the lit pipelines.
pub fn material_resources(kind: PipelineKind) -> Vec<(u32, ResourceKind)> {
    if !kind.is_textured() {
        return Vec::new();
    }
    let mut resources = vec![(0, ResourceKind::Texture), (1, ResourceKind::Sampler)];
    if kind.is_lit() {
        resources.push((2, ResourceKind::MaterialCoefficients));
    }
    resources
}

/// Material-frequency resources: texture, sampler and coefficients.
pub struct MaterialBindings {
    _texture: GpuTexture,
    _coefficients: wgpu::Buffer,
    pub group: wgpu::BindGroup,
}

impl MaterialBindings {
    /// `Ok(None)` for pipelines without a material group.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &MaterialPipeline,
        material: &Material,
    ) -> anyhow::Result<Option<Self>> {
        if pipeline.group_layout(BindingFrequency::Material).is_none() {
            return Ok(None);
        }

        let texture = GpuTexture::upload(
            device,
            queue,
            &material.texture.texels(),
            &material.sampler,
            &format!("{}-texture", material.name),
        );
        let coefficients = uniform_buffer(
            device,
            "material-uniform",
            &MaterialUniform::new(&material.coefficients),
        );

        let bindings: Vec<Binding<'_>> = material_resources(pipeline.kind())
            .into_iter()
            .map(|(binding, resource)| {
                let entry = match resource {
                    ResourceKind::Texture => wgpu::BindingResource::TextureView(&texture.view),
                    ResourceKind::Sampler => wgpu::BindingResource::Sampler(&texture.sampler),
                    _ => coefficients.as_entire_binding(),
                };
                Binding {
                    binding,
                    resource,
                    entry,
                }
            })
            .collect();

        let group = create_group(device, pipeline, BindingFrequency::Material, &bindings)?;
        let group = required(group, pipeline.kind(), BindingFrequency::Material)?;
        drop(bindings);
        Ok(Some(Self {
            _texture: texture,
            _coefficients: coefficients,
            group,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_tags(kind: PipelineKind) -> Vec<BoundResource> {
        FrameBuffer::for_pipeline(kind)
            .iter()
            .map(|(binding, which)| BoundResource::new(0, *binding, which.resource()))
            .collect()
    }

    fn material_tags(kind: PipelineKind) -> Vec<BoundResource> {
        material_resources(kind)
            .into_iter()
            .map(|(binding, resource)| BoundResource::new(2, binding, resource))
            .collect()
    }

    #[test]
    fn frame_buffers_satisfy_every_pipeline() {
        for kind in PipelineKind::ALL {
            kind.validate_group(BindingFrequency::Frame, &frame_tags(kind))
                .unwrap_or_else(|err| panic!("{err}"));
        }
    }

    #[test]
    fn material_resources_satisfy_every_pipeline() {
        for kind in PipelineKind::ALL {
            kind.validate_group(BindingFrequency::Material, &material_tags(kind))
                .unwrap_or_else(|err| panic!("{err}"));
        }
        assert!(material_resources(PipelineKind::UnlitColored).is_empty());
    }

    #[test]
    fn draw_resources_cover_every_pipeline() {
        for kind in PipelineKind::ALL {
            kind.validate(&draw_resources(kind))
                .unwrap_or_else(|err| panic!("{err}"));
        }
    }

    #[test]
    fn draw_resources_fail_on_the_wrong_pipeline() {
        let bound = draw_resources(PipelineKind::UnlitColored);
        let err = PipelineKind::UnlitTextured.validate(&bound).unwrap_err();
        assert!(matches!(err, BindingError::Missing { group: 2, .. }));
    }

    #[test]
    fn world_light_in_camera_pipeline_is_a_space_mismatch() {
        let bound = [BoundResource::new(0, 0, ResourceKind::Light(SpaceKind::World))];
        let err = PipelineKind::CameraLitSpecular
            .validate_group(BindingFrequency::Frame, &bound)
            .unwrap_err();
        assert!(matches!(
            err,
            BindingError::SpaceMismatch {
                expected: SpaceKind::Camera,
                found: SpaceKind::World,
                ..
            }
        ));
    }

    #[test]
    fn unlit_textured_material_group_has_no_coefficients() {
        let bound = material_tags(PipelineKind::WorldLitTextured);
        let err = PipelineKind::UnlitTextured
            .validate_group(BindingFrequency::Material, &bound)
            .unwrap_err();
        assert!(matches!(err, BindingError::Unexpected { binding: 2, .. }));
    }
}
