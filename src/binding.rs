//! The resource binding contract between the material pipelines and a host.
//!
//! Groups are assigned by how often a resource changes: group 0 holds frame
//! resources, group 1 object resources, group 2 material resources. A host
//! that binds a table of resources for a pipeline can check it with
//! [`validate`] before any command is recorded.

use std::fmt;

use thiserror::Error;

use crate::space::SpaceKind;

/// How often a bound resource changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingFrequency {
    Frame,
    Object,
    Material,
}

impl BindingFrequency {
    pub const ALL: [BindingFrequency; 3] = [
        BindingFrequency::Frame,
        BindingFrequency::Object,
        BindingFrequency::Material,
    ];

    /// Bind group index used for resources of this frequency.
    pub const fn group(self) -> u32 {
        match self {
            BindingFrequency::Frame => 0,
            BindingFrequency::Object => 1,
            BindingFrequency::Material => 2,
        }
    }

    pub fn from_group(group: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|frequency| frequency.group() == group)
    }
}

/// Shader stages a binding is visible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageVisibility {
    Vertex,
    Fragment,
}

impl StageVisibility {
    pub fn shader_stages(self) -> wgpu::ShaderStages {
        match self {
            StageVisibility::Vertex => wgpu::ShaderStages::VERTEX,
            StageVisibility::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

/// What a binding slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `FrameUniform`: view-projection matrix.
    ViewProjection,
    /// `ModelUniform`: model matrix.
    Model,
    /// `LitObjectUniform`: model and normal matrix.
    ModelNormal,
    /// `CameraObjectUniform`: model-view-projection, model-view and normal matrix.
    ModelViewNormal,
    /// `LightUniform` holding a position in the given space.
    Light(SpaceKind),
    /// `MaterialUniform`: shading coefficients.
    MaterialCoefficients,
    /// Filterable 2-D float texture.
    Texture,
    /// Filtering sampler.
    Sampler,
}

impl ResourceKind {
    /// Size of the uniform block for buffer resources.
    pub fn uniform_size(self) -> Option<u64> {
        use crate::uniforms::*;
        use std::mem::size_of;

        let size = match self {
            ResourceKind::ViewProjection => size_of::<FrameUniform>(),
            ResourceKind::Model => size_of::<ModelUniform>(),
            ResourceKind::ModelNormal => size_of::<LitObjectUniform>(),
            ResourceKind::ModelViewNormal => size_of::<CameraObjectUniform>(),
            ResourceKind::Light(_) => size_of::<LightUniform>(),
            ResourceKind::MaterialCoefficients => size_of::<MaterialUniform>(),
            ResourceKind::Texture | ResourceKind::Sampler => return None,
        };
        Some(size as u64)
    }

    pub fn binding_type(self) -> wgpu::BindingType {
        match self {
            ResourceKind::Texture => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            ResourceKind::Sampler => {
                wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
            }
            buffer => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: buffer.uniform_size().and_then(wgpu::BufferSize::new),
            },
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::ViewProjection => f.write_str("view-projection matrix"),
            ResourceKind::Model => f.write_str("model matrix"),
            ResourceKind::ModelNormal => f.write_str("model + normal matrix"),
            ResourceKind::ModelViewNormal => {
                f.write_str("model-view-projection + model-view + normal matrix")
            }
            ResourceKind::Light(space) => write!(f, "light position ({space})"),
            ResourceKind::MaterialCoefficients => f.write_str("material coefficients"),
            ResourceKind::Texture => f.write_str("texture"),
            ResourceKind::Sampler => f.write_str("sampler"),
        }
    }
}

/// One entry of a pipeline's binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingSlot {
    pub frequency: BindingFrequency,
    pub binding: u32,
    pub resource: ResourceKind,
    pub visibility: StageVisibility,
}

impl BindingSlot {
    pub const fn new(
        frequency: BindingFrequency,
        binding: u32,
        resource: ResourceKind,
        visibility: StageVisibility,
    ) -> Self {
        Self {
            frequency,
            binding,
            resource,
            visibility,
        }
    }

    pub const fn group(&self) -> u32 {
        self.frequency.group()
    }

    pub fn layout_entry(&self) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: self.binding,
            visibility: self.visibility.shader_stages(),
            ty: self.resource.binding_type(),
            count: None,
        }
    }
}

/// A resource a host intends to bind at `group`/`binding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundResource {
    pub group: u32,
    pub binding: u32,
    pub resource: ResourceKind,
}

impl BoundResource {
    pub const fn new(group: u32, binding: u32, resource: ResourceKind) -> Self {
        Self {
            group,
            binding,
            resource,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("{pipeline}: group {group} binding {binding} expects {expected} but nothing is bound")]
    Missing {
        pipeline: &'static str,
        group: u32,
        binding: u32,
        expected: ResourceKind,
    },
    #[error("{pipeline}: group {group} binding {binding} is not part of the pipeline layout ({found} bound)")]
    Unexpected {
        pipeline: &'static str,
        group: u32,
        binding: u32,
        found: ResourceKind,
    },
    #[error("{pipeline}: group {group} binding {binding} expects {expected}, found {found}")]
    ResourceMismatch {
        pipeline: &'static str,
        group: u32,
        binding: u32,
        expected: ResourceKind,
        found: ResourceKind,
    },
    #[error("{pipeline}: light at group {group} binding {binding} must be in {expected}, found {found}")]
    SpaceMismatch {
        pipeline: &'static str,
        group: u32,
        binding: u32,
        expected: SpaceKind,
        found: SpaceKind,
    },
    #[error("{pipeline}: group {group} binding {binding} is bound more than once")]
    Duplicate {
        pipeline: &'static str,
        group: u32,
        binding: u32,
    },
}

/// Checks `bound` against the binding table `slots` of `pipeline`.
///
/// Only groups listed in `groups` are checked, so a host can validate the
/// object group on its own while the frame group stays bound.
pub fn validate_groups(
    pipeline: &'static str,
    slots: &[BindingSlot],
    bound: &[BoundResource],
    groups: &[u32],
) -> Result<(), BindingError> {
    for (index, resource) in bound.iter().enumerate() {
        if bound[..index]
            .iter()
            .any(|other| other.group == resource.group && other.binding == resource.binding)
        {
            return Err(BindingError::Duplicate {
                pipeline,
                group: resource.group,
                binding: resource.binding,
            });
        }
        let slot = slots
            .iter()
            .find(|slot| slot.group() == resource.group && slot.binding == resource.binding);
        let Some(slot) = slot else {
            return Err(BindingError::Unexpected {
                pipeline,
                group: resource.group,
                binding: resource.binding,
                found: resource.resource,
            });
        };
        match (slot.resource, resource.resource) {
            (expected, found) if expected == found => {}
            (ResourceKind::Light(expected), ResourceKind::Light(found)) => {
                return Err(BindingError::SpaceMismatch {
                    pipeline,
                    group: resource.group,
                    binding: resource.binding,
                    expected,
                    found,
                });
            }
            (expected, found) => {
                return Err(BindingError::ResourceMismatch {
                    pipeline,
                    group: resource.group,
                    binding: resource.binding,
                    expected,
                    found,
                });
            }
        }
    }

    for slot in slots.iter().filter(|slot| groups.contains(&slot.group())) {
        let present = bound
            .iter()
            .any(|resource| resource.group == slot.group() && resource.binding == slot.binding);
        if !present {
            return Err(BindingError::Missing {
                pipeline,
                group: slot.group(),
                binding: slot.binding,
                expected: slot.resource,
            });
        }
    }
    Ok(())
}

/// Checks a complete binding table: every slot of every group must be bound.
pub fn validate(
    pipeline: &'static str,
    slots: &[BindingSlot],
    bound: &[BoundResource],
) -> Result<(), BindingError> {
    let mut groups: Vec<u32> = slots.iter().map(BindingSlot::group).collect();
    groups.sort_unstable();
    groups.dedup();
    validate_groups(pipeline, slots, bound, &groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOTS: &[BindingSlot] = &[
        BindingSlot::new(
            BindingFrequency::Frame,
            0,
            ResourceKind::Light(SpaceKind::Camera),
            StageVisibility::Fragment,
        ),
        BindingSlot::new(
            BindingFrequency::Object,
            0,
            ResourceKind::ModelViewNormal,
            StageVisibility::Vertex,
        ),
    ];

    #[test]
    fn frequencies_map_to_ascending_groups() {
        assert_eq!(BindingFrequency::Frame.group(), 0);
        assert_eq!(BindingFrequency::Object.group(), 1);
        assert_eq!(BindingFrequency::Material.group(), 2);
        assert_eq!(BindingFrequency::from_group(2), Some(BindingFrequency::Material));
        assert_eq!(BindingFrequency::from_group(3), None);
    }

    #[test]
    fn complete_table_validates() {
        let bound = [
            BoundResource::new(0, 0, ResourceKind::Light(SpaceKind::Camera)),
            BoundResource::new(1, 0, ResourceKind::ModelViewNormal),
        ];
        assert_eq!(validate("test", SLOTS, &bound), Ok(()));
    }

    #[test]
    fn world_light_in_camera_slot_is_a_space_mismatch() {
        let bound = [
            BoundResource::new(0, 0, ResourceKind::Light(SpaceKind::World)),
            BoundResource::new(1, 0, ResourceKind::ModelViewNormal),
        ];
        let err = validate("test", SLOTS, &bound).unwrap_err();
        assert!(matches!(
            err,
            BindingError::SpaceMismatch {
                expected: SpaceKind::Camera,
                found: SpaceKind::World,
                ..
            }
        ));
        assert!(err.to_string().contains("camera space"));
    }

    #[test]
    fn wrong_resource_and_missing_slot_are_rejected() {
        let bound = [BoundResource::new(1, 0, ResourceKind::Model)];
        assert!(matches!(
            validate("test", SLOTS, &bound),
            Err(BindingError::ResourceMismatch { group: 1, .. })
        ));

        let bound = [BoundResource::new(1, 0, ResourceKind::ModelViewNormal)];
        assert!(matches!(
            validate("test", SLOTS, &bound),
            Err(BindingError::Missing { group: 0, binding: 0, .. })
        ));
    }

    #[test]
    fn unknown_and_duplicate_slots_are_rejected() {
        let bound = [BoundResource::new(2, 0, ResourceKind::Texture)];
        assert!(matches!(
            validate_groups("test", SLOTS, &bound, &[]),
            Err(BindingError::Unexpected { group: 2, .. })
        ));

        let bound = [
            BoundResource::new(1, 0, ResourceKind::ModelViewNormal),
            BoundResource::new(1, 0, ResourceKind::ModelViewNormal),
        ];
        assert!(matches!(
            validate_groups("test", SLOTS, &bound, &[1]),
            Err(BindingError::Duplicate { group: 1, binding: 0, .. })
        ));
    }

    #[test]
    fn partial_validation_ignores_other_groups() {
        let bound = [BoundResource::new(1, 0, ResourceKind::ModelViewNormal)];
        assert_eq!(validate_groups("test", SLOTS, &bound, &[1]), Ok(()));
    }

    #[test]
    fn buffer_slots_carry_a_minimum_size() {
        let wgpu::BindingType::Buffer {
            min_binding_size, ..
        } = ResourceKind::ModelViewNormal.binding_type()
        else {
            panic!("expected a buffer binding");
        };
        assert_eq!(min_binding_size.map(|size| size.get()), Some(176));
    }
}
