use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

use crate::binding::{
    self, BindingError, BindingFrequency, BindingSlot, BoundResource, ResourceKind,
    StageVisibility,
};
use crate::shaders;
use crate::space::SpaceKind;
use crate::vertex::{ColoredVertex, LitVertex, TexturedVertex};

use BindingFrequency::{Frame, Material, Object};
use StageVisibility::{Fragment, Vertex};

/// The four material pipelines. Each one is selected per draw and is
/// independent of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    /// Diffuse lighting in world space, textured surface.
    WorldLitTextured,
    /// Texture only.
    UnlitTextured,
    /// Diffuse plus Blinn-Phong specular in camera space, textured surface.
    CameraLitSpecular,
    /// Per-vertex color only.
    UnlitColored,
}

const WORLD_LIT_TEXTURED_SLOTS: &[BindingSlot] = &[
    BindingSlot::new(Frame, 0, ResourceKind::ViewProjection, Vertex),
    BindingSlot::new(Frame, 1, ResourceKind::Light(SpaceKind::World), Fragment),
    BindingSlot::new(Object, 0, ResourceKind::ModelNormal, Vertex),
    BindingSlot::new(Material, 0, ResourceKind::Texture, Fragment),
    BindingSlot::new(Material, 1, ResourceKind::Sampler, Fragment),
    BindingSlot::new(Material, 2, ResourceKind::MaterialCoefficients, Fragment),
];

const UNLIT_TEXTURED_SLOTS: &[BindingSlot] = &[
    BindingSlot::new(Frame, 0, ResourceKind::ViewProjection, Vertex),
    BindingSlot::new(Object, 0, ResourceKind::Model, Vertex),
    BindingSlot::new(Material, 0, ResourceKind::Texture, Fragment),
    BindingSlot::new(Material, 1, ResourceKind::Sampler, Fragment),
];

const CAMERA_LIT_SPECULAR_SLOTS: &[BindingSlot] = &[
    BindingSlot::new(Frame, 0, ResourceKind::Light(SpaceKind::Camera), Fragment),
    BindingSlot::new(Object, 0, ResourceKind::ModelViewNormal, Vertex),
    BindingSlot::new(Material, 0, ResourceKind::Texture, Fragment),
    BindingSlot::new(Material, 1, ResourceKind::Sampler, Fragment),
    BindingSlot::new(Material, 2, ResourceKind::MaterialCoefficients, Fragment),
];

const UNLIT_COLORED_SLOTS: &[BindingSlot] = &[
    BindingSlot::new(Frame, 0, ResourceKind::ViewProjection, Vertex),
    BindingSlot::new(Object, 0, ResourceKind::Model, Vertex),
];

impl PipelineKind {
    pub const ALL: [PipelineKind; 4] = [
        PipelineKind::WorldLitTextured,
        PipelineKind::UnlitTextured,
        PipelineKind::CameraLitSpecular,
        PipelineKind::UnlitColored,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PipelineKind::WorldLitTextured => "world-lit-textured",
            PipelineKind::UnlitTextured => "unlit-textured",
            PipelineKind::CameraLitSpecular => "camera-lit-specular",
            PipelineKind::UnlitColored => "unlit-colored",
        }
    }

    /// WGSL source with `vs_main` and `fs_main` entry points.
    pub const fn shader_source(self) -> &'static str {
        match self {
            PipelineKind::WorldLitTextured => shaders::WORLD_LIT_TEXTURED,
            PipelineKind::UnlitTextured => shaders::UNLIT_TEXTURED,
            PipelineKind::CameraLitSpecular => shaders::CAMERA_LIT_SPECULAR,
            PipelineKind::UnlitColored => shaders::UNLIT_COLORED,
        }
    }

    pub fn vertex_layout(self) -> wgpu::VertexBufferLayout<'static> {
        match self {
            PipelineKind::WorldLitTextured | PipelineKind::CameraLitSpecular => LitVertex::layout(),
            PipelineKind::UnlitTextured => TexturedVertex::layout(),
            PipelineKind::UnlitColored => ColoredVertex::layout(),
        }
    }

    pub const fn binding_slots(self) -> &'static [BindingSlot] {
        match self {
            PipelineKind::WorldLitTextured => WORLD_LIT_TEXTURED_SLOTS,
            PipelineKind::UnlitTextured => UNLIT_TEXTURED_SLOTS,
            PipelineKind::CameraLitSpecular => CAMERA_LIT_SPECULAR_SLOTS,
            PipelineKind::UnlitColored => UNLIT_COLORED_SLOTS,
        }
    }

    /// Slots of one bind group, in binding order.
    pub fn group_slots(
        self,
        frequency: BindingFrequency,
    ) -> impl Iterator<Item = &'static BindingSlot> {
        self.binding_slots()
            .iter()
            .filter(move |slot| slot.frequency == frequency)
    }

    /// Frequencies this pipeline binds, lowest group first.
    pub fn frequencies(self) -> Vec<BindingFrequency> {
        BindingFrequency::ALL
            .into_iter()
            .filter(|frequency| self.group_slots(*frequency).next().is_some())
            .collect()
    }

    pub fn is_lit(self) -> bool {
        self.lighting_space().is_some()
    }

    /// Space the fragment stage computes lighting in, if it lights at all.
    pub const fn lighting_space(self) -> Option<SpaceKind> {
        match self {
            PipelineKind::WorldLitTextured => Some(SpaceKind::World),
            PipelineKind::CameraLitSpecular => Some(SpaceKind::Camera),
            PipelineKind::UnlitTextured | PipelineKind::UnlitColored => None,
        }
    }

    pub fn is_textured(self) -> bool {
        !matches!(self, PipelineKind::UnlitColored)
    }

    pub fn validate(self, bound: &[BoundResource]) -> Result<(), BindingError> {
        binding::validate(self.name(), self.binding_slots(), bound)
    }

    pub fn validate_group(
        self,
        frequency: BindingFrequency,
        bound: &[BoundResource],
    ) -> Result<(), BindingError> {
        binding::validate_groups(self.name(), self.binding_slots(), bound, &[frequency.group()])
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PipelineKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                anyhow!(
                    "unknown pipeline {value:?}; expected one of world-lit-textured, \
                     unlit-textured, camera-lit-specular, unlit-colored"
                )
            })
    }
}
