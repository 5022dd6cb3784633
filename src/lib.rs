//! Material pipelines for the Orrery renderer.
//!
//! Four WGSL programs make up the material system: world-space diffuse over
//! a texture, plain texture, camera-space diffuse plus Blinn-Phong over a
//! texture, and per-vertex color. The crate carries their binding contract,
//! the uniform and vertex layouts they read, a CPU evaluation of every stage
//! for testing, and a small offscreen wgpu host.

pub mod app;
pub mod binding;
pub mod camera;
pub mod library;
pub mod material;
pub mod mesh;
pub mod pipeline;
pub mod render;
pub mod shaders;
pub mod shading;
pub mod space;
pub mod texture;
pub mod uniforms;
pub mod vertex;

pub use binding::{BindingError, BindingFrequency, BindingSlot, BoundResource, ResourceKind};
pub use camera::CameraParams;
pub use library::MaterialLibrary;
pub use material::{Material, MaterialSet, ShadingCoefficients};
pub use mesh::Mesh;
pub use pipeline::PipelineKind;
pub use render::{AdapterUnavailable, GpuContext, RenderStats, Renderer};
pub use space::{CameraSpace, Light, Position, Space, SpaceKind, WorldSpace};
pub use texture::{Address, Filter, ProceduralTexture, SamplerPolicy, Texels};
pub use uniforms::{
    CameraObjectUniform, FrameUniform, LightUniform, LitObjectUniform, MaterialUniform,
    ModelUniform,
};
pub use vertex::{ColoredVertex, LitVertex, TexturedVertex};
