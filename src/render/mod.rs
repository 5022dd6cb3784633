//! Reference wgpu host for the material pipelines: bind group layouts and
//! render pipelines built from the binding tables, frequency-stratified bind
//! groups, and an offscreen renderer. Presentation to a window is left to
//! the embedding application.

mod bindings;
mod buffers;
mod context;
mod pipelines;
mod plan;
mod renderer;
mod target;
mod texture;

pub use bindings::{
    draw_resources, material_resources, object_resource, FrameBuffer, FrameResources,
    MaterialBindings, ObjectBindings,
};
pub use buffers::MeshBuffers;
pub use context::{AdapterUnavailable, GpuContext};
pub use pipelines::{group_count, layout_entries, MaterialPipeline};
pub use plan::{plan_draws, BindCommand, DrawItem, RenderStats};
pub use renderer::Renderer;
pub use target::{DepthBuffer, OffscreenTarget};
pub use texture::GpuTexture;
