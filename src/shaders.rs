//! WGSL programs of the material pipelines. Each one exposes `vs_main` and
//! `fs_main`; bindings follow [`crate::PipelineKind::binding_slots`].

pub const WORLD_LIT_TEXTURED: &str = include_str!("shaders/world_lit_textured.wgsl");
pub const UNLIT_TEXTURED: &str = include_str!("shaders/unlit_textured.wgsl");
pub const CAMERA_LIT_SPECULAR: &str = include_str!("shaders/camera_lit_specular.wgsl");
pub const UNLIT_COLORED: &str = include_str!("shaders/unlit_colored.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";
