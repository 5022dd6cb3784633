use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::material::{Material, MaterialSet};
use crate::pipeline::PipelineKind;
use crate::render::RenderStats;
use crate::shading::{camera_lit, unlit, world_lit, BoundTexture};
use crate::space::{Light, WorldSpace};
use crate::uniforms::{
    CameraObjectUniform, FrameUniform, LitObjectUniform, MaterialUniform, ModelUniform,
};
use crate::vertex::{ColoredVertex, LitVertex, TexturedVertex};

/// Object-space position of the probe fragment: one unit in front of a
/// camera sitting at the origin, so the view direction is defined.
pub const PROBE_POSITION: Vec3 = Vec3::new(0.0, 0.0, -1.0);
pub const PROBE_NORMAL: Vec3 = Vec3::Z;
pub const PROBE_UV: Vec2 = Vec2::new(0.5, 0.5);

/// Shades the probe fragment of `material` through the CPU pipelines with
/// identity model, view and projection.
pub fn probe(material: &Material, light: &Light<WorldSpace>) -> Vec4 {
    let texels = material.texture.texels();
    let texture = BoundTexture::new(&texels, material.sampler);
    let coefficients = MaterialUniform::new(&material.coefficients);
    let vertex = LitVertex {
        position: PROBE_POSITION.into(),
        tex_coords: PROBE_UV.into(),
        normal: PROBE_NORMAL.into(),
    };
    let frame = FrameUniform::new(Mat4::IDENTITY);

    match material.pipeline {
        PipelineKind::WorldLitTextured => {
            let object = LitObjectUniform::from_model(Mat4::IDENTITY);
            let varying = world_lit::vertex(&frame, &object, &vertex);
            world_lit::fragment(light, &coefficients, &texture, &varying)
        }
        PipelineKind::CameraLitSpecular => {
            let object = CameraObjectUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
            let varying = camera_lit::vertex(&object, &vertex);
            let light = light.to_camera(Mat4::IDENTITY);
            camera_lit::fragment(&light, &coefficients, &texture, &varying)
        }
        PipelineKind::UnlitTextured => {
            let object = ModelUniform::new(Mat4::IDENTITY);
            let varying = unlit::textured_vertex(&frame, &object, &TexturedVertex::from(vertex));
            unlit::textured_fragment(&texture, &varying)
        }
        PipelineKind::UnlitColored => {
            let object = ModelUniform::new(Mat4::IDENTITY);
            let input = ColoredVertex {
                position: vertex.position,
                color: material.color.into(),
            };
            unlit::colored_fragment(&unlit::colored_vertex(&frame, &object, &input))
        }
    }
}

pub fn print_materials(set: &MaterialSet) {
    println!("Loaded {} material(s)", set.materials.len());
    for material in &set.materials {
        println!(" - {} ({})", material.name, material.pipeline);
    }
}

pub fn print_probes(set: &MaterialSet) {
    let light = set.world_light();
    println!("Probe shading:");
    for material in &set.materials {
        println!(" - {} probe={}", material.name, format_color(probe(material, &light)));
    }
}

pub fn print_render_stats(adapter: &str, stats: &RenderStats) {
    println!(
        "Rendered {} draw(s) on {adapter}: {} pipeline switch(es), {} material bind(s)",
        stats.draws, stats.pipeline_switches, stats.material_binds
    );
}

pub fn format_color(color: Vec4) -> String {
    format!(
        "({:.2}, {:.2}, {:.2}, {:.2})",
        color.x, color.y, color.z, color.w
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ShadingCoefficients;
    use crate::texture::ProceduralTexture;

    fn material(pipeline: PipelineKind) -> Material {
        Material::new("Probe", pipeline)
    }

    #[test]
    fn lit_probes_facing_the_origin_light() {
        let light = Light::default();
        let world = probe(&material(PipelineKind::WorldLitTextured), &light);
        assert!(world.abs_diff_eq(Vec4::ONE, 1e-5));
        let camera = probe(&material(PipelineKind::CameraLitSpecular), &light);
        assert!(camera.abs_diff_eq(Vec4::new(2.0, 2.0, 2.0, 1.0), 1e-5));
    }

    #[test]
    fn light_behind_the_probe_darkens_lit_pipelines_only() {
        let light = Light::new(crate::space::Position::from_xyz(0.0, 0.0, -5.0));
        let world = probe(&material(PipelineKind::WorldLitTextured), &light);
        assert_eq!(world.truncate(), Vec3::ZERO);
        let unlit = probe(&material(PipelineKind::UnlitTextured), &light);
        assert!(unlit.abs_diff_eq(Vec4::ONE, 1e-5));
    }

    #[test]
    fn colored_probe_is_the_material_color() {
        let mut orbit = material(PipelineKind::UnlitColored);
        orbit.color = Vec3::new(1.0, 0.5, 0.0);
        assert_eq!(probe(&orbit, &Light::default()), Vec4::new(1.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn probe_samples_the_material_texture() {
        let mut sun = material(PipelineKind::UnlitTextured);
        sun.texture = ProceduralTexture::Gradient;
        let texel = probe(&sun, &Light::default());
        assert!((texel.x - texel.y).abs() < 1e-6);
        assert!(texel.x > 0.2 && texel.x < 0.25);
        assert_eq!(texel.z, 0.0);
    }

    #[test]
    fn ambient_only_material() {
        let mut dim = material(PipelineKind::CameraLitSpecular);
        dim.coefficients = ShadingCoefficients {
            ambient: 0.25,
            diffuse: 0.0,
            specular: 0.0,
            shininess: 1.0,
        };
        let color = probe(&dim, &Light::default());
        assert!((color.x - 0.25).abs() < 1e-5);
    }

    #[test]
    fn colors_print_with_two_decimals() {
        assert_eq!(format_color(Vec4::new(1.0, 0.5, 0.126, 1.0)), "(1.00, 0.50, 0.13, 1.00)");
    }
}
