use std::collections::HashSet;

use anyhow::{anyhow, bail, Context, Result};
use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineKind;
use crate::space::{Light, Position, WorldSpace};
use crate::texture::{Address, Filter, ProceduralTexture, SamplerPolicy};

/// Scalars applied to the lighting terms before texture modulation.
///
/// The defaults leave the lighting model untouched: no ambient term, full
/// diffuse and specular contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadingCoefficients {
    #[serde(default)]
    pub ambient: f32,
    #[serde(default = "default_diffuse")]
    pub diffuse: f32,
    #[serde(default = "default_specular")]
    pub specular: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

impl Default for ShadingCoefficients {
    fn default() -> Self {
        Self {
            ambient: 0.0,
            diffuse: default_diffuse(),
            specular: default_specular(),
            shininess: default_shininess(),
        }
    }
}

impl ShadingCoefficients {
    /// Finite scalars and a usable specular exponent.
    pub fn is_valid(&self) -> bool {
        [self.ambient, self.diffuse, self.specular].iter().all(|value| value.is_finite())
            && valid_shininess(self.shininess)
    }
}

fn default_diffuse() -> f32 {
    1.0
}

fn default_specular() -> f32 {
    1.0
}

fn default_shininess() -> f32 {
    32.0
}

fn default_color() -> Vec3 {
    Vec3::ONE
}

/// A named material: which pipeline draws it and with which parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub pipeline: PipelineKind,
    #[serde(default)]
    pub texture: ProceduralTexture,
    #[serde(default)]
    pub sampler: SamplerPolicy,
    /// Vertex color for the colored pipeline, linear 0..1.
    #[serde(default = "default_color")]
    pub color: Vec3,
    #[serde(default)]
    pub coefficients: ShadingCoefficients,
}

impl Material {
    pub fn new(name: impl Into<String>, pipeline: PipelineKind) -> Self {
        Self {
            name: name.into(),
            pipeline,
            texture: ProceduralTexture::default(),
            sampler: SamplerPolicy::default(),
            color: default_color(),
            coefficients: ShadingCoefficients::default(),
        }
    }
}

/// Materials plus the frame light, as read from a material description file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaterialSet {
    pub materials: Vec<Material>,
    /// World-space light position.
    #[serde(default)]
    pub light: Vec3,
}

impl MaterialSet {
    pub fn world_light(&self) -> Light<WorldSpace> {
        Light::new(Position::new(self.light))
    }

    /// Parses a `<materials>` document.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid material XML")?;
        let root = document.root_element();
        if !root.has_tag_name("materials") {
            bail!("expected <materials> root element, found <{}>", root.tag_name().name());
        }

        let light = parse_vec3(optional_text(&root, "light"), Vec3::ZERO)
            .context("invalid <light>")?;

        let mut materials = Vec::new();
        let mut names = HashSet::new();
        for node in root.children().filter(|n| n.has_tag_name("material")) {
            let material = parse_material(&node)?;
            if !names.insert(material.name.clone()) {
                bail!("material {:?} is defined more than once", material.name);
            }
            materials.push(material);
        }

        Ok(Self { materials, light })
    }
}

fn parse_material(node: &Node<'_, '_>) -> Result<Material> {
    let name = required_text(node, "name")?;
    let pipeline = required_text(node, "pipeline")?
        .parse::<PipelineKind>()
        .with_context(|| format!("material {name:?}"))?;

    let mut material = Material::new(name, pipeline);
    let context = || format!("material {:?}", material.name);

    if let Some(texture) = optional_text(node, "texture") {
        material.texture = texture.parse::<ProceduralTexture>().with_context(context)?;
    }
    if let Some(filter) = optional_text(node, "filter") {
        material.sampler.filter = filter.parse::<Filter>().with_context(context)?;
    }
    if let Some(address) = optional_text(node, "address") {
        material.sampler.address = address.parse::<Address>().with_context(context)?;
    }
    material.color =
        parse_color(optional_text(node, "color"), material.color).with_context(context)?;

    let defaults = material.coefficients;
    let coefficients = ShadingCoefficients {
        ambient: parse_f32(optional_text(node, "ambient"), defaults.ambient).with_context(context)?,
        diffuse: parse_f32(optional_text(node, "diffuse"), defaults.diffuse).with_context(context)?,
        specular: parse_f32(optional_text(node, "specular"), defaults.specular)
            .with_context(context)?,
        shininess: parse_f32(optional_text(node, "shininess"), defaults.shininess)
            .with_context(context)?,
    };
    if !valid_shininess(coefficients.shininess) {
        let shininess = coefficients.shininess;
        return Err(anyhow!("shininess must be positive and finite, got {shininess}"))
            .with_context(context);
    }
    material.coefficients = coefficients;
    Ok(material)
}

/// Specular exponents must be positive and finite.
pub(crate) fn valid_shininess(shininess: f32) -> bool {
    shininess > 0.0 && shininess.is_finite()
}

fn required_text(node: &Node<'_, '_>, tag: &str) -> Result<String> {
    optional_text(node, tag).ok_or_else(|| anyhow!("<{tag}> tag is missing"))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_components(value: &str, what: &str) -> Result<Vec3> {
    let numbers = value
        .split_whitespace()
        .map(|component| match component.parse::<f32>() {
            Ok(number) if number.is_finite() => Ok(number),
            Ok(_) => Err(anyhow!("{what} component {component:?} is not finite")),
            Err(err) => Err(anyhow!("{what} component {component:?}: {err}")),
        })
        .collect::<Result<Vec<_>>>()?;
    match numbers.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(anyhow!("{what} needs 3 components, found {}", numbers.len())),
    }
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    match value {
        Some(value) => parse_components(&value, "vector"),
        None => Ok(default),
    }
}

fn parse_color(value: Option<String>, default: Vec3) -> Result<Vec3> {
    match value {
        Some(value) => {
            let color = parse_components(&value, "color")?;
            if color.cmplt(Vec3::ZERO).any() || color.cmpgt(Vec3::splat(255.0)).any() {
                bail!("color components must be within 0..=255, got {value:?}");
            }
            Ok(color / 255.0)
        }
        None => Ok(default),
    }
}

fn parse_f32(value: Option<String>, default: f32) -> Result<f32> {
    match value {
        Some(value) => match value.parse::<f32>() {
            Ok(number) if number.is_finite() => Ok(number),
            Ok(_) => Err(anyhow!("float {value:?} is not finite")),
            Err(err) => Err(anyhow!("failed to parse float {value:?}: {err}")),
        },
        None => Ok(default),
    }
}
