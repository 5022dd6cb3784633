use std::str::FromStr;

use anyhow::{anyhow, Error};
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Texel filtering of a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
}

/// Behaviour of texture coordinates outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Address {
    #[default]
    Clamp,
    Repeat,
}

/// Sampler state of a material. The default matches
/// `wgpu::SamplerDescriptor::default()`: nearest filtering, clamped edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SamplerPolicy {
    pub filter: Filter,
    pub address: Address,
}

impl SamplerPolicy {
    pub const fn new(filter: Filter, address: Address) -> Self {
        Self { filter, address }
    }

    pub fn descriptor(&self) -> wgpu::SamplerDescriptor<'static> {
        let address_mode = match self.address {
            Address::Clamp => wgpu::AddressMode::ClampToEdge,
            Address::Repeat => wgpu::AddressMode::Repeat,
        };
        let filter = match self.filter {
            Filter::Nearest => wgpu::FilterMode::Nearest,
            Filter::Linear => wgpu::FilterMode::Linear,
        };
        wgpu::SamplerDescriptor {
            label: Some("material-sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        }
    }

    fn resolve(&self, index: i64, size: u32) -> u32 {
        let size = i64::from(size);
        let resolved = match self.address {
            Address::Clamp => index.clamp(0, size - 1),
            Address::Repeat => index.rem_euclid(size),
        };
        resolved as u32
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Filter::Nearest),
            "linear" => Ok(Filter::Linear),
            other => Err(anyhow!("unknown filter {other:?}; expected nearest or linear")),
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Address::Clamp),
            "repeat" => Ok(Address::Repeat),
            other => Err(anyhow!("unknown address mode {other:?}; expected clamp or repeat")),
        }
    }
}

/// RGBA8 image stored sRGB-encoded, as uploaded to an `Rgba8UnormSrgb` texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texels {
    width: u32,
    height: u32,
    data: Vec<[u8; 4]>,
}

impl Texels {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn from_fn(width: u32, height: u32, mut texel: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(texel(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self::from_fn(1, 1, |_, _| rgba)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Decoded texel: linear RGB, linear alpha.
    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        let [r, g, b, a] = self.data[(y * self.width + x) as usize];
        Vec4::new(
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            f32::from(a) / 255.0,
        )
    }

    /// Samples at `uv` the way the GPU sampler configured by `policy` does.
    pub fn sample(&self, policy: &SamplerPolicy, uv: Vec2) -> Vec4 {
        let u = uv.x * self.width as f32;
        let v = uv.y * self.height as f32;
        match policy.filter {
            Filter::Nearest => {
                let x = policy.resolve(u.floor() as i64, self.width);
                let y = policy.resolve(v.floor() as i64, self.height);
                self.texel(x, y)
            }
            Filter::Linear => {
                let fx = u - 0.5;
                let fy = v - 0.5;
                let x0 = fx.floor();
                let y0 = fy.floor();
                let tx = fx - x0;
                let ty = fy - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);
                let xs = [policy.resolve(x0, self.width), policy.resolve(x0 + 1, self.width)];
                let ys = [policy.resolve(y0, self.height), policy.resolve(y0 + 1, self.height)];
                let top = self.texel(xs[0], ys[0]).lerp(self.texel(xs[1], ys[0]), tx);
                let bottom = self.texel(xs[0], ys[1]).lerp(self.texel(xs[1], ys[1]), tx);
                top.lerp(bottom, ty)
            }
        }
    }
}

fn srgb_to_linear(value: u8) -> f32 {
    let c = f32::from(value) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Built-in textures a material can reference by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProceduralTexture {
    #[default]
    White,
    Checker,
    Gradient,
}

impl ProceduralTexture {
    pub fn name(self) -> &'static str {
        match self {
            ProceduralTexture::White => "white",
            ProceduralTexture::Checker => "checker",
            ProceduralTexture::Gradient => "gradient",
        }
    }

    pub fn texels(self) -> Texels {
        match self {
            ProceduralTexture::White => Texels::solid([255, 255, 255, 255]),
            ProceduralTexture::Checker => Texels::from_fn(8, 8, |x, y| {
                if (x + y) % 2 == 0 {
                    [255, 255, 255, 255]
                } else {
                    [32, 32, 32, 255]
                }
            }),
            ProceduralTexture::Gradient => {
                Texels::from_fn(4, 4, |x, y| [(x * 64) as u8, (y * 64) as u8, 0, 255])
            }
        }
    }
}

impl FromStr for ProceduralTexture {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(ProceduralTexture::White),
            "checker" => Ok(ProceduralTexture::Checker),
            "gradient" => Ok(ProceduralTexture::Gradient),
            other => Err(anyhow!(
                "unknown texture {other:?}; expected white, checker or gradient"
            )),
        }
    }
}
