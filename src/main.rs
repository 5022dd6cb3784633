use std::env;
use std::fs;

use anyhow::{anyhow, Context, Result};
use log::info;
use pollster::block_on;

use orrery_materials::app::{print_materials, print_probes, print_render_stats};
use orrery_materials::{AdapterUnavailable, GpuContext, MaterialLibrary, MaterialSet, Renderer};

const TARGET_WIDTH: u32 = 640;
const TARGET_HEIGHT: u32 = 360;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let xml = fs::read_to_string(&options.path)
        .with_context(|| format!("failed to read material file {}", options.path))?;
    let set = MaterialSet::from_xml(&xml).context("failed to parse material XML")?;
    let library = MaterialLibrary::from_set(set);

    let snapshot = library.snapshot();
    print_materials(&snapshot);
    if options.summary_only {
        return Ok(());
    }

    if options.gpu {
        match render_on_gpu(&library) {
            Ok(()) => {}
            Err(err) if err.downcast_ref::<AdapterUnavailable>().is_some() => {
                eprintln!("{err}. Falling back to CPU probe shading.");
            }
            Err(err) => return Err(err),
        }
    }

    print_probes(&snapshot);
    Ok(())
}

fn render_on_gpu(library: &MaterialLibrary) -> Result<()> {
    let context = block_on(GpuContext::headless())?;
    let renderer = Renderer::new(context, TARGET_WIDTH, TARGET_HEIGHT);
    let set = library.snapshot();
    let camera = renderer.camera_for(set.materials.len());
    info!("rendering {} material(s) offscreen", set.materials.len());
    let stats = renderer.render(&set, &camera)?;
    print_render_stats(renderer.adapter_name(), &stats);
    Ok(())
}

struct CliOptions {
    path: String,
    gpu: bool,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(path) = args.next() else {
            return Err(anyhow!(
                "Usage: orrery-materials <materials.xml> [--gpu] [--summary-only]"
            ));
        };
        let mut gpu = false;
        let mut summary_only = false;
        for arg in args {
            match arg.as_str() {
                "--gpu" => gpu = true,
                "--summary-only" => summary_only = true,
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --gpu or --summary-only"
                    ));
                }
            }
        }
        Ok(Self {
            path,
            gpu,
            summary_only,
        })
    }
}
