use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lux_core::{SceneDescription, TextureCache};
use lux_renderer::{load_scene, render_to_file, tonemap, write_ppm_file};

mod cli;

use cli::Args;

/// Paths written for one scene.
#[derive(Debug, PartialEq)]
struct OutputPaths {
    image: PathBuf,
    tonemapped: PathBuf,
}

impl OutputPaths {
    /// `<dir>/<stem>.ppm` and `<dir>/tonemapped_<stem>.ppm`.
    fn for_scene(scene: &Path, output_dir: &Path) -> Result<Self> {
        let stem = scene
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Scene path {} has no file name", scene.display()))?;

        Ok(Self {
            image: output_dir.join(format!("{stem}.ppm")),
            tonemapped: output_dir.join(format!("tonemapped_{stem}.ppm")),
        })
    }
}

fn render_scene(scene_path: &Path, args: &Args) -> Result<()> {
    let start = Instant::now();
    let outputs = OutputPaths::for_scene(scene_path, &args.output_dir)?;

    let desc = SceneDescription::load(scene_path)
        .with_context(|| format!("Failed to load scene {}", scene_path.display()))?;

    let texture_dir = match &args.texture_dir {
        Some(dir) => dir.clone(),
        None => scene_path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let mut textures = TextureCache::with_base_dir(texture_dir);

    let loaded = load_scene(&desc, &mut textures)
        .with_context(|| format!("Failed to build scene {}", scene_path.display()))?;
    let config = loaded.render_config(args.samples, args.seed);

    let image = render_to_file(&loaded.camera, &loaded.scene, &config, args.threads, &outputs.image)
        .with_context(|| format!("Failed to render {}", outputs.image.display()))?;

    if !args.no_tonemap {
        let mapped = tonemap::reinhard(&image, args.key);
        write_ppm_file(&outputs.tonemapped, &mapped)
            .with_context(|| format!("Failed to write {}", outputs.tonemapped.display()))?;
    }

    log::info!("{} done in {:.2?}", scene_path.display(), start.elapsed());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let mut failed = 0;
    for scene_path in &args.scenes {
        log::info!("Rendering {}", scene_path.display());
        if let Err(e) = render_scene(scene_path, &args) {
            log::error!("{:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} scenes failed", failed, args.scenes.len());
    }
    Ok(())
}
