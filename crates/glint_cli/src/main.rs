use anyhow::Result;
use clap::Parser;
use glint_renderer::{render, RenderConfig};

mod cli;
mod scene;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = cli::Args::parse();

    let mut config = match &args.settings {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some((width, height)) = args.resolution {
        config.width = width;
        config.height = height;
        config.validate()?;
    }

    let scene = scene::build_scene(args.obj.as_deref(), args.texture.as_deref())?;
    let lights = scene::lights();
    let camera = scene::camera(config.width, config.height);

    let image = render(&camera, &scene, &lights, &config);
    image.save(&args.output, config.gamma_correct)?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
