use std::path::PathBuf;

use clap::Parser;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "glint")]
#[command(about = "Render the demo scene with a recursive ray tracer")]
pub struct Args {
    /// Output image; the format follows the extension
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// JSON render settings (resolution, bounces, ambient, ...)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Triangle mesh placed to the right of the spheres
    #[arg(long)]
    pub obj: Option<PathBuf>,

    /// Texture for the mesh; without one the mesh is plain Lambertian
    #[arg(long, requires = "obj")]
    pub texture: Option<PathBuf>,

    /// Override the settings resolution, e.g. 1920x1080
    #[arg(long, value_parser = parse_resolution)]
    pub resolution: Option<(u32, u32)>,
}

fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("'{v}': {e}"));
    Ok((parse(w)?, parse(h)?))
}
