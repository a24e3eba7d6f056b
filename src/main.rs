use blobfield::{presets, render_frame, RenderError, Scene, SceneConfig};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Animation time of the first frame, in seconds
    #[arg(short, long, default_value_t = 0.0)]
    time: f64,

    #[arg(short, long, default_value_t = 1)]
    frames: u32,

    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Sub-samples per pixel axis
    #[arg(short, long, default_value_t = 1)]
    antialias: u32,

    #[arg(short, long, default_value = "merging")]
    preset: String,

    /// JSON scene file, takes precedence over --preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "frame.png")]
    out: PathBuf,

    /// Print the resolved scene as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

fn frame_path(out: &Path, index: u32, frames: u32) -> PathBuf {
    if frames <= 1 {
        return out.to_path_buf();
    }
    let stem = out.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let name = match out.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{:04}.{}", stem, index, ext),
        None => format!("{}_{:04}", stem, index),
    };
    out.with_file_name(name)
}

fn main() -> Result<(), RenderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SceneConfig::from_json_file(path)?,
        None => presets::by_name(&args.preset)?,
    };
    if args.dump_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }
    let scene = Scene::new(config)?;
    if !(args.fps.is_finite() && args.fps > 0.) {
        return Err(RenderError::InvalidFrameRate(args.fps));
    }

    log::info!(
        "rendering {} frame(s) at {}x{}, {}x antialias",
        args.frames,
        args.width,
        args.height,
        args.antialias
    );
    let start = Instant::now();
    for n in 0..args.frames {
        let time = args.time + n as f64 / args.fps;
        let img = render_frame(&scene, args.width, args.height, time, args.antialias)?;
        let path = frame_path(&args.out, n, args.frames);
        img.save(&path)?;
        log::debug!("wrote {}", path.display());
    }
    log::info!("done in {} s", start.elapsed().as_secs_f32());
    Ok(())
}
