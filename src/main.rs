//! Command-line entry point for trajectory playback and export.
//!
//! 1. Parse arguments and validate settings
//! 2. Load the trajectory table and derive colors and viewport
//! 3. Either play frames in a window, export them to a file, or save a
//!    single timestep as PNG

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use trajectory_renderer::{
    video::save_frame_as_png, window::run_live, Animation, AnimationExporter, ColorAssignment,
    FrameRenderer, RenderSettings, TrajectoryLoader, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "trajectory-renderer")]
#[command(about = "Animated 3D scatter playback of particle trajectories")]
struct Args {
    /// CSV file with a `time,body,x,y,z` header
    input: PathBuf,

    /// Export the animation to this file (.gif, .mp4, .webm, ...) instead of
    /// opening a window
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Playback and export frame rate
    #[arg(long, default_value = "10")]
    fps: u32,

    /// Canvas width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Radius of each body marker in pixels
    #[arg(long, default_value = "5")]
    point_radius: u32,

    /// Save the frame for `--at` to this PNG file (headless mode)
    #[arg(long, requires = "at", conflicts_with = "output")]
    save_frame: Option<PathBuf>,

    /// Timestep rendered by `--save-frame`
    #[arg(long, requires = "save_frame")]
    at: Option<f64>,
}

impl Args {
    fn settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.width,
            height: self.height,
            fps: self.fps,
            point_radius: self.point_radius,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = args.settings();
    settings.validate()?;

    let table = TrajectoryLoader::load_trajectory(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let viewport = Viewport::from_table(&table)?;
    let colors = ColorAssignment::for_table(&table);
    let metadata = table.metadata();
    println!(
        "Loaded {} timesteps with {} bodies from {}",
        metadata.num_timesteps,
        metadata.num_bodies,
        args.input.display()
    );

    let renderer = FrameRenderer::new(&table, &colors, &viewport, settings);
    let mut canvas = renderer.create_canvas();

    if let (Some(path), Some(time)) = (&args.save_frame, args.at) {
        if !table.timesteps().contains(&time) {
            log::warn!("No records at time {}, saving an empty frame", time);
        }
        let stats = renderer.render(&mut canvas, time);
        save_frame_as_png(&canvas, path)
            .with_context(|| format!("saving frame to {}", path.display()))?;
        println!("Saved frame at time {:.2} ({} points) to {}", time, stats.points, path.display());
        return Ok(());
    }

    let mut animation = Animation::for_table(&table)?;

    match &args.output {
        Some(output) => {
            // Validates the destination and encoder before the first frame.
            let exporter = AnimationExporter::create(output, &settings)?;
            let path = animation.run(&renderer, &mut canvas, exporter)?;
            println!("Animation written to {}", path.display());
        }
        None => run_live(animation, &renderer, &mut canvas)?,
    }

    Ok(())
}
