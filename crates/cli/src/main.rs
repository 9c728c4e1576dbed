#![deny(unsafe_code)]
//! Headless driver for the constellation particle-network backdrop.
//!
//! Subcommands:
//! - `render`: run the frame loop N frames offscreen, write the last frame as PNG
//! - `stats`:  run N frames into a display list and report graph sizes
//! - `schema`: print every tunable parameter with its default and range

mod error;

use clap::{Args, Parser, Subcommand};
use constellation_core::prng::entropy_seed;
use constellation_core::{DisplayList, ManualScheduler, Scene, SimError, Surface, Xorshift64};
use constellation_network::{NetworkConfig, Simulation};
use constellation_raster::snapshot::write_png;
use constellation_raster::RasterSurface;
use error::CliError;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "constellation", about = "Particle-network backdrop renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SceneArgs {
    /// Viewport width in pixels.
    #[arg(short = 'W', long, default_value_t = 1400)]
    width: usize,

    /// Viewport height in pixels.
    #[arg(short = 'H', long, default_value_t = 800)]
    height: usize,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed; taken from the clock when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Network parameters as a JSON object (see `schema`).
    #[arg(long, default_value = "{}")]
    params: String,

    /// Scene JSON file; replaces all of the flags above.
    #[arg(long)]
    scene: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the frame loop offscreen and write the last frame as PNG.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// Run frames without rasterizing and report particle and connection counts.
    Stats {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Print the parameter schema.
    Schema,
}

impl SceneArgs {
    fn resolve(self) -> Result<Scene, CliError> {
        let scene = match self.scene {
            Some(path) => Scene::load(&path)?,
            None => {
                let params = serde_json::from_str(&self.params)
                    .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
                Scene {
                    width: self.width,
                    height: self.height,
                    seed: self.seed,
                    frames: self.frames,
                    params,
                }
            }
        };
        scene.validate()?;
        Ok(scene)
    }
}

/// Drives `sim` through `frames` scheduled frames, then stops it.
fn run_frames<S: Surface>(
    sim: &mut Simulation<S>,
    frames: usize,
    mut each: impl FnMut(&mut S),
) -> Result<(), SimError> {
    let mut scheduler = ManualScheduler::new();
    sim.start(&mut scheduler)?;
    for _ in 0..frames {
        let Some(handle) = scheduler.next_due() else {
            break;
        };
        sim.on_frame(handle, &mut scheduler);
        each(sim.surface_mut());
    }
    sim.stop(&mut scheduler);
    debug!(requested = scheduler.requested(), "frame loop drained");
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            let schema = NetworkConfig::param_schema();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else if let Some(entries) = schema.as_object() {
                for (name, entry) in entries {
                    println!(
                        "{name:<18} default {:<10} {}",
                        entry["default"].to_string(),
                        entry["description"].as_str().unwrap_or_default()
                    );
                }
            }
        }
        Command::Render { scene, output } => {
            let scene = scene.resolve()?;
            let config = NetworkConfig::from_json(&scene.params)?;
            let seed = scene.seed.unwrap_or_else(entropy_seed);
            let (w, h) = (scene.width as f64, scene.height as f64);
            let surface = RasterSurface::new(scene.width, scene.height)?;
            let mut sim = Simulation::new(surface, w, h, &config, Xorshift64::new(seed))?;

            run_frames(&mut sim, scene.frames, |_| {})?;
            write_png(sim.surface(), &output)?;

            let stats = sim.stats();
            info!(frames = stats.frame, path = %output.display(), "wrote snapshot");
            if cli.json {
                let info = serde_json::json!({
                    "width": scene.width,
                    "height": scene.height,
                    "frames": stats.frame,
                    "seed": seed,
                    "particles": stats.particles,
                    "connections": stats.connections,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}x{} ({} frames, {} particles, seed {seed}) -> {}",
                    scene.width,
                    scene.height,
                    stats.frame,
                    stats.particles,
                    output.display()
                );
            }
        }
        Command::Stats { scene } => {
            let scene = scene.resolve()?;
            let config = NetworkConfig::from_json(&scene.params)?;
            let seed = scene.seed.unwrap_or_else(entropy_seed);
            let (w, h) = (scene.width as f64, scene.height as f64);
            let surface = DisplayList::new(w, h);
            let mut sim = Simulation::new(surface, w, h, &config, Xorshift64::new(seed))?;

            let mut lines_total = 0usize;
            run_frames(&mut sim, scene.frames, |list| {
                lines_total += list.line_count();
                list.take();
            })?;

            let stats = sim.stats();
            let threshold = sim.renderer().threshold(sim.field().viewport());
            let mean = if stats.frame == 0 {
                0.0
            } else {
                lines_total as f64 / stats.frame as f64
            };
            if cli.json {
                let info = serde_json::json!({
                    "particles": stats.particles,
                    "frames": stats.frame,
                    "threshold": threshold,
                    "connections_last_frame": stats.connections,
                    "connections_mean": mean,
                    "seed": seed,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("particles:   {}", stats.particles);
                println!("frames:      {}", stats.frame);
                println!("threshold:   {threshold:.1} px^2");
                println!("connections: {} last frame, {mean:.1} mean", stats.connections);
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
