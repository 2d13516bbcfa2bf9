#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Battle City.

mod schedule;

use std::path::PathBuf;

use anyhow::{Context, Result};
use battle_city_core::{Frame, TickInput, WINDOW_TITLE};
use battle_city_rendering::{palette, Presentation, RenderingBackend, Scene};
use battle_city_rendering_macroquad::MacroquadBackend;
use battle_city_simulation::Simulation;
use clap::Parser;
use tracing::{info, Level};

use self::schedule::{FixedStep, InputLatch};

/// Command-line arguments accepted by the Battle City binary.
#[derive(Debug, Parser)]
#[command(name = "battle-city", about = "Single-player tank arena")]
struct Args {
    /// Seed for enemy decisions; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulate this many ticks without a window and print the outcome.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
    /// Show a frame-rate readout in the HUD.
    #[arg(long)]
    show_fps: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Draw primitive shapes instead of loading sprites.
    #[arg(long)]
    no_sprites: bool,
    /// Sprite manifest to load instead of `assets/manifest.toml`.
    #[arg(long, value_name = "PATH")]
    sprite_manifest: Option<PathBuf>,
    /// Maximum level of log records written to stderr.
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

/// Entry point for the Battle City command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    match args.headless {
        Some(ticks) => {
            info!(seed, ticks, "starting headless run");
            let frame = run_headless(seed, ticks);
            println!("{}", summarize(seed, &frame));
            Ok(())
        }
        None => {
            info!(seed, "starting interactive session");
            run_interactive(seed, &args)
        }
    }
}

fn init_logging(level: Level) -> Result<()> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")
}

/// Runs up to `ticks` ticks with an idle player, stopping early once the game ends.
fn run_headless(seed: u64, ticks: u64) -> Frame {
    let mut simulation = Simulation::new(seed);
    for _ in 0..ticks {
        if simulation.frame().play_state.is_terminal() {
            break;
        }
        let _ = simulation.step(TickInput::default());
    }
    simulation.frame().clone()
}

fn summarize(seed: u64, frame: &Frame) -> String {
    format!(
        "seed {seed}: {:?} after {} ticks, score {}, lives {}, enemies left {}",
        frame.play_state,
        frame.tick,
        frame.score,
        frame.lives,
        frame.enemies.len()
    )
}

fn run_interactive(seed: u64, args: &Args) -> Result<()> {
    let mut simulation = Simulation::new(seed);
    let scene = Scene::from_frame(simulation.frame());
    let presentation = Presentation::new(WINDOW_TITLE, palette::BACKGROUND, scene);

    let mut backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);
    if let Some(path) = &args.sprite_manifest {
        backend = backend.with_sprite_manifest(path.clone());
    }

    let mut schedule = FixedStep::default();
    let mut latch = InputLatch::default();
    backend
        .run(presentation, move |dt, input, scene| {
            latch.record(input);
            let ticks = schedule.advance(dt);
            if ticks == 0 {
                return;
            }
            for _ in 0..ticks {
                let _ = simulation.step(latch.take());
            }
            scene.refresh(simulation.frame());
        })
        .context("rendering backend failed")
}
