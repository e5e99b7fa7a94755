#[cfg(feature = "host")]
mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hecs::Entity;
use ledge::scene::test_scene::load_test_scene;
use ledge::{init_logging, InputSnapshot, Key, SimConfig, Simulation, TickStatus};

#[derive(Parser)]
#[command(name = "ledge", about = "2D platformer prototype")]
struct Args {
    /// Enable verbose logging (state transitions)
    #[arg(short, long)]
    verbose: bool,

    /// JSON file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Number of ticks in a headless run
    #[arg(long, default_value_t = 300)]
    ticks: u64,

    /// Key held for the whole headless run (repeatable)
    #[arg(long = "press", value_enum)]
    press: Vec<Key>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let mut sim = Simulation::new(config);
    let player = load_test_scene(&mut sim)?;

    #[cfg(feature = "host")]
    if !args.headless {
        let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
        let mut game = app::GameApp::new(&sdl, sim, player)?;
        return game.run(&sdl);
    }

    #[cfg(not(feature = "host"))]
    if !args.headless {
        log::info!("built without the `host` feature; running headless");
    }

    run_headless(&mut sim, player, &args);
    Ok(())
}

fn run_headless(sim: &mut Simulation, player: Entity, args: &Args) {
    let input: InputSnapshot = args.press.iter().copied().collect();

    for _ in 0..args.ticks {
        if sim.tick(&input) == TickStatus::Quit {
            break;
        }
    }

    match (sim.position(player), sim.state(player)) {
        (Some(pos), Some(state)) => log::info!(
            "after {} ticks: player at ({:.2}, {:.2}) in {:?}",
            sim.tick_count(),
            pos.x,
            pos.y,
            state
        ),
        _ => log::warn!("player is gone"),
    }
}
