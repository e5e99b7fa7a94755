use hecs::Entity;

use crate::components::Vector2;
use crate::fsm::FsmError;
use crate::scene::prefabs::{spawn_block, spawn_player};
use crate::simulation::Simulation;

pub const SCENE_WIDTH: u32 = 640;
pub const SCENE_HEIGHT: u32 = 480;

/// Build the demo level: the player above a small block, both over a long
/// floor. The player is spawned first so it is tested against everything
/// else. Returns the player entity.
pub fn load_test_scene(sim: &mut Simulation) -> Result<Entity, FsmError> {
    let player = spawn_player(sim, Vector2::new(300.0, 200.0))?;

    spawn_block(sim, Vector2::new(100.0, 300.0), Vector2::new(50.0, 50.0));
    spawn_block(sim, Vector2::new(0.0, 400.0), Vector2::new(600.0, 20.0));

    log::info!("test scene loaded with {} actors", sim.snapshot().len());
    Ok(player)
}
