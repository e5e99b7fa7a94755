use hecs::Entity;

use crate::components::Vector2;
use crate::fsm::FsmError;
use crate::simulation::{ActorDesc, Simulation};

/// Sprite dimensions of the player; the hitbox matches them.
pub const PLAYER_SIZE: Vector2 = Vector2::new(32.0, 32.0);

/// Spawn the player at `position` and make it the control target.
pub fn spawn_player(sim: &mut Simulation, position: Vector2) -> Result<Entity, FsmError> {
    sim.spawn_actor(ActorDesc::new(position, PLAYER_SIZE).controlled())
}

/// Spawn a solid rectangle with its top-left corner at `position`.
pub fn spawn_block(sim: &mut Simulation, position: Vector2, size: Vector2) -> Entity {
    sim.spawn_obstacle(position, size)
}
