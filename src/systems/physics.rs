use hecs::World;

use crate::components::Actor;

/// Commit resolved velocities: `pos += vec` for every actor.
pub fn commit_system(world: &mut World) {
    for (_e, actor) in world.query_mut::<&mut Actor>() {
        let vec = actor.vec;
        actor.pos += vec;
    }
}
