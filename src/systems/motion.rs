use hecs::World;

use crate::components::{Actor, HitBox, MotionFsm};

/// Step every actor's state machine, then rebuild hitboxes from the
/// positions the actors had before this tick's commit.
pub fn motion_system(world: &mut World) {
    for (entity, (actor, fsm)) in world.query_mut::<(&mut Actor, &mut MotionFsm)>() {
        if let Some(state) = fsm.update(actor) {
            log::trace!("{entity:?} entered {state:?}");
        }
    }

    for (_e, (actor, hitbox)) in world.query_mut::<(&Actor, &mut HitBox)>() {
        hitbox.refresh(actor.pos);
    }
}
