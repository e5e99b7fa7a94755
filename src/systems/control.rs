use hecs::World;

use crate::components::{Actor, Controlled, Direction};
use crate::engine::input::{InputSnapshot, Key};

/// Translate held keys into intent flags on controlled actors. Motion is
/// left to the state machine.
///
/// `previous` is last tick's snapshot, used for press edges: jump intent is
/// raised only when the key goes down, and with both directions held the
/// most recently pressed one wins.
pub fn control_system(world: &mut World, input: &InputSnapshot, previous: &InputSnapshot) {
    let left = input.is_pressed(Key::Left);
    let right = input.is_pressed(Key::Right);

    for (_e, (actor, _controlled)) in world.query_mut::<(&mut Actor, &Controlled)>() {
        match (left, right) {
            (true, false) => actor.direction = Direction::Left,
            (false, true) => actor.direction = Direction::Right,
            (true, true) => {
                if input.just_pressed(previous, Key::Left) {
                    actor.direction = Direction::Left;
                } else if input.just_pressed(previous, Key::Right) {
                    actor.direction = Direction::Right;
                }
            }
            (false, false) => {}
        }
        actor.is_walk = left || right;

        if input.just_pressed(previous, Key::Jump) {
            actor.is_jump_ready = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vector2;

    fn world_with_player() -> (World, hecs::Entity) {
        let mut world = World::new();
        let e = world.spawn((Actor::new(Vector2::ZERO, 3.0), Controlled));
        (world, e)
    }

    #[test]
    fn held_direction_sets_walk() {
        let (mut world, e) = world_with_player();
        control_system(&mut world, &InputSnapshot::from([Key::Left]), &InputSnapshot::new());
        let actor = world.get::<&Actor>(e).unwrap();
        assert!(actor.is_walk);
        assert_eq!(actor.direction, Direction::Left);
    }

    #[test]
    fn release_clears_walk_but_keeps_facing() {
        let (mut world, e) = world_with_player();
        control_system(&mut world, &InputSnapshot::from([Key::Left]), &InputSnapshot::new());
        control_system(&mut world, &InputSnapshot::new(), &InputSnapshot::from([Key::Left]));
        let actor = world.get::<&Actor>(e).unwrap();
        assert!(!actor.is_walk);
        assert_eq!(actor.direction, Direction::Left);
    }

    #[test]
    fn latest_direction_wins_when_both_held() {
        let (mut world, e) = world_with_player();
        control_system(
            &mut world,
            &InputSnapshot::from([Key::Left, Key::Right]),
            &InputSnapshot::from([Key::Left]),
        );
        assert_eq!(world.get::<&Actor>(e).unwrap().direction, Direction::Right);
    }

    #[test]
    fn jump_needs_a_fresh_press() {
        let (mut world, e) = world_with_player();
        let held = InputSnapshot::from([Key::Jump]);
        control_system(&mut world, &held, &held);
        assert!(!world.get::<&Actor>(e).unwrap().is_jump_ready);
        control_system(&mut world, &held, &InputSnapshot::new());
        assert!(world.get::<&Actor>(e).unwrap().is_jump_ready);
    }

    #[test]
    fn uncontrolled_actors_are_ignored() {
        let mut world = World::new();
        let e = world.spawn((Actor::new(Vector2::ZERO, 3.0),));
        control_system(&mut world, &InputSnapshot::from([Key::Right]), &InputSnapshot::new());
        assert!(!world.get::<&Actor>(e).unwrap().is_walk);
    }
}
