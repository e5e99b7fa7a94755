use std::io::Write;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use hecs::Entity;
use ledge::components::Actor;
use ledge::scene::test_scene::load_test_scene;
use ledge::systems::PairPolicy;
use ledge::{
    ActorDesc, ConfigError, Direction, InputSnapshot, Key, MotionState, SimConfig, Simulation,
    TickStatus, Vector2,
};
use rstest::{fixture, rstest};

const SIZE: Vector2 = Vector2::new(32.0, 32.0);

/// A controlled actor standing at the origin on a wide floor.
#[fixture]
fn grounded() -> (Simulation, Entity) {
    let mut sim = Simulation::default();
    let player = sim
        .spawn_actor(ActorDesc::new(Vector2::ZERO, SIZE).grounded().controlled())
        .unwrap();
    sim.spawn_obstacle(Vector2::new(-500.0, 32.0), Vector2::new(1000.0, 20.0));
    (sim, player)
}

fn none() -> InputSnapshot {
    InputSnapshot::new()
}

#[rstest]
fn idle_on_floor_never_moves(grounded: (Simulation, Entity)) {
    let (mut sim, player) = grounded;
    for _ in 0..120 {
        assert_eq!(sim.tick(&none()), TickStatus::Continue);
        assert_eq!(sim.position(player), Some(Vector2::ZERO));
        assert_eq!(sim.state(player), Some(MotionState::Idle));
    }
    assert_eq!(sim.on_floor(player), Some(true));
}

#[rstest]
fn walk_then_release(grounded: (Simulation, Entity)) {
    let (mut sim, player) = grounded;

    sim.tick(&InputSnapshot::from([Key::Right]));
    assert_eq!(sim.state(player), Some(MotionState::Move));
    assert_eq!(sim.state_name(player), Some("Move"));
    assert_eq!(sim.velocity(player).map(|v| v.x), Some(3.0));
    assert_eq!(sim.position(player), Some(Vector2::new(3.0, 0.0)));

    sim.tick(&none());
    assert_eq!(sim.state(player), Some(MotionState::Idle));
    assert_eq!(sim.velocity(player).map(|v| v.x), Some(0.0));
    assert_eq!(sim.position(player), Some(Vector2::new(3.0, 0.0)));
}

#[rstest]
fn walking_left_faces_left(grounded: (Simulation, Entity)) {
    let (mut sim, player) = grounded;
    let left = InputSnapshot::from([Key::Left]);
    for _ in 0..4 {
        sim.tick(&left);
    }
    assert_eq!(sim.direction(player), Some(Direction::Left));
    assert_eq!(sim.position(player), Some(Vector2::new(-12.0, 0.0)));
}

#[rstest]
fn jump_arc_lands_back_on_floor(grounded: (Simulation, Entity)) {
    let (mut sim, player) = grounded;
    let jump = InputSnapshot::from([Key::Jump]);

    sim.tick(&jump);
    assert_eq!(sim.state(player), Some(MotionState::JumpStart));
    assert_eq!(sim.velocity(player).map(|v| v.y), Some(-10.0));
    assert_eq!(sim.on_floor(player), Some(false));

    // Holding the key does not retrigger the jump.
    sim.tick(&jump);
    assert_eq!(sim.state(player), Some(MotionState::AirIdle));
    let vy = sim.velocity(player).map_or(f64::NAN, |v| v.y);
    assert_relative_eq!(vy, -9.6, epsilon = 1e-9);

    let mut ticks = 0;
    while sim.state(player) != Some(MotionState::Land) {
        sim.tick(&none());
        ticks += 1;
        assert!(ticks < 200, "never landed");
    }

    let pos = sim.position(player).unwrap();
    assert_abs_diff_eq!(pos.y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(sim.velocity(player).unwrap().y, 0.0, epsilon = 1e-9);
    assert!(!sim.world().get::<&Actor>(player).unwrap().is_jump_ready);

    sim.tick(&none());
    assert_eq!(sim.state(player), Some(MotionState::Idle));

    sim.tick(&InputSnapshot::from([Key::Right]));
    assert_eq!(sim.state(player), Some(MotionState::Move));
}

#[rstest]
fn rising_actor_reports_jump_apex(grounded: (Simulation, Entity)) {
    let (mut sim, player) = grounded;
    sim.tick(&InputSnapshot::from([Key::Jump]));
    let mut highest = 0.0_f64;
    for _ in 0..30 {
        sim.tick(&none());
        highest = highest.min(sim.position(player).unwrap().y);
    }
    // -10 - 9.6 - ... stops rising once the velocity turns positive.
    assert!(highest < -100.0, "apex at {highest}");
    assert!(highest > -140.0, "apex at {highest}");
}

#[rstest]
fn walks_off_a_ledge_and_falls(grounded: (Simulation, Entity)) {
    let (mut sim, player) = grounded;
    let right = InputSnapshot::from([Key::Right]);
    // The floor ends at x = 500.
    let mut fell = false;
    for _ in 0..200 {
        sim.tick(&right);
        if sim.state(player) == Some(MotionState::AirIdle) {
            fell = true;
            break;
        }
    }
    assert!(fell);
    assert!(sim.position(player).unwrap().x > 500.0 - SIZE.x);
}

#[test]
fn wall_clamps_walking_actor() {
    let config = SimConfig {
        move_speed: 10.0,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config);
    let player = sim
        .spawn_actor(ActorDesc::new(Vector2::ZERO, Vector2::splat(10.0)).grounded())
        .unwrap();
    sim.set_control_target(player).unwrap();
    sim.spawn_obstacle(Vector2::new(-50.0, 10.0), Vector2::new(200.0, 10.0));
    sim.spawn_obstacle(Vector2::new(14.0, -20.0), Vector2::new(5.0, 30.0));

    sim.tick(&InputSnapshot::from([Key::Right]));

    assert_eq!(sim.velocity(player).map(|v| v.x), Some(4.0));
    assert_eq!(sim.position(player), Some(Vector2::new(4.0, 0.0)));
    assert_eq!(sim.state(player), Some(MotionState::Move));
}

#[rstest]
fn quit_stops_without_simulating(grounded: (Simulation, Entity)) {
    let (mut sim, player) = grounded;
    let input = InputSnapshot::from([Key::Quit, Key::Right]);
    assert_eq!(sim.tick(&input), TickStatus::Quit);
    assert_eq!(sim.tick_count(), 0);
    assert_eq!(sim.state(player), Some(MotionState::Idle));
}

#[test]
fn uncontrolled_actors_ignore_input() {
    let mut sim = Simulation::default();
    let npc = sim
        .spawn_actor(ActorDesc::new(Vector2::ZERO, SIZE).grounded())
        .unwrap();
    sim.spawn_obstacle(Vector2::new(-500.0, 32.0), Vector2::new(1000.0, 20.0));
    sim.tick(&InputSnapshot::from([Key::Right]));
    assert_eq!(sim.state(npc), Some(MotionState::Idle));
}

#[rstest]
#[case(PairPolicy::Forward, false)]
#[case(PairPolicy::AllOthers, true)]
fn spawn_order_decides_who_collides(#[case] pair_policy: PairPolicy, #[case] stays_up: bool) {
    let config = SimConfig {
        pair_policy,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config);
    // The floor is spawned first, so under `Forward` the actor is never a mover.
    sim.spawn_obstacle(Vector2::new(-500.0, 32.0), Vector2::new(1000.0, 20.0));
    let actor = sim.spawn_actor(ActorDesc::new(Vector2::ZERO, SIZE)).unwrap();

    for _ in 0..30 {
        sim.tick(&none());
    }
    let y = sim.position(actor).unwrap().y;
    assert_eq!(y.abs() < 1e-9, stays_up, "y = {y}");
}

#[test]
fn snapshot_lists_actors_in_spawn_order() {
    let mut sim = Simulation::default();
    let player = load_test_scene(&mut sim).unwrap();
    let views = sim.snapshot();
    assert_eq!(views.len(), 3);
    assert_eq!(views[0].entity, player);
    assert_eq!(views[0].state, Some(MotionState::Idle));
    assert!(views[1..].iter().all(|v| v.state.is_none()));
    assert_eq!(sim.hitbox(player), Some(views[0].hitbox));
}

#[test]
fn test_scene_player_falls_onto_floor() {
    let mut sim = Simulation::default();
    let player = load_test_scene(&mut sim).unwrap();
    for _ in 0..120 {
        sim.tick(&none());
    }
    // Floor top is y = 400 and the player is 32 tall.
    let pos = sim.position(player).unwrap();
    assert_abs_diff_eq!(pos.y, 368.0, epsilon = 1e-9);
    assert_eq!(sim.state(player), Some(MotionState::Idle));
}

#[test]
fn hitbox_offset_shifts_contact() {
    let mut sim = Simulation::default();
    let player = sim
        .spawn_actor(
            ActorDesc::new(Vector2::ZERO, Vector2::new(10.0, 20.0))
                .with_offset(Vector2::new(0.0, 12.0))
                .grounded(),
        )
        .unwrap();
    sim.spawn_obstacle(Vector2::new(-50.0, 32.0), Vector2::new(100.0, 10.0));
    for _ in 0..10 {
        sim.tick(&none());
    }
    assert_eq!(sim.position(player), Some(Vector2::ZERO));
    assert_eq!(sim.on_floor(player), Some(true));
}

#[test]
fn config_file_round_trips_through_simulation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "move_speed": 5.0 }}"#).unwrap();
    let config = SimConfig::load(file.path()).unwrap();

    let mut sim = Simulation::new(config);
    let player = sim
        .spawn_actor(ActorDesc::new(Vector2::ZERO, SIZE).grounded())
        .unwrap();
    sim.set_control_target(player).unwrap();
    sim.tick(&InputSnapshot::from([Key::Left]));
    assert_eq!(sim.velocity(player).map(|v| v.x), Some(-5.0));
}

#[test]
fn config_errors_name_the_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    let err = SimConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));

    let missing = SimConfig::load(std::path::Path::new("/nonexistent/ledge.json")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
}

#[rstest]
fn jump_into_low_ceiling_falls_back_and_walks(grounded: (Simulation, Entity)) {
    let (mut sim, player) = grounded;
    // Ceiling bottom sits 9.5 above the player's top edge.
    sim.spawn_obstacle(Vector2::new(-500.0, -29.5), Vector2::new(1000.0, 20.0));

    sim.tick(&InputSnapshot::from([Key::Jump]));
    assert_abs_diff_eq!(sim.position(player).unwrap().y, -9.5, epsilon = 1e-9);

    for _ in 0..200 {
        sim.tick(&none());
        let y = sim.position(player).unwrap().y;
        assert!(y >= -9.5 - 1e-9, "top edge {y} passed the ceiling");
    }
    assert_abs_diff_eq!(sim.position(player).unwrap().y, 0.0, epsilon = 1e-9);
    assert_eq!(sim.state(player), Some(MotionState::Idle));
    assert_eq!(sim.on_floor(player), Some(true));

    let right = InputSnapshot::from([Key::Right]);
    for _ in 0..20 {
        sim.tick(&right);
    }
    assert_relative_eq!(sim.position(player).unwrap().x, 60.0);
}

#[test]
fn move_speed_override_beats_config() {
    let mut sim = Simulation::default();
    let player = sim
        .spawn_actor(
            ActorDesc::new(Vector2::ZERO, SIZE)
                .with_move_speed(7.0)
                .grounded()
                .controlled(),
        )
        .unwrap();
    sim.spawn_obstacle(Vector2::new(-500.0, 32.0), Vector2::new(1000.0, 20.0));

    sim.tick(&InputSnapshot::from([Key::Right]));
    assert_eq!(sim.config().move_speed, 3.0);
    assert_eq!(sim.velocity(player).map(|v| v.x), Some(7.0));
}

#[test]
fn controlled_spawn_takes_over_input() {
    let mut sim = Simulation::default();
    let first = sim
        .spawn_actor(ActorDesc::new(Vector2::ZERO, SIZE).grounded().controlled())
        .unwrap();
    let second = sim
        .spawn_actor(ActorDesc::new(Vector2::new(100.0, 0.0), SIZE).grounded().controlled())
        .unwrap();
    sim.spawn_obstacle(Vector2::new(-500.0, 32.0), Vector2::new(1000.0, 20.0));

    sim.tick(&InputSnapshot::from([Key::Right]));
    assert_eq!(sim.state(first), Some(MotionState::Idle));
    assert_eq!(sim.state(second), Some(MotionState::Move));

    sim.set_control_target(first).unwrap();
    sim.tick(&InputSnapshot::from([Key::Left]));
    assert_eq!(sim.state(first), Some(MotionState::Move));
    assert_eq!(sim.state(second), Some(MotionState::Idle));
}

#[test]
fn test_scene_player_takes_input() {
    let mut sim = Simulation::default();
    let player = load_test_scene(&mut sim).unwrap();
    sim.tick(&InputSnapshot::from([Key::Left]));
    assert_eq!(sim.direction(player), Some(Direction::Left));
}
