use hecs::{Entity, World};

use crate::components::{
    build_motion_machine, Aabb, Actor, Controlled, Direction, HitBox, MotionFsm, MotionState,
    Vector2,
};
use crate::config::SimConfig;
use crate::engine::input::InputSnapshot;
use crate::fsm::{FsmError, StateKey};
use crate::systems::{collision_system, commit_system, control_system, motion_system};

/// Outcome of one [`Simulation::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    /// The quit key was held; nothing was simulated.
    Quit,
}

/// Construction parameters for an FSM-driven actor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorDesc {
    pub position: Vector2,
    /// Hitbox extent, normally the sprite's dimensions.
    pub size: Vector2,
    pub offset: Vector2,
    /// Overrides the configured move speed.
    pub move_speed: Option<f64>,
    /// Start with `on_floor` already set.
    pub grounded: bool,
    /// Spawn as the control target, taking input from any previous one.
    pub controlled: bool,
}

impl ActorDesc {
    pub fn new(position: Vector2, size: Vector2) -> Self {
        Self {
            position,
            size,
            offset: Vector2::ZERO,
            move_speed: None,
            grounded: false,
            controlled: false,
        }
    }

    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_move_speed(mut self, speed: f64) -> Self {
        self.move_speed = Some(speed);
        self
    }

    pub fn grounded(mut self) -> Self {
        self.grounded = true;
        self
    }

    pub fn controlled(mut self) -> Self {
        self.controlled = true;
        self
    }
}

/// Read-only view of one actor for renderers and debug overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorView {
    pub entity: Entity,
    pub position: Vector2,
    pub velocity: Vector2,
    pub direction: Direction,
    pub on_floor: bool,
    /// `None` for static obstacles.
    pub state: Option<MotionState>,
    pub hitbox: Aabb,
}

/// The simulation world: actors in spawn order plus the per-tick pipeline.
pub struct Simulation {
    world: World,
    /// Spawn order; collision pairs are formed along it.
    order: Vec<Entity>,
    config: SimConfig,
    previous_input: InputSnapshot,
    tick_count: u64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            order: Vec::new(),
            config,
            previous_input: InputSnapshot::new(),
            tick_count: 0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Spawn an actor driven by the motion state machine, entered in `Idle`.
    pub fn spawn_actor(&mut self, desc: ActorDesc) -> Result<Entity, FsmError> {
        let mut fsm = build_motion_machine(self.config.tuning())?;
        let mut actor = Actor::new(
            desc.position,
            desc.move_speed.unwrap_or(self.config.move_speed),
        );
        actor.on_floor = desc.grounded;
        fsm.change_state(MotionState::Idle, &mut actor);

        let hitbox = HitBox::at(desc.size, desc.offset, desc.position);
        let entity = if desc.controlled {
            self.release_control();
            self.world.spawn((actor, hitbox, fsm, Controlled))
        } else {
            self.world.spawn((actor, hitbox, fsm))
        };
        self.order.push(entity);
        log::debug!("spawned actor {entity:?} at {:?}", desc.position);
        Ok(entity)
    }

    /// Spawn a static obstacle: it has a body and hitbox but no state
    /// machine, so nothing ever gives it velocity.
    pub fn spawn_obstacle(&mut self, position: Vector2, size: Vector2) -> Entity {
        let actor = Actor::new(position, 0.0);
        let hitbox = HitBox::at(size, Vector2::ZERO, position);
        let entity = self.world.spawn((actor, hitbox));
        self.order.push(entity);
        log::debug!("spawned obstacle {entity:?} at {position:?}");
        entity
    }

    /// Route input to `entity`, taking it away from any previous target.
    pub fn set_control_target(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        if !self.world.contains(entity) {
            return Err(hecs::NoSuchEntity);
        }
        self.release_control();
        self.world.insert_one(entity, Controlled)
    }

    /// Drop every control marker along with the intent it left behind.
    fn release_control(&mut self) {
        let previous: Vec<Entity> = self
            .world
            .query_mut::<(&mut Actor, &Controlled)>()
            .into_iter()
            .map(|(e, (actor, _))| {
                actor.is_walk = false;
                actor.is_jump_ready = false;
                e
            })
            .collect();
        for e in previous {
            if let Err(err) = self.world.remove_one::<Controlled>(e) {
                log::warn!("could not release control of {e:?}: {err}");
            }
        }
    }

    /// Advance one step: control, state machines, collision, commit.
    pub fn tick(&mut self, input: &InputSnapshot) -> TickStatus {
        if input.should_quit() {
            log::info!("quit requested after {} ticks", self.tick_count);
            return TickStatus::Quit;
        }

        control_system(&mut self.world, input, &self.previous_input);
        motion_system(&mut self.world);
        collision_system(
            &mut self.world,
            &self.order,
            self.config.pair_policy,
            self.config.probe_depth,
        );
        commit_system(&mut self.world);

        self.previous_input = input.clone();
        self.tick_count += 1;
        TickStatus::Continue
    }

    pub fn position(&self, entity: Entity) -> Option<Vector2> {
        self.world.get::<&Actor>(entity).ok().map(|a| a.pos)
    }

    pub fn velocity(&self, entity: Entity) -> Option<Vector2> {
        self.world.get::<&Actor>(entity).ok().map(|a| a.vec)
    }

    pub fn direction(&self, entity: Entity) -> Option<Direction> {
        self.world.get::<&Actor>(entity).ok().map(|a| a.direction)
    }

    pub fn on_floor(&self, entity: Entity) -> Option<bool> {
        self.world.get::<&Actor>(entity).ok().map(|a| a.on_floor)
    }

    /// Current motion state; `None` for obstacles.
    pub fn state(&self, entity: Entity) -> Option<MotionState> {
        self.world
            .get::<&MotionFsm>(entity)
            .ok()
            .and_then(|fsm| fsm.current())
    }

    /// Name of the current motion state, for picking an animation.
    pub fn state_name(&self, entity: Entity) -> Option<&'static str> {
        self.state(entity).map(StateKey::name)
    }

    /// Hitbox as of the last tick's update pass.
    pub fn hitbox(&self, entity: Entity) -> Option<Aabb> {
        self.world.get::<&HitBox>(entity).ok().map(|h| h.area)
    }

    /// Every actor in spawn order.
    pub fn snapshot(&self) -> Vec<ActorView> {
        self.order
            .iter()
            .filter_map(|&entity| {
                let actor = self.world.get::<&Actor>(entity).ok()?;
                let hitbox = self.world.get::<&HitBox>(entity).ok()?;
                Some(ActorView {
                    entity,
                    position: actor.pos,
                    velocity: actor.vec,
                    direction: actor.direction,
                    on_floor: actor.on_floor,
                    state: self.state(entity),
                    hitbox: hitbox.area,
                })
            })
            .collect()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
