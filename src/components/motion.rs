use serde::{Deserialize, Serialize};

use super::Actor;
use crate::fsm::{FsmError, Hooks, StateKey, StateMachine};

// ---------------------------------------------------------------------------
// Motion states
// ---------------------------------------------------------------------------

/// Discrete motion states of a controllable actor.
///
/// A jump is split into `JumpStart` (one tick, applies the launch impulse)
/// and `AirIdle` (gravity accumulates every tick) so the impulse is applied
/// exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionState {
    Idle,
    Move,
    JumpStart,
    AirIdle,
    Land,
}

impl StateKey for MotionState {
    const ALL: &'static [Self] = &[
        Self::Idle,
        Self::Move,
        Self::JumpStart,
        Self::AirIdle,
        Self::Land,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Move => "Move",
            Self::JumpStart => "JumpStart",
            Self::AirIdle => "AirIdle",
            Self::Land => "Land",
        }
    }
}

/// FSM component attached to every animated actor.
pub type MotionFsm = StateMachine<MotionState, Actor>;

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// How the landing and falling guards decide an actor is grounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GroundRule {
    /// Trust the collision pass's `on_floor` flag.
    #[default]
    Contact,
    /// No collision: grounded once `pos.y` reaches `floor_y`.
    Height { floor_y: f64 },
}

impl GroundRule {
    pub fn grounded(self, actor: &Actor) -> bool {
        match self {
            Self::Contact => actor.on_floor,
            Self::Height { floor_y } => actor.pos.y >= floor_y,
        }
    }
}

/// Per-tick constants captured by the motion hooks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    /// Vertical velocity set on launch (negative is up).
    pub jump_impulse: f64,
    /// Added to `vec.y` every airborne tick. No terminal velocity.
    pub gravity: f64,
    pub ground: GroundRule,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            jump_impulse: -10.0,
            gravity: 0.4,
            ground: GroundRule::Contact,
        }
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Build and validate the standard platformer motion machine. The machine is
/// returned without a current state; the caller enters `Idle` with the actor
/// it belongs to.
pub fn build_motion_machine(tuning: MotionTuning) -> Result<MotionFsm, FsmError> {
    use MotionState::*;

    let MotionTuning {
        jump_impulse,
        gravity,
        ground,
    } = tuning;
    let mut fsm = MotionFsm::new();

    fsm.add_state(Idle, Hooks::new().on_update(|a: &mut Actor| a.vec.x = 0.0));
    fsm.add_state(Move, Hooks::new().on_update(|a: &mut Actor| a.walk()));
    fsm.add_state(
        JumpStart,
        Hooks::new().on_update(move |a: &mut Actor| {
            a.vec.y = jump_impulse;
            a.on_floor = false;
        }),
    );
    fsm.add_state(
        AirIdle,
        Hooks::new().on_update(move |a: &mut Actor| {
            a.acc.y = gravity;
            a.vec.y += a.acc.y;
        }),
    );
    fsm.add_state(
        Land,
        Hooks::new().on_update(|a: &mut Actor| {
            a.acc.y = 0.0;
            a.vec.y = 0.0;
            a.is_jump_ready = false;
        }),
    );

    // Registration order is evaluation priority within each source.
    fsm.add_transition(&[Idle, Land], Move, |a: &Actor| a.is_walk);
    fsm.add_transition(&[Move, Land], Idle, |a: &Actor| !a.is_walk);
    fsm.add_transition(&[Idle, Move, Land], JumpStart, |a: &Actor| a.is_jump_ready);
    fsm.add_transition(&[JumpStart], AirIdle, |_: &Actor| true);
    fsm.add_transition(&[AirIdle], Land, move |a: &Actor| ground.grounded(a));
    fsm.add_transition(&[Idle, Move], AirIdle, move |a: &Actor| !ground.grounded(a));

    fsm.validate()?;
    Ok(fsm)
}
