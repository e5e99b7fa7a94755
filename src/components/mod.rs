mod motion;
mod physics;

pub use motion::{build_motion_machine, GroundRule, MotionFsm, MotionState, MotionTuning};
pub use physics::{Aabb, HitBox};

/// 2D point, velocity or acceleration. `+=` accumulates in place.
pub type Vector2 = glam::DVec2;

/// Facing direction along the horizontal axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// `-1.0` for left, `1.0` for right.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Physical state of one actor. Obstacles carry this too, they just never
/// get a [`MotionFsm`] to drive it.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub pos: Vector2,
    pub vec: Vector2,
    pub acc: Vector2,
    pub direction: Direction,
    pub move_speed: f64,
    /// Set by the collision pass when the ground probe hits something.
    pub on_floor: bool,
    /// Intent flags written by the control system.
    pub is_walk: bool,
    pub is_jump_ready: bool,
}

impl Actor {
    pub fn new(pos: Vector2, move_speed: f64) -> Self {
        Self {
            pos,
            vec: Vector2::ZERO,
            acc: Vector2::ZERO,
            direction: Direction::Right,
            move_speed,
            on_floor: false,
            is_walk: false,
            is_jump_ready: false,
        }
    }

    /// Horizontal velocity for walking in the facing direction.
    pub fn walk(&mut self) {
        self.vec.x = self.move_speed * self.direction.sign();
    }
}

/// Marker: this actor receives player input.
pub struct Controlled;
