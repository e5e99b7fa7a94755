mod collision;
mod control;
mod motion;
mod physics;

pub use collision::{collision_system, resolve_axis, Axis, PairPolicy, Resolution};
pub use control::control_system;
pub use motion::motion_system;
pub use physics::commit_system;
