//! Core of a small 2D platformer: a generic state-machine engine driving
//! actor motion, resolved against axis-aligned hitboxes one tick at a time.
//!
//! The host feeds [`Simulation::tick`] a snapshot of pressed keys and reads
//! positions, states and hitboxes back out to draw.

pub mod components;
pub mod config;
pub mod engine;
pub mod fsm;
pub mod logging;
pub mod scene;
pub mod simulation;
pub mod systems;

pub use components::{Actor, Direction, MotionState, Vector2};
pub use config::{ConfigError, SimConfig};
pub use engine::input::{InputSnapshot, Key};
pub use fsm::{FsmError, Guard, Hooks, State, StateKey, StateMachine};
pub use logging::init as init_logging;
pub use simulation::{ActorDesc, ActorView, Simulation, TickStatus};
