//! Flocking engine: steering maths, agent integration and the per-tick
//! orchestration of a boid population plus one input-driven player.

pub mod agent;
pub mod behavior;
pub mod flock;
pub mod life;
pub mod vector;

pub use agent::{integrate, wrap_edges, Agent, Bounds, Role, WanderState};
pub use behavior::SteeringParams;
pub use flock::{flocking_force, Flock, WeightSource};
pub use life::Grid;
pub use vector::{constrain, remap, Vector2D};

pub use flock_shared::{
    AgentKind, AgentView, Color, ConfigError, FrameSnapshot, LifeConfig, PlayerInput,
    SimulationConfig, Weights,
};
