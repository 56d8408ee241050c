//! Deterministic simulation module
//!
//! The physics world and its lifecycle controller. This module must stay
//! pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by insertion)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod controller;
pub mod world;

pub use body::{Body, BodyShape, Material};
pub use collision::{
    CollisionResult, ball_ball_collision, ball_rect_collision, bounce_velocity,
};
pub use controller::{SimPhase, Simulation, StepMetrics, StepObserver, StepRunner};
pub use world::World;
