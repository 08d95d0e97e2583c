#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entities of the tower defence simulation.
//!
//! The world crate owns the data the systems operate on: the placement
//! [`Grid`], path-following [`Enemy`] values with their timed effects, towers
//! composed from [`Component`] behaviours, and [`Projectile`] values. Entities
//! report what happened through [`tower_defence_core::Event`] buffers supplied
//! by the caller and never reach out to global state.

mod body;
mod components;
mod enemy;
mod grid;
mod projectile;
mod tower;
mod towers;

pub use body::{Anchor, Body};
pub use components::{
    Aim, Behaviour, CombatContext, Component, Explosion, Impact, Poison, Shooting, Slow, Splash,
    TowerFrame, TowerStats,
};
pub use enemy::{Enemy, EnemyStats, EnemyStatus, TimedEffect, LEAK_DAMAGE, WAYPOINT_EPSILON};
pub use grid::{CellState, Grid};
pub use projectile::{Projectile, PROJECTILE_SIZE};
pub use tower::Tower;
pub use towers::TowerRegistry;
