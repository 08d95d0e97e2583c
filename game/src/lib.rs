#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrator of a tower defence session.
//!
//! [`TowerDefenceGame`] builds the level from a [`GameConfig`], runs the wave,
//! tower and projectile systems in a fixed order every tick, and owns the
//! player's [`Economy`]. Gold, lives and score only change in response to
//! events the systems report.

mod config;
mod economy;
mod game;
mod schedule;

pub use config::{GameConfig, GameError};
pub use economy::Economy;
pub use game::{QuizRound, TowerDefenceGame};
pub use schedule::{ScheduledAction, Scheduler};
