//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per external tick, no delta-time scaling
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use spawn::{Pattern, Spawner};
pub use state::{Difficulty, GameMode, GameState, Layout, Obstacle, Player};
pub use tick::{activate, step};
