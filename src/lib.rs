//! Terminal Asteroids: an arena simulation (ship, splitting asteroids,
//! bullets, lives, score and high score) behind small collaborator seams,
//! plus a crossterm host that plays it.

pub mod arena;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod flash;
pub mod game;
pub mod input;
pub mod physics;
pub mod prefs;
pub mod rendering;
pub mod scene;
pub mod spawner;
pub mod terminal_io;
pub mod types;

pub use arena::{Arena, CollisionOutcome, RunSummary};
pub use config::GameConfig;
pub use error::{GameError, InvariantViolation};
pub use physics::CollisionEvent;
pub use scene::{Scene, Session};
