mod config;
mod game;
mod vehicle;
mod world;

pub use config::SimConfig;
pub use game::{Game, GameOutcome, GameReport};
pub use vehicle::{Motion, Vehicle};
pub use world::{SimError, World};
