pub mod commands;
pub mod navigator;
pub mod objectives;
pub mod strategies;

pub use commands::command_sequence;
pub use navigator::{Navigator, Plan};
pub use objectives::Objective;
pub use strategies::{KeyPriorityStrategy, SelectDestination};
