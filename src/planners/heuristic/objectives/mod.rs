pub mod objective;
pub mod tracker;

pub mod exit;
pub mod explore;
pub mod fetch_key;
pub mod heal;

pub use objective::{ExecuteObjective, Objective, ObjectiveContext, ObjectiveStates};
pub use tracker::CoordinateTracker;
