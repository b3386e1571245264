pub mod infra;
pub mod planners;
pub mod sim;
pub mod state;

// Re-export commonly used types for convenience
pub use infra::{Command, Heading, NavigationError, PathFinder, Position, Tile};
pub use planners::heuristic::{KeyPriorityStrategy, Navigator};
pub use state::{AgentState, GridMap, NavigatorConfig};
