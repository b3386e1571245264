mod default_observer;
mod error;
mod game_observer;
mod pathfinding;
mod types;

pub use default_observer::DefaultObserver;
pub use error::NavigationError;
pub use game_observer::GameObserver;
pub use pathfinding::{PathFinder, UNREACHED};
pub use types::{Bounds, Command, Heading, Position, Tile};
