mod agent_state;
mod config;
mod grid_map;

pub use agent_state::AgentState;
pub(crate) use config::get_env_var_i32;
pub use config::NavigatorConfig;
pub use grid_map::{Cell, GridMap};
