use crate::infra::Command;
use crate::planners::heuristic::Plan;
use crate::sim::GameOutcome;
use crate::state::{AgentState, GridMap};

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called when the game starts
    fn on_game_start(&mut self, map_width: i32, map_height: i32, view_radius: i32, keys_required: usize);

    /// Called every tick before the navigator decides
    fn on_state_update(&mut self, tick: u32, agent: &AgentState, grid: &GridMap, plan: Option<&Plan>);

    /// Called when a command is selected
    fn on_command_selected(&mut self, command: Command);

    /// Called when the game finishes
    fn on_game_finished(&mut self, outcome: GameOutcome, final_tick: u32);
}
