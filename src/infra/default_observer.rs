use std::io::{self, Write};

use tracing::info;

use crate::infra::{Command, GameObserver};
use crate::planners::heuristic::Plan;
use crate::sim::GameOutcome;
use crate::state::{AgentState, GridMap};

pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_game_start(&mut self, map_width: i32, map_height: i32, view_radius: i32, keys_required: usize) {
        info!("Game started");
        info!("- map size: {}x{}", map_width, map_height);
        info!("- view radius: {}", view_radius);
        info!("- keys required: {}", keys_required);
    }

    fn on_state_update(&mut self, tick: u32, agent: &AgentState, grid: &GridMap, plan: Option<&Plan>) {
        info!(
            "tick: {}, pos: {}, heading: {:?}, health: {}, keys: {}/{}",
            tick, agent.position, agent.heading, agent.health, agent.keys_held, agent.keys_required,
        );
        if let Some(plan) = plan {
            info!("objective: {} -> {}", plan.objective, plan.destination);
        }

        let map = grid.draw_ascii_map(Some((agent.position, agent.heading)));
        let _ = writeln!(io::stdout(), "{}", map);
    }

    fn on_command_selected(&mut self, command: Command) {
        info!("command: {}", command.as_str_name());
    }

    fn on_game_finished(&mut self, outcome: GameOutcome, final_tick: u32) {
        info!("Game finished with outcome: {:?}", outcome);
        info!("Final tick: {}", final_tick);
    }
}
