use std::collections::{HashMap, VecDeque};

use tracing::{debug, info, warn};

use crate::infra::{Command, NavigationError, PathFinder, Position, Tile};
use crate::planners::heuristic::commands::command_sequence;
use crate::planners::heuristic::objectives::{Objective, ObjectiveContext};
use crate::planners::heuristic::strategies::{
    Destination, KeyPriorityStrategy, PointOfInterest, SelectDestination,
};
use crate::state::{AgentState, GridMap, NavigatorConfig};

/// Route currently being driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub objective: Objective,
    pub destination: Position,
    pub path: Vec<Position>,
}

/// Per-tick navigation loop: refresh knowledge, pick a destination, route
/// to it and hand out one motion command per tick.
pub struct Navigator<S = KeyPriorityStrategy> {
    grid: GridMap,
    finder: PathFinder,
    strategy: S,
    config: NavigatorConfig,
    commands: VecDeque<Command>,
    path_ahead: VecDeque<Position>,
    plan: Option<Plan>,
    /// Whether the last command left the vehicle rolling.
    moving: bool,
    /// Destination the agent is turning in place to face.
    turning_towards: Option<Destination>,
}

impl Navigator<KeyPriorityStrategy> {
    /// Build from the initially known layout (walls are all that matter).
    pub fn new(
        layout: &HashMap<Position, Tile>,
        config: NavigatorConfig,
    ) -> Result<Self, NavigationError> {
        Self::with_strategy(layout, config, KeyPriorityStrategy::new())
    }
}

impl<S: SelectDestination> Navigator<S> {
    pub fn with_strategy(
        layout: &HashMap<Position, Tile>,
        config: NavigatorConfig,
        strategy: S,
    ) -> Result<Self, NavigationError> {
        let grid = GridMap::build(layout)?;
        let finder = PathFinder::for_grid(&grid);
        info!(
            "Navigator ready: {}x{} map, min health {}, max health {}",
            grid.width(),
            grid.height(),
            config.min_health,
            config.max_health
        );
        Ok(Self {
            grid,
            finder,
            strategy,
            config,
            commands: VecDeque::new(),
            path_ahead: VecDeque::new(),
            plan: None,
            moving: false,
            turning_towards: None,
        })
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn pending_commands(&self) -> &VecDeque<Command> {
        &self.commands
    }

    /// One planning/acting cycle. Knowledge from `view` is applied before
    /// any decision is made.
    #[tracing::instrument(level = "debug", skip(self, view, agent), fields(position = %agent.position, heading = ?agent.heading))]
    pub fn tick(
        &mut self,
        view: &HashMap<Position, Tile>,
        agent: &AgentState,
    ) -> Result<Command, NavigationError> {
        if self.update_map(view) {
            debug!("New key discovered, abandoning current plan");
            self.abandon_plan();
        }

        self.check_oncoming_collision(agent.position);
        self.forget_collected_keys(view);

        if self.commands.is_empty() {
            self.replan(agent)?;
        }

        let command = self.commands.pop_front().unwrap_or(Command::Brake);
        match command {
            Command::Forward | Command::Reverse => self.moving = true,
            Command::Brake => self.moving = false,
            Command::TurnLeft | Command::TurnRight | Command::Idle => {}
        }
        Ok(command)
    }

    /// Apply newly visible tiles to the knowledge map and route points of
    /// interest to the strategy. Returns true when the current plan should
    /// be abandoned.
    fn update_map(&mut self, view: &HashMap<Position, Tile>) -> bool {
        let mut positions: Vec<Position> = view.keys().copied().collect();
        positions.sort();

        let mut interrupted = false;
        for pos in positions {
            let tile = view[&pos];
            match tile {
                Tile::Wall | Tile::Mud => self.grid.mark_blocked(pos),
                _ if tile.is_hazard() => self.grid.mark_avoid(pos),
                _ => self.grid.mark_visited(pos),
            }

            let point = match tile {
                Tile::Lava { .. } if tile.key().is_some() => Some(PointOfInterest::Key),
                Tile::Health => Some(PointOfInterest::Healing),
                Tile::Finish => Some(PointOfInterest::Exit),
                _ => None,
            };
            if let Some(kind) = point {
                interrupted |= self.strategy.update_data(pos, kind).interrupts();
            }
        }
        interrupted
    }

    /// Drop path cells already passed and brake if the next one has turned
    /// out to be blocked.
    fn check_oncoming_collision(&mut self, position: Position) {
        if let Some(index) = self.path_ahead.iter().position(|&p| p == position) {
            self.path_ahead.drain(..=index);
        }

        if let Some(&next) = self.path_ahead.front()
            && self.grid.is_blocked(next)
        {
            warn!("Cell {} ahead is blocked, braking", next);
            self.abandon_plan();
            self.commands.push_back(Command::Brake);
        }
    }

    /// Lava without a key at a tracked key location means the key is gone.
    fn forget_collected_keys(&mut self, view: &HashMap<Position, Tile>) {
        for (&pos, tile) in view {
            if let Tile::Lava { .. } = tile
                && tile.key().is_none()
            {
                self.strategy.forget(pos, PointOfInterest::Key);
            }
        }
    }

    /// Drop the command queue. The destination goes back to the strategy,
    /// since the agent never got there.
    fn abandon_plan(&mut self) {
        self.commands.clear();
        self.path_ahead.clear();
        if let Some(plan) = self.plan.take() {
            self.strategy.restore(Destination {
                objective: plan.objective,
                position: plan.destination,
            });
        }
        if let Some(destination) = self.turning_towards.take() {
            self.strategy.restore(destination);
        }
    }

    /// Stop and rotate a quarter turn, so the cells beside the agent become
    /// the cells ahead and behind it. The next replan routes to the same
    /// destination.
    fn turn_in_place(&mut self, destination: Destination) {
        info!(
            "Plan: {} -> {} needs a sideways first step, turning in place",
            destination.objective, destination.position
        );
        self.commands.clear();
        self.path_ahead.clear();
        self.plan = None;
        if self.moving {
            self.commands.push_back(Command::Brake);
        }
        self.commands.push_back(Command::TurnLeft);
        self.turning_towards = Some(destination);
    }

    /// Route to `destination` and queue the commands for it. Returns false
    /// when no path exists from the current heading.
    fn route(&mut self, agent: &AgentState, destination: Destination) -> bool {
        let avoid_hazards = self.strategy.avoid_hazards();
        let Some(path) = self.finder.find_best_path(
            &self.grid,
            agent.position,
            destination.position,
            agent.heading,
            avoid_hazards,
        ) else {
            return false;
        };

        self.commands = command_sequence(&path, agent.heading);
        self.path_ahead = path.iter().skip(1).copied().collect();
        info!(
            "Plan: {} -> {} ({} hops, {} commands, avoid hazards: {})",
            destination.objective,
            destination.position,
            path.len() - 1,
            self.commands.len(),
            avoid_hazards
        );
        self.plan = Some(Plan {
            objective: destination.objective,
            destination: destination.position,
            path,
        });
        true
    }

    /// Ask the strategy for destinations until one is routable. A destination
    /// that is only reachable through a sideways first step is kept and the
    /// agent turns in place. Unreachable destinations are walled off, which
    /// blocks at least one more cell per attempt, so the loop is bounded by
    /// the map size.
    fn replan(&mut self, agent: &AgentState) -> Result<(), NavigationError> {
        let no_plan = NavigationError::NoPlanAvailable {
            position: agent.position,
        };

        if let Some(destination) = self.turning_towards.take() {
            if self.route(agent, destination) {
                return Ok(());
            }
            self.strategy.restore(destination);
        }

        for attempt in 0..=self.grid.cell_count() {
            let destination = {
                let mut ctx = ObjectiveContext {
                    grid: &mut self.grid,
                    finder: &mut self.finder,
                    agent,
                    config: &self.config,
                };
                self.strategy.decide(&mut ctx)
            }
            .ok_or_else(|| no_plan.clone())?;

            if self.route(agent, destination) {
                return Ok(());
            }

            if self
                .finder
                .is_reachable(&self.grid, agent.position, destination.position)
            {
                self.turn_in_place(destination);
                return Ok(());
            }

            warn!(
                attempt,
                "Destination {} unreachable, walling it off", destination.position
            );
            self.grid
                .block_outward_sparing(destination.position, agent.position);
        }

        warn!("Giving up after walling off every candidate destination");
        Err(no_plan)
    }
}
