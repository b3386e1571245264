use tracing::{info, warn};

use crate::infra::{GameObserver, NavigationError, Tile};
use crate::planners::heuristic::Navigator;
use crate::sim::{SimConfig, Vehicle, World};
use crate::state::NavigatorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// Reached the finish holding every key.
    Won,
    /// Health dropped to zero.
    Lost,
    /// The navigator ran out of reachable objectives.
    Stuck,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub ticks: u32,
    pub health: i32,
    pub keys_held: usize,
}

pub struct Game {
    world: World,
    config: SimConfig,
    navigator_config: NavigatorConfig,
    observer: Box<dyn GameObserver>,
}

impl Game {
    pub fn new(
        world: World,
        config: SimConfig,
        navigator_config: NavigatorConfig,
        observer: impl GameObserver + 'static,
    ) -> Self {
        Self {
            world,
            config,
            navigator_config,
            observer: Box::new(observer),
        }
    }

    pub fn run(&mut self) -> Result<GameReport, NavigationError> {
        let keys_required = self.world.keys_required();
        let mut navigator = Navigator::new(&self.world.initial_layout(), self.navigator_config)?;
        let mut vehicle = Vehicle::new(
            self.world.start(),
            self.world.start_heading(),
            self.navigator_config.max_health,
        );

        self.observer.on_game_start(
            self.world.width(),
            self.world.height(),
            self.config.view_radius,
            keys_required,
        );

        let mut outcome = GameOutcome::TimedOut;
        let mut tick = 0;
        while tick < self.config.max_ticks {
            let view = self.world.sense(vehicle.position(), self.config.view_radius);
            let agent = vehicle.agent_state(keys_required);
            self.observer
                .on_state_update(tick, &agent, navigator.grid(), navigator.plan());

            let command = match navigator.tick(&view, &agent) {
                Ok(command) => command,
                Err(err @ NavigationError::NoPlanAvailable { .. }) => {
                    warn!("Navigator gave up: {}", err);
                    outcome = GameOutcome::Stuck;
                    break;
                }
                Err(err) => return Err(err),
            };
            self.observer.on_command_selected(command);

            vehicle.apply(command, &mut self.world, &self.config);
            tick += 1;

            if vehicle.is_destroyed() {
                outcome = GameOutcome::Lost;
                break;
            }
            if self.world.tile(vehicle.position()) == Some(Tile::Finish)
                && vehicle.keys_held() >= keys_required
            {
                outcome = GameOutcome::Won;
                break;
            }
        }

        self.observer.on_game_finished(outcome, tick);
        info!(
            "Finished after {} ticks: {:?}, health {}, keys {}/{}",
            tick,
            outcome,
            vehicle.health(),
            vehicle.keys_held(),
            keys_required
        );

        Ok(GameReport {
            outcome,
            ticks: tick,
            health: vehicle.health(),
            keys_held: vehicle.keys_held(),
        })
    }
}
