use tracing::{debug, info};

use crate::infra::{Command, Heading, Position, Tile};
use crate::sim::{SimConfig, World};
use crate::state::AgentState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Stopped,
    Forward,
    Reverse,
}

/// Simulated vehicle. Moves at most one cell per tick.
///
/// A turn while moving rotates the vehicle and carries it one cell in the
/// new travel direction. While reversing the body rotates the other way,
/// so the vehicle keeps facing away from where it travels. A turn while
/// stopped rotates in place.
#[derive(Debug, Clone)]
pub struct Vehicle {
    position: Position,
    heading: Heading,
    motion: Motion,
    health: i32,
    max_health: i32,
    keys_held: usize,
}

impl Vehicle {
    pub fn new(position: Position, heading: Heading, max_health: i32) -> Self {
        Self {
            position,
            heading,
            motion: Motion::Stopped,
            health: max_health,
            max_health,
            keys_held: 0,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn keys_held(&self) -> usize {
        self.keys_held
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    pub fn agent_state(&self, keys_required: usize) -> AgentState {
        AgentState::new(self.position, self.heading)
            .with_health(self.health)
            .with_keys(self.keys_held, keys_required)
    }

    /// Execute one command, then apply the effect of the tile the vehicle
    /// ends up on.
    pub fn apply(&mut self, command: Command, world: &mut World, config: &SimConfig) {
        match command {
            Command::Forward => self.motion = Motion::Forward,
            Command::Reverse => self.motion = Motion::Reverse,
            Command::TurnLeft | Command::TurnRight => {
                let left = command == Command::TurnLeft;
                self.heading = match (self.motion, left) {
                    (Motion::Reverse, true) | (Motion::Forward | Motion::Stopped, false) => {
                        self.heading.right()
                    }
                    (Motion::Reverse, false) | (Motion::Forward | Motion::Stopped, true) => {
                        self.heading.left()
                    }
                };
            }
            Command::Brake => self.motion = Motion::Stopped,
            Command::Idle => {}
        }

        self.advance(world);
        self.apply_tile_effects(world, config);
    }

    fn advance(&mut self, world: &World) {
        let direction = match self.motion {
            Motion::Stopped => return,
            Motion::Forward => self.heading,
            Motion::Reverse => self.heading.opposite(),
        };

        let target = self.position.step(direction);
        match world.tile(target) {
            None | Some(Tile::Wall | Tile::Mud) => {
                debug!("Vehicle hit {} and stopped", target);
                self.motion = Motion::Stopped;
            }
            Some(_) => self.position = target,
        }
    }

    fn apply_tile_effects(&mut self, world: &mut World, config: &SimConfig) {
        match world.tile(self.position) {
            Some(Tile::Lava { .. }) => {
                self.health -= config.lava_damage;
                if let Some(key) = world.take_key(self.position) {
                    self.keys_held += 1;
                    info!("Picked up key {} at {}", key, self.position);
                }
            }
            Some(Tile::Health) => {
                self.health = (self.health + config.heal_rate).min(self.max_health);
            }
            _ => {}
        }
    }
}
