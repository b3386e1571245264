use crate::infra::{Heading, Position};

/// Snapshot of the agent as reported by the vehicle each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub position: Position,
    pub heading: Heading,
    pub health: i32,
    pub keys_held: usize,
    pub keys_required: usize,
}

impl AgentState {
    pub fn new(position: Position, heading: Heading) -> Self {
        Self {
            position,
            heading,
            health: 100,
            keys_held: 0,
            keys_required: 0,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_keys(mut self, held: usize, required: usize) -> Self {
        self.keys_held = held;
        self.keys_required = required;
        self
    }

    pub fn has_all_keys(&self) -> bool {
        self.keys_held >= self.keys_required
    }
}
