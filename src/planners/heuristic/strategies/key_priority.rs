use tracing::{debug, warn};

use crate::infra::Position;
use crate::planners::heuristic::objectives::{Objective, ObjectiveContext, ObjectiveStates};
use crate::planners::heuristic::strategies::planner::{
    Destination, OfferOutcome, PointOfInterest, SelectDestination,
};

/// Upper bound on re-arbitration rounds within one decision. Every round
/// that yields nothing either drops targets or ends the heal episode, so a
/// handful of rounds is enough to reach a terminal answer.
pub const MAX_ARBITRATION_ROUNDS: usize = 8;

/// Fixed-priority arbitration: finish healing, start healing when low,
/// exit with all keys, fetch keys, otherwise explore.
#[derive(Clone, Debug, Default)]
pub struct KeyPriorityStrategy {
    objectives: ObjectiveStates,
    healing: bool,
    avoid_hazards: bool,
}

impl KeyPriorityStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objectives(&self) -> &ObjectiveStates {
        &self.objectives
    }

    pub fn is_healing(&self) -> bool {
        self.healing
    }

    fn select_objective(&mut self, ctx: &ObjectiveContext) -> Objective {
        let health = ctx.agent.health;
        let min_health = ctx.config.min_health;
        self.avoid_hazards = false;

        if self.healing {
            if self.objectives.is_finished(Objective::Heal, ctx) {
                debug!(health, "Healing episode complete");
                self.healing = false;
            }
            return Objective::Heal;
        }

        if health <= min_health && self.objectives.has_targets(Objective::Heal) {
            debug!(health, min_health, "Starting healing episode");
            self.healing = true;
            return Objective::Heal;
        }

        if ctx.agent.has_all_keys() && self.objectives.has_targets(Objective::Exit) {
            return Objective::Exit;
        }

        if (!self.objectives.has_targets(Objective::Heal) || health > min_health)
            && self.objectives.has_targets(Objective::FetchKey)
        {
            return Objective::FetchKey;
        }

        self.avoid_hazards = true;
        Objective::Explore
    }
}

impl SelectDestination for KeyPriorityStrategy {
    #[tracing::instrument(level = "debug", skip(self, ctx), fields(position = %ctx.agent.position, health = ctx.agent.health))]
    fn decide(&mut self, ctx: &mut ObjectiveContext) -> Option<Destination> {
        for round in 0..MAX_ARBITRATION_ROUNDS {
            let objective = self.select_objective(ctx);
            if let Some(position) = self.objectives.next_coordinate(objective, ctx) {
                debug!("Objective {} -> destination {}", objective, position);
                return Some(Destination {
                    objective,
                    position,
                });
            }

            debug!(round, "Objective {} produced no coordinate, re-arbitrating", objective);
            match objective {
                // Exploration is the last resort
                Objective::Explore => break,
                Objective::Heal if self.healing => {
                    debug!("No reachable healing tile, abandoning healing episode");
                    self.healing = false;
                }
                _ => {}
            }
        }

        warn!("No objective can produce a destination");
        self.avoid_hazards = false;
        None
    }

    fn avoid_hazards(&self) -> bool {
        self.avoid_hazards
    }

    fn update_data(&mut self, pos: Position, kind: PointOfInterest) -> OfferOutcome {
        if !self.objectives.offer_coordinate(kind.objective(), pos) {
            return OfferOutcome::Rejected;
        }
        debug!("New {:?} at {}", kind, pos);
        match kind {
            PointOfInterest::Key => OfferOutcome::AcceptedKey,
            _ => OfferOutcome::Accepted,
        }
    }

    fn restore(&mut self, destination: Destination) {
        if self
            .objectives
            .restore_coordinate(destination.objective, destination.position)
        {
            debug!(
                "Restored {} target {}",
                destination.objective, destination.position
            );
        }
    }

    fn forget(&mut self, pos: Position, kind: PointOfInterest) {
        self.objectives.remove_coordinate(kind.objective(), pos);
    }
}
