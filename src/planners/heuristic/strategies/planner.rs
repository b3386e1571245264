use crate::infra::Position;
use crate::planners::heuristic::objectives::{Objective, ObjectiveContext};

/// Kind of point of interest reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointOfInterest {
    Key,
    Healing,
    Exit,
}

impl PointOfInterest {
    pub fn objective(self) -> Objective {
        match self {
            PointOfInterest::Key => Objective::FetchKey,
            PointOfInterest::Healing => Objective::Heal,
            PointOfInterest::Exit => Objective::Exit,
        }
    }
}

/// Result of routing a point of interest to its objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    /// A new key location; any in-flight plan should be abandoned.
    AcceptedKey,
    Accepted,
    /// Already known (or seen before and since dropped).
    Rejected,
}

impl OfferOutcome {
    pub fn interrupts(self) -> bool {
        self == OfferOutcome::AcceptedKey
    }
}

/// Destination chosen for this planning cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub objective: Objective,
    pub position: Position,
}

/// Trait for strategies choosing where the agent drives next
pub trait SelectDestination {
    /// Pick the next destination, or `None` when no objective can produce one.
    fn decide(&mut self, ctx: &mut ObjectiveContext) -> Option<Destination>;

    /// Whether the most recent decision asked for hazard avoidance.
    fn avoid_hazards(&self) -> bool;

    fn update_data(&mut self, pos: Position, kind: PointOfInterest) -> OfferOutcome;

    /// The destination was given up before the agent got there.
    fn restore(&mut self, destination: Destination);

    /// The point of interest is gone from the world, such as a key that has
    /// been picked up.
    fn forget(&mut self, pos: Position, kind: PointOfInterest);
}
