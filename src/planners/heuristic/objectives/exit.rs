use crate::infra::Position;
use crate::planners::heuristic::objectives::objective::{ExecuteObjective, ObjectiveContext};
use crate::planners::heuristic::objectives::CoordinateTracker;

/// Finish tiles. Never finished; stays a candidate while tiles are known.
#[derive(Clone, Debug, Default)]
pub struct ExitObjective(CoordinateTracker);

impl ExecuteObjective for ExitObjective {
    fn next_coordinate(&mut self, ctx: &mut ObjectiveContext) -> Option<Position> {
        self.0.nearest(ctx)
    }

    fn is_finished(&mut self, _ctx: &ObjectiveContext) -> bool {
        false
    }

    fn tracker(&self) -> Option<&CoordinateTracker> {
        Some(&self.0)
    }

    fn tracker_mut(&mut self) -> Option<&mut CoordinateTracker> {
        Some(&mut self.0)
    }
}
