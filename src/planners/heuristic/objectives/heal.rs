use crate::infra::Position;
use crate::planners::heuristic::objectives::objective::{ExecuteObjective, ObjectiveContext};
use crate::planners::heuristic::objectives::CoordinateTracker;

/// Healing tiles. Finished only once health is exactly back at the ceiling.
#[derive(Clone, Debug, Default)]
pub struct HealObjective(CoordinateTracker);

impl ExecuteObjective for HealObjective {
    fn next_coordinate(&mut self, ctx: &mut ObjectiveContext) -> Option<Position> {
        self.0.nearest(ctx)
    }

    fn is_finished(&mut self, ctx: &ObjectiveContext) -> bool {
        ctx.agent.health == ctx.config.max_health
    }

    fn tracker(&self) -> Option<&CoordinateTracker> {
        Some(&self.0)
    }

    fn tracker_mut(&mut self) -> Option<&mut CoordinateTracker> {
        Some(&mut self.0)
    }
}
