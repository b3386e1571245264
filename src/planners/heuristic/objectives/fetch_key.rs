use tracing::debug;

use crate::infra::Position;
use crate::planners::heuristic::objectives::objective::{ExecuteObjective, ObjectiveContext};
use crate::planners::heuristic::objectives::CoordinateTracker;

/// Lava tiles holding a key. A key location is handed out once and then
/// dropped from tracking.
#[derive(Clone, Debug, Default)]
pub struct FetchKeyObjective(CoordinateTracker);

impl ExecuteObjective for FetchKeyObjective {
    fn next_coordinate(&mut self, ctx: &mut ObjectiveContext) -> Option<Position> {
        let nearest = self.0.nearest(ctx)?;
        debug!("Fetching key at {}", nearest);
        self.0.remove(nearest);
        Some(nearest)
    }

    fn is_finished(&mut self, _ctx: &ObjectiveContext) -> bool {
        !self.0.has_targets()
    }

    fn tracker(&self) -> Option<&CoordinateTracker> {
        Some(&self.0)
    }

    fn tracker_mut(&mut self) -> Option<&mut CoordinateTracker> {
        Some(&mut self.0)
    }
}
