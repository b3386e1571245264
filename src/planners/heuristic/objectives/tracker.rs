use std::collections::HashSet;

use tracing::{debug, trace};

use crate::infra::Position;
use crate::planners::heuristic::objectives::ObjectiveContext;

/// Coordinates of interest for one objective.
///
/// Every coordinate ever offered is remembered in `history`, so a target
/// that was removed or found unreachable is never accepted again.
#[derive(Clone, Debug, Default)]
pub struct CoordinateTracker {
    targets: Vec<Position>,
    history: HashSet<Position>,
}

impl CoordinateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the coordinate was newly accepted.
    pub fn offer(&mut self, pos: Position) -> bool {
        if !self.history.insert(pos) {
            return false;
        }
        self.targets.push(pos);
        true
    }

    pub fn remove(&mut self, pos: Position) {
        self.targets.retain(|&target| target != pos);
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn targets(&self) -> &[Position] {
        &self.targets
    }

    pub fn has_seen(&self, pos: Position) -> bool {
        self.history.contains(&pos)
    }

    /// Put a previously accepted coordinate back on the target list. Unknown
    /// coordinates are ignored, so `offer` stays the only way in.
    pub fn restore(&mut self, pos: Position) -> bool {
        if !self.has_seen(pos) || self.targets.contains(&pos) {
            return false;
        }
        self.targets.push(pos);
        true
    }

    /// Nearest reachable target. A target that can only be reached after
    /// turning in place is kept and returned when nothing else is reachable.
    /// Targets that cannot be reached at all are dropped and their enclosed
    /// region is walled off in the knowledge map.
    pub fn nearest(&mut self, ctx: &mut ObjectiveContext) -> Option<Position> {
        let mut unreachable = Vec::new();
        let nearest = ctx.finder.find_nearest(
            ctx.grid,
            &self.targets,
            ctx.agent.position,
            ctx.agent.heading,
            &mut unreachable,
        );

        let mut needs_turn = None;
        for pos in unreachable {
            if ctx.finder.is_reachable(ctx.grid, ctx.agent.position, pos) {
                trace!("Target {} needs a turn in place first", pos);
                needs_turn.get_or_insert(pos);
                continue;
            }
            debug!("Target {} is unreachable, dropping it", pos);
            self.remove(pos);
            ctx.grid.block_outward_sparing(pos, ctx.agent.position);
        }

        nearest.or(needs_turn)
    }
}
