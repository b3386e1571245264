use std::collections::HashSet;

use tracing::{debug, trace};

use crate::infra::Position;
use crate::planners::heuristic::objectives::objective::{ExecuteObjective, ObjectiveContext};

/// Drive towards the least-visited cells, nearest first.
#[derive(Clone, Debug, Default)]
pub struct ExploreObjective {
    finished: bool,
}

impl ExecuteObjective for ExploreObjective {
    /// Expanding-ring search around the agent for a cell whose visit count
    /// equals the global minimum. Directions are scanned starting with the
    /// current heading so the agent tends to keep going the way it faces.
    /// The ring may pass through hazards but never returns one, nor the
    /// cell the agent stands on.
    fn next_coordinate(&mut self, ctx: &mut ObjectiveContext) -> Option<Position> {
        let smallest = ctx.grid.smallest_visit_count()?;
        let order = ctx.agent.heading.priority_order();
        let start = ctx.agent.position;

        let mut seen = HashSet::from([start]);
        let mut frontier = vec![start];
        let mut rings = 0;

        while !frontier.is_empty() {
            rings += 1;
            let mut next_frontier = Vec::new();
            for current in frontier {
                for heading in order {
                    let neighbor = current.step(heading);
                    if neighbor == start || !ctx.grid.in_bounds(neighbor) {
                        continue;
                    }
                    if ctx.grid.visits(neighbor) == Some(smallest) {
                        debug!(rings, smallest, "Exploration target {}", neighbor);
                        return Some(neighbor);
                    }
                    if !ctx.grid.is_blocked(neighbor) && seen.insert(neighbor) {
                        next_frontier.push(neighbor);
                    }
                }
            }
            frontier = next_frontier;
        }

        trace!(smallest, "No least-visited cell connected to {}", start);
        None
    }

    /// Once every cell is visited, blocked or a hazard, exploration stays finished.
    fn is_finished(&mut self, ctx: &ObjectiveContext) -> bool {
        if !self.finished && ctx.grid.is_fully_explored() {
            self.finished = true;
        }
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{Heading, PathFinder};
    use crate::state::{AgentState, GridMap, NavigatorConfig};

    fn explore_from(grid: &mut GridMap, agent: &AgentState) -> Option<Position> {
        let mut finder = PathFinder::for_grid(grid);
        let config = NavigatorConfig::default();
        let mut ctx = ObjectiveContext {
            grid,
            finder: &mut finder,
            agent,
            config: &config,
        };
        ExploreObjective::default().next_coordinate(&mut ctx)
    }

    #[test]
    fn test_prefers_cell_along_heading() {
        let mut grid = GridMap::new(5, 5);
        let center = Position::new(2, 2);
        grid.mark_visited(center);

        let north = AgentState::new(center, Heading::North);
        assert_eq!(explore_from(&mut grid, &north), Some(Position::new(2, 3)));

        let west = AgentState::new(center, Heading::West);
        assert_eq!(explore_from(&mut grid, &west), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_finds_least_visited_cell() {
        let mut grid = GridMap::new(5, 5);
        for pos in grid.positions().collect::<Vec<_>>() {
            if pos != Position::new(4, 4) {
                grid.mark_visited(pos);
            }
        }
        let agent = AgentState::new(Position::new(0, 0), Heading::East);
        assert_eq!(explore_from(&mut grid, &agent), Some(Position::new(4, 4)));
    }

    #[test]
    fn test_never_targets_hazards() {
        let mut grid = GridMap::new(3, 1);
        grid.mark_visited(Position::new(0, 0));
        grid.mark_visited(Position::new(2, 0));
        grid.mark_avoid(Position::new(1, 0));

        // Every passable cell is visited once, so the minimum is 1 and the
        // ring walks through the hazard to reach (2, 0)
        let agent = AgentState::new(Position::new(0, 0), Heading::East);
        assert_eq!(explore_from(&mut grid, &agent), Some(Position::new(2, 0)));
    }

    #[test]
    fn test_own_cell_is_never_the_target() {
        // Visit counts along the row: 2 1 2 2 1, agent on the first minimum
        let mut grid = GridMap::new(5, 1);
        for (x, visits) in [(0, 2), (1, 1), (2, 2), (3, 2), (4, 1)] {
            for _ in 0..visits {
                grid.mark_visited(Position::new(x, 0));
            }
        }
        let agent = AgentState::new(Position::new(1, 0), Heading::East);
        assert_eq!(
            explore_from(&mut grid, &agent),
            Some(Position::new(4, 0)),
            "the second ring reaches back to the agent's cell before (4, 0)"
        );

        let mut lone = GridMap::new(2, 1);
        lone.mark_visited(Position::new(0, 0));
        lone.mark_visited(Position::new(1, 0));
        lone.mark_visited(Position::new(1, 0));
        let agent = AgentState::new(Position::new(0, 0), Heading::East);
        assert_eq!(explore_from(&mut lone, &agent), None);
    }

    #[test]
    fn test_walled_off_minimum_yields_nothing() {
        let mut grid = GridMap::new(5, 1);
        grid.mark_blocked(Position::new(2, 0));
        for x in [0, 1, 3] {
            grid.mark_visited(Position::new(x, 0));
        }
        let agent = AgentState::new(Position::new(0, 0), Heading::East);
        assert_eq!(explore_from(&mut grid, &agent), None);
    }

    #[test]
    fn test_finished_is_sticky() {
        let mut grid = GridMap::new(2, 1);
        let mut finder = PathFinder::for_grid(&grid);
        let agent = AgentState::new(Position::new(0, 0), Heading::East);
        let config = NavigatorConfig::default();
        let mut objective = ExploreObjective::default();

        {
            let ctx = ObjectiveContext {
                grid: &mut grid,
                finder: &mut finder,
                agent: &agent,
                config: &config,
            };
            assert!(!objective.is_finished(&ctx));
            assert!(objective.has_targets());
            assert!(!objective.offer_coordinate(Position::new(1, 0)));
        }

        grid.mark_visited(Position::new(0, 0));
        grid.mark_visited(Position::new(1, 0));
        {
            let ctx = ObjectiveContext {
                grid: &mut grid,
                finder: &mut finder,
                agent: &agent,
                config: &config,
            };
            assert!(objective.is_finished(&ctx));
        }
        assert!(objective.finished);
    }
}
