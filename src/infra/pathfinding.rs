use tracing::{trace, warn};

use crate::infra::{Heading, Position};
use crate::state::GridMap;

/// Distance of a cell the current search has not reached.
pub const UNREACHED: u32 = u32::MAX;

/// Orientation-aware breadth-first search over the knowledge map.
///
/// The agent can only drive forwards or backwards along its heading before
/// it may turn, so the first move from the source is restricted to the cell
/// ahead and the cell behind. After that every orthogonal step costs 1.
///
/// The distance array is scratch space reused by every call; a finder
/// serves one search at a time.
pub struct PathFinder {
    width: i32,
    height: i32,
    distances: Vec<u32>,
}

impl PathFinder {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            distances: vec![UNREACHED; (width * height) as usize],
        }
    }

    pub fn for_grid(grid: &GridMap) -> Self {
        Self::new(grid.width(), grid.height())
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Hop count of `pos` from the source of the last search.
    pub fn distance(&self, pos: Position) -> Option<u32> {
        self.index(pos)
            .map(|i| self.distances[i])
            .filter(|&d| d != UNREACHED)
    }

    fn raw_distance(&self, pos: Position) -> u32 {
        self.index(pos).map_or(UNREACHED, |i| self.distances[i])
    }

    fn set_distance(&mut self, pos: Position, distance: u32) {
        if let Some(i) = self.index(pos) {
            self.distances[i] = distance;
        }
    }

    /// Shortest path from `source` to `destination`, both ends included.
    ///
    /// With `avoid_hazards` the search first refuses to enter hazard cells;
    /// when that leaves the destination unreachable it is repeated with
    /// hazards allowed. Returns `None` when the destination cannot be reached
    /// at all.
    #[tracing::instrument(level = "trace", skip(self, grid))]
    pub fn find_best_path(
        &mut self,
        grid: &GridMap,
        source: Position,
        destination: Position,
        heading: Heading,
        avoid_hazards: bool,
    ) -> Option<Vec<Position>> {
        if self.index(source).is_none() || self.index(destination).is_none() {
            warn!("Path query outside the map: {} -> {}", source, destination);
            return None;
        }
        if source == destination {
            return Some(vec![source]);
        }

        self.relax(grid, source, heading, avoid_hazards, Some(destination));
        if avoid_hazards && self.distance(destination).is_none() {
            trace!("Destination unreachable while avoiding hazards, retrying through them");
            self.relax(grid, source, heading, false, Some(destination));
        }

        self.distance(destination)?;
        self.backtrack(source, destination)
    }

    /// Nearest of `candidates` by hop count, ignoring hazards so distances
    /// are comparable. Candidates that cannot be reached are appended to
    /// `unreachable` and skipped. Ties go to the earliest candidate.
    #[tracing::instrument(level = "trace", skip(self, grid, candidates, unreachable), fields(candidate_count = candidates.len()))]
    pub fn find_nearest(
        &mut self,
        grid: &GridMap,
        candidates: &[Position],
        source: Position,
        heading: Heading,
        unreachable: &mut Vec<Position>,
    ) -> Option<Position> {
        if candidates.is_empty() {
            return None;
        }
        if self.index(source).is_none() {
            warn!("Nearest query from outside the map: {}", source);
            unreachable.extend_from_slice(candidates);
            return None;
        }

        self.relax(grid, source, heading, false, None);

        let mut nearest: Option<(Position, u32)> = None;
        for &candidate in candidates {
            match self.distance(candidate) {
                None => unreachable.push(candidate),
                Some(distance) => {
                    if nearest.is_none_or(|(_, best)| distance < best) {
                        nearest = Some((candidate, distance));
                    }
                }
            }
        }

        trace!(nearest = ?nearest, unreachable = unreachable.len(), "Nearest candidate search complete");
        nearest.map(|(pos, _)| pos)
    }

    /// Whether `destination` can be reached once the agent is free to turn
    /// in place first, so any neighbour of `source` may be the first step.
    /// Hazards are allowed.
    pub fn is_reachable(
        &mut self,
        grid: &GridMap,
        source: Position,
        destination: Position,
    ) -> bool {
        if self.index(source).is_none() || self.index(destination).is_none() {
            return false;
        }
        if source == destination {
            return true;
        }

        self.reset(source);
        let mut frontier = Vec::with_capacity(4);
        for neighbor in source.neighbors() {
            if self.index(neighbor).is_some() && Self::is_enterable(grid, neighbor, false) {
                self.set_distance(neighbor, 1);
                frontier.push(neighbor);
            }
        }
        if !frontier.contains(&destination) {
            self.expand(grid, frontier, false, Some(destination));
        }
        self.distance(destination).is_some()
    }

    fn reset(&mut self, source: Position) {
        self.distances.fill(UNREACHED);
        self.set_distance(source, 0);
    }

    fn is_enterable(grid: &GridMap, pos: Position, avoid_hazards: bool) -> bool {
        !grid.is_blocked(pos) && !(avoid_hazards && grid.is_avoid(pos))
    }

    /// Cells reachable in one elementary move: straight ahead and straight back.
    fn initial_frontier(
        &mut self,
        grid: &GridMap,
        source: Position,
        heading: Heading,
        avoid_hazards: bool,
    ) -> Vec<Position> {
        let mut frontier = Vec::with_capacity(2);
        for candidate in [source.step(heading), source.step(heading.opposite())] {
            if self.index(candidate).is_some() && Self::is_enterable(grid, candidate, avoid_hazards) {
                self.set_distance(candidate, 1);
                frontier.push(candidate);
            }
        }
        frontier
    }

    /// Fill the distance array outward from `source` in breadth-first rounds.
    /// Stops as soon as `target` receives its distance; with no target every
    /// reachable cell is labelled.
    fn relax(
        &mut self,
        grid: &GridMap,
        source: Position,
        heading: Heading,
        avoid_hazards: bool,
        target: Option<Position>,
    ) {
        self.reset(source);
        let frontier = self.initial_frontier(grid, source, heading, avoid_hazards);
        if target.is_some_and(|t| frontier.contains(&t)) {
            return;
        }
        self.expand(grid, frontier, avoid_hazards, target);
    }

    fn expand(
        &mut self,
        grid: &GridMap,
        mut frontier: Vec<Position>,
        avoid_hazards: bool,
        target: Option<Position>,
    ) {
        let mut rounds = 0;
        while !frontier.is_empty() {
            rounds += 1;
            let mut next_frontier = Vec::new();
            for current in frontier {
                let next_distance = self.raw_distance(current) + 1;
                for neighbor in current.neighbors() {
                    if self.index(neighbor).is_none()
                        || next_distance >= self.raw_distance(neighbor)
                        || !Self::is_enterable(grid, neighbor, avoid_hazards)
                    {
                        continue;
                    }
                    self.set_distance(neighbor, next_distance);
                    if Some(neighbor) == target {
                        trace!(rounds, distance = next_distance, "Destination reached");
                        return;
                    }
                    next_frontier.push(neighbor);
                }
            }
            frontier = next_frontier;
        }
        trace!(rounds, "Frontier exhausted");
    }

    /// Walk back from `destination` along strictly decreasing distances.
    fn backtrack(&self, source: Position, destination: Position) -> Option<Vec<Position>> {
        let mut path = vec![destination];
        let mut current = destination;

        while current != source {
            let current_distance = self.raw_distance(current);
            let previous = current.neighbors().into_iter().find(|&neighbor| {
                let distance = self.raw_distance(neighbor);
                distance != UNREACHED && distance + 1 == current_distance
            });
            match previous {
                Some(previous) => {
                    path.push(previous);
                    current = previous;
                }
                None => {
                    warn!("Backtrack stuck at {} while tracing {} -> {}", current, source, destination);
                    return None;
                }
            }
        }

        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_connected(path: &[Position]) {
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]), "{} and {} are not adjacent", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_straight_path_along_heading() {
        let grid = GridMap::new(5, 5);
        let mut finder = PathFinder::for_grid(&grid);

        let path = finder
            .find_best_path(&grid, Position::new(0, 0), Position::new(0, 2), Heading::North, false)
            .unwrap();

        assert_eq!(path, vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)]);
    }

    #[test]
    fn test_sideways_destination_requires_leaving_along_heading() {
        let grid = GridMap::new(5, 5);
        let mut finder = PathFinder::for_grid(&grid);

        // Facing east the agent must first drive to (1, 0) before turning north
        let path = finder
            .find_best_path(&grid, Position::new(0, 0), Position::new(0, 2), Heading::East, false)
            .unwrap();

        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(0, 2)));
        assert_eq!(path[1], Position::new(1, 0));
        assert_eq!(path.len(), 5);
        assert_connected(&path);
    }

    #[test]
    fn test_path_length_matches_manhattan_on_open_grid() {
        let grid = GridMap::new(8, 8);
        let mut finder = PathFinder::for_grid(&grid);
        let source = Position::new(2, 3);

        for x in 0..8 {
            for y in 0..8 {
                let destination = Position::new(x, y);
                let path = finder
                    .find_best_path(&grid, source, destination, Heading::East, false)
                    .unwrap();
                assert_connected(&path);
                assert_eq!(path.last(), Some(&destination));
                // Any destination off the east-west line costs two extra hops
                // when it sits directly above or below the source
                let expected = if x == source.x && y != source.y {
                    source.distance(&destination) + 2
                } else {
                    source.distance(&destination)
                };
                assert_eq!(path.len() as i32 - 1, expected, "to {}", destination);
            }
        }
    }

    #[test]
    fn test_path_to_self() {
        let grid = GridMap::new(3, 3);
        let mut finder = PathFinder::for_grid(&grid);
        let here = Position::new(1, 1);
        assert_eq!(
            finder.find_best_path(&grid, here, here, Heading::South, true),
            Some(vec![here])
        );
    }

    #[test]
    fn test_enclosed_destination_is_unreachable() {
        let mut grid = GridMap::new(7, 7);
        for x in 1..=5 {
            grid.mark_blocked(Position::new(x, 1));
            grid.mark_blocked(Position::new(x, 5));
        }
        for y in 1..=5 {
            grid.mark_blocked(Position::new(1, y));
            grid.mark_blocked(Position::new(5, y));
        }
        let mut finder = PathFinder::for_grid(&grid);
        let destination = Position::new(3, 3);

        let path = finder.find_best_path(&grid, Position::new(0, 0), destination, Heading::East, true);
        assert!(path.is_none());

        grid.block_outward(destination);
        for x in 2..=4 {
            for y in 2..=4 {
                assert!(grid.is_blocked(Position::new(x, y)));
            }
        }
        assert!(!grid.is_blocked(Position::new(0, 0)));
    }

    #[test]
    fn test_avoids_hazards_when_detour_exists() {
        // 5x3 grid, hazard in the middle of the bottom row
        let mut grid = GridMap::new(5, 3);
        grid.mark_avoid(Position::new(2, 0));
        let mut finder = PathFinder::for_grid(&grid);

        let path = finder
            .find_best_path(&grid, Position::new(0, 0), Position::new(4, 0), Heading::East, true)
            .unwrap();

        assert!(!path.iter().any(|p| grid.is_avoid(*p)), "path crossed a hazard: {:?}", path);
        assert_eq!(path.last(), Some(&Position::new(4, 0)));
        assert_connected(&path);
    }

    #[test]
    fn test_falls_back_through_hazards_when_no_detour() {
        // Single corridor with a hazard in the middle
        let mut grid = GridMap::new(5, 1);
        grid.mark_avoid(Position::new(2, 0));
        let mut finder = PathFinder::for_grid(&grid);

        let path = finder
            .find_best_path(&grid, Position::new(0, 0), Position::new(4, 0), Heading::East, true)
            .unwrap();

        assert_eq!(path.len(), 5);
        assert!(path.contains(&Position::new(2, 0)));
    }

    #[test]
    fn test_hazards_ignored_without_avoidance() {
        let mut grid = GridMap::new(5, 3);
        grid.mark_avoid(Position::new(2, 0));
        let mut finder = PathFinder::for_grid(&grid);

        let path = finder
            .find_best_path(&grid, Position::new(0, 0), Position::new(4, 0), Heading::East, false)
            .unwrap();

        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_blocked_ahead_and_behind_leaves_everything_unreachable() {
        let mut grid = GridMap::new(3, 3);
        grid.mark_blocked(Position::new(0, 1));
        grid.mark_blocked(Position::new(2, 1));
        let mut finder = PathFinder::for_grid(&grid);

        let path = finder.find_best_path(&grid, Position::new(1, 1), Position::new(1, 2), Heading::East, false);
        assert!(path.is_none());
    }

    #[test]
    fn test_sideways_only_destination_is_reachable_after_turning() {
        // Ahead is walled, behind is a dead end: (0, 3) needs a sideways first step
        let mut grid = GridMap::new(3, 4);
        grid.mark_blocked(Position::new(1, 2));
        grid.mark_blocked(Position::new(0, 0));
        grid.mark_blocked(Position::new(2, 0));
        let mut finder = PathFinder::for_grid(&grid);
        let source = Position::new(1, 1);
        let destination = Position::new(0, 3);

        assert!(finder.find_best_path(&grid, source, destination, Heading::North, false).is_none());
        assert!(finder.is_reachable(&grid, source, destination));
        assert!(finder.is_reachable(&grid, source, Position::new(0, 1)));
        assert!(finder.is_reachable(&grid, source, source));
        assert!(!finder.is_reachable(&grid, source, Position::new(0, 0)));
        assert!(
            finder
                .find_best_path(&grid, source, destination, Heading::West, false)
                .is_some()
        );
    }

    #[test]
    fn test_out_of_bounds_query_is_unreachable() {
        let grid = GridMap::new(3, 3);
        let mut finder = PathFinder::for_grid(&grid);
        assert!(finder
            .find_best_path(&grid, Position::new(0, 0), Position::new(5, 5), Heading::East, false)
            .is_none());
    }

    #[test]
    fn test_find_nearest_reports_unreachable_candidates() {
        let mut grid = GridMap::new(6, 3);
        // Wall off column 4 so (5, y) is unreachable
        for y in 0..3 {
            grid.mark_blocked(Position::new(4, y));
        }
        let mut finder = PathFinder::for_grid(&grid);
        let candidates = [Position::new(5, 1), Position::new(3, 0), Position::new(2, 0)];
        let mut unreachable = Vec::new();

        let nearest = finder.find_nearest(&grid, &candidates, Position::new(0, 0), Heading::East, &mut unreachable);

        assert_eq!(nearest, Some(Position::new(2, 0)));
        assert_eq!(unreachable, vec![Position::new(5, 1)]);
    }

    #[test]
    fn test_find_nearest_ignores_hazards_and_breaks_ties_by_order() {
        let mut grid = GridMap::new(5, 1);
        grid.mark_avoid(Position::new(1, 0));
        let mut finder = PathFinder::for_grid(&grid);
        let candidates = [Position::new(4, 0), Position::new(0, 0)];
        let mut unreachable = Vec::new();

        // Both candidates are two hops away from the middle
        let nearest = finder.find_nearest(&grid, &candidates, Position::new(2, 0), Heading::East, &mut unreachable);

        assert_eq!(nearest, Some(Position::new(4, 0)));
        assert!(unreachable.is_empty());
        assert_eq!(finder.distance(Position::new(0, 0)), Some(2));
    }

    #[test]
    fn test_find_nearest_with_no_candidates() {
        let grid = GridMap::new(2, 2);
        let mut finder = PathFinder::for_grid(&grid);
        let mut unreachable = Vec::new();
        assert_eq!(
            finder.find_nearest(&grid, &[], Position::new(0, 0), Heading::East, &mut unreachable),
            None
        );
    }
}
