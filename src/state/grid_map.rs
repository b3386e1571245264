use std::collections::HashMap;

use tracing::{trace, warn};

use crate::infra::{NavigationError, Position, Tile};

/// Knowledge about a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Impassable. Never cleared once set.
    Blocked,
    /// Passable but avoided when a safer route exists.
    ToAvoid,
    /// Passable; number of times the sensor confirmed it (0 = unexplored).
    Visits(u32),
}

/// Dense per-cell knowledge of the map, indexed by position.
#[derive(Clone, Debug)]
pub struct GridMap {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl GridMap {
    /// An open grid with every cell unexplored.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Cell::Visits(0); (width * height) as usize],
        }
    }

    /// Build the map from the initially known layout: walls are blocked,
    /// everything else starts unexplored. Cells missing from the layout are
    /// treated as unexplored as well.
    pub fn build(tiles: &HashMap<Position, Tile>) -> Result<Self, NavigationError> {
        let mut width = 0;
        let mut height = 0;
        for pos in tiles.keys() {
            if pos.x < 0 || pos.y < 0 {
                warn!("Ignoring layout tile at negative position {}", pos);
                continue;
            }
            width = width.max(pos.x + 1);
            height = height.max(pos.y + 1);
        }
        if width == 0 || height == 0 {
            return Err(NavigationError::EmptyLayout);
        }

        let mut grid = Self::new(width, height);
        for (pos, tile) in tiles {
            if matches!(tile, Tile::Wall) {
                grid.mark_blocked(*pos);
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Out-of-bounds positions count as blocked.
    pub fn is_blocked(&self, pos: Position) -> bool {
        !matches!(self.cell(pos), Some(Cell::ToAvoid | Cell::Visits(_)))
    }

    pub fn is_avoid(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::ToAvoid)
    }

    pub fn visits(&self, pos: Position) -> Option<u32> {
        match self.cell(pos) {
            Some(Cell::Visits(count)) => Some(count),
            _ => None,
        }
    }

    pub fn mark_blocked(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = Cell::Blocked;
        }
    }

    /// Marks a hazard. A blocked cell stays blocked.
    pub fn mark_avoid(&mut self, pos: Position) {
        if let Some(i) = self.index(pos)
            && self.cells[i] != Cell::Blocked
        {
            self.cells[i] = Cell::ToAvoid;
        }
    }

    pub fn mark_visited(&mut self, pos: Position) {
        if let Some(i) = self.index(pos)
            && let Cell::Visits(count) = self.cells[i]
        {
            self.cells[i] = Cell::Visits(count.saturating_add(1));
        }
    }

    /// Blocks `pos` and floods outwards through every non-blocked cell until
    /// walls (or the map edge) stop the expansion. Used to wall off a region
    /// that turned out to be unreachable.
    pub fn block_outward(&mut self, pos: Position) {
        self.flood_blocked(pos, None);
    }

    /// Like [`GridMap::block_outward`], but the flood never enters `spared`,
    /// which is where the agent stands.
    pub fn block_outward_sparing(&mut self, pos: Position, spared: Position) {
        if pos == spared {
            return;
        }
        self.flood_blocked(pos, Some(spared));
    }

    #[tracing::instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    fn flood_blocked(&mut self, pos: Position, spared: Option<Position>) {
        if !self.in_bounds(pos) {
            return;
        }
        self.mark_blocked(pos);

        let mut frontier = vec![pos];
        let mut blocked = 1usize;
        while !frontier.is_empty() {
            let mut next_frontier = Vec::new();
            for current in frontier {
                for neighbor in current.neighbors() {
                    if Some(neighbor) == spared || self.is_blocked(neighbor) {
                        continue;
                    }
                    self.mark_blocked(neighbor);
                    next_frontier.push(neighbor);
                    blocked += 1;
                }
            }
            frontier = next_frontier;
        }
        trace!(blocked, "Outward block complete");
    }

    /// Smallest visit count among passable, non-hazard cells.
    pub fn smallest_visit_count(&self) -> Option<u32> {
        self.cells
            .iter()
            .filter_map(|cell| match cell {
                Cell::Visits(count) => Some(*count),
                _ => None,
            })
            .min()
    }

    /// True when no cell is left unexplored.
    pub fn is_fully_explored(&self) -> bool {
        !self.cells.contains(&Cell::Visits(0))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Render the map with the highest row first. `agent` is drawn with its
    /// heading glyph.
    pub fn draw_ascii_map(&self, agent: Option<(Position, crate::infra::Heading)>) -> String {
        let mut output = String::new();
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                let glyph = match agent {
                    Some((agent_pos, heading)) if agent_pos == pos => heading.glyph(),
                    _ => match self.cells[(y * self.width + x) as usize] {
                        Cell::Blocked => '█',
                        Cell::ToAvoid => '~',
                        Cell::Visits(0) => '·',
                        Cell::Visits(_) => ' ',
                    },
                };
                output.push(glyph);
            }
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Heading;

    fn ring_map() -> GridMap {
        // 7x7 open grid with a wall ring around the 3x3 block centred on (3, 3)
        let mut grid = GridMap::new(7, 7);
        for x in 1..=5 {
            grid.mark_blocked(Position::new(x, 1));
            grid.mark_blocked(Position::new(x, 5));
        }
        for y in 1..=5 {
            grid.mark_blocked(Position::new(1, y));
            grid.mark_blocked(Position::new(5, y));
        }
        grid
    }

    #[test]
    fn test_build_blocks_walls_only() {
        let mut tiles = HashMap::new();
        tiles.insert(Position::new(0, 0), Tile::Wall);
        tiles.insert(Position::new(1, 0), Tile::Road);
        tiles.insert(Position::new(2, 1), Tile::Finish);

        let grid = GridMap::build(&tiles).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.is_blocked(Position::new(0, 0)));
        assert_eq!(grid.visits(Position::new(1, 0)), Some(0));
        assert_eq!(grid.visits(Position::new(2, 1)), Some(0));
    }

    #[test]
    fn test_build_rejects_empty_layout() {
        let tiles = HashMap::new();
        assert_eq!(GridMap::build(&tiles).unwrap_err(), NavigationError::EmptyLayout);
    }

    #[test]
    fn test_visits_do_not_overwrite_blocked_or_avoid() {
        let mut grid = GridMap::new(3, 1);
        grid.mark_blocked(Position::new(0, 0));
        grid.mark_avoid(Position::new(1, 0));

        for x in 0..3 {
            grid.mark_visited(Position::new(x, 0));
            grid.mark_visited(Position::new(x, 0));
        }

        assert!(grid.is_blocked(Position::new(0, 0)));
        assert!(grid.is_avoid(Position::new(1, 0)));
        assert_eq!(grid.visits(Position::new(2, 0)), Some(2));
    }

    #[test]
    fn test_avoid_does_not_unblock() {
        let mut grid = GridMap::new(2, 1);
        grid.mark_blocked(Position::new(0, 0));
        grid.mark_avoid(Position::new(0, 0));
        assert!(grid.is_blocked(Position::new(0, 0)));

        grid.mark_avoid(Position::new(1, 0));
        grid.mark_blocked(Position::new(1, 0));
        assert!(grid.is_blocked(Position::new(1, 0)));
    }

    #[test]
    fn test_out_of_bounds_is_blocked_and_ignored() {
        let mut grid = GridMap::new(2, 2);
        let outside = Position::new(-1, 5);
        grid.mark_visited(outside);
        grid.mark_avoid(outside);
        grid.block_outward(outside);
        assert!(grid.is_blocked(outside));
        assert!(!grid.is_avoid(outside));
        assert_eq!(grid.cell(outside), None);
        assert!(!grid.is_blocked(Position::new(0, 0)));
    }

    #[test]
    fn test_block_outward_fills_enclosed_interior_only() {
        let mut grid = ring_map();
        grid.block_outward(Position::new(3, 3));

        for x in 2..=4 {
            for y in 2..=4 {
                assert!(grid.is_blocked(Position::new(x, y)), "({x}, {y}) should be blocked");
            }
        }
        // Outside the ring nothing changes
        assert!(!grid.is_blocked(Position::new(0, 0)));
        assert!(!grid.is_blocked(Position::new(6, 6)));
        assert!(!grid.is_blocked(Position::new(0, 3)));
    }

    #[test]
    fn test_block_outward_passes_through_hazards() {
        let mut grid = ring_map();
        grid.mark_avoid(Position::new(2, 2));
        grid.block_outward(Position::new(4, 4));
        assert!(grid.is_blocked(Position::new(2, 2)));
    }

    #[test]
    fn test_block_outward_sparing_stops_at_agent_cell() {
        // 5x1 corridor, agent in the middle
        let mut grid = GridMap::new(5, 1);
        let agent = Position::new(2, 0);
        grid.block_outward_sparing(Position::new(4, 0), agent);

        assert!(grid.is_blocked(Position::new(4, 0)));
        assert!(grid.is_blocked(Position::new(3, 0)));
        assert!(!grid.is_blocked(agent), "the agent's cell stays open");
        assert!(!grid.is_blocked(Position::new(1, 0)));
        assert!(!grid.is_blocked(Position::new(0, 0)));

        grid.block_outward_sparing(agent, agent);
        assert!(!grid.is_blocked(agent));
    }

    #[test]
    fn test_smallest_visit_count_and_explored() {
        let mut grid = GridMap::new(2, 1);
        assert_eq!(grid.smallest_visit_count(), Some(0));
        assert!(!grid.is_fully_explored());

        grid.mark_visited(Position::new(0, 0));
        grid.mark_avoid(Position::new(1, 0));
        assert_eq!(grid.smallest_visit_count(), Some(1));
        assert!(grid.is_fully_explored());

        grid.mark_blocked(Position::new(0, 0));
        assert_eq!(grid.smallest_visit_count(), None);
    }

    #[test]
    fn test_draw_ascii_map_puts_north_first() {
        let mut grid = GridMap::new(2, 2);
        grid.mark_blocked(Position::new(0, 1));
        let drawn = grid.draw_ascii_map(Some((Position::new(1, 0), Heading::East)));
        assert_eq!(drawn, "█·\n·>\n");
    }
}
