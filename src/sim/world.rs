use std::collections::{HashMap, VecDeque};
use std::error::Error;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::infra::{Bounds, Heading, Position, Tile};
use crate::sim::SimConfig;

const MIN_MAP_SIZE: i32 = 5;
const GENERATION_ATTEMPTS: usize = 32;
const HEALING_TILES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    EmptyMap,
    RaggedMap { line: usize, expected: usize, found: usize },
    UnknownTile { symbol: char, line: usize, column: usize },
    MissingStart,
    MissingFinish,
}

impl fmt::Display for SimError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::EmptyMap => write!(formatter, "Map contains no rows"),
            SimError::RaggedMap {
                line,
                expected,
                found,
            } => write!(
                formatter,
                "Line {} has {} tiles, expected {}",
                line, found, expected
            ),
            SimError::UnknownTile {
                symbol,
                line,
                column,
            } => write!(
                formatter,
                "Unknown tile '{}' at line {}, column {}",
                symbol, line, column
            ),
            SimError::MissingStart => write!(formatter, "Map has no start tile 'S'"),
            SimError::MissingFinish => write!(formatter, "Map has no finish tile 'F'"),
        }
    }
}

impl Error for SimError {}

/// Ground truth of the simulated map.
#[derive(Debug, Clone)]
pub struct World {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    start: Position,
    keys_required: usize,
}

impl World {
    /// Parse an ASCII map. The first row is the northernmost one.
    pub fn parse(text: &str) -> Result<Self, SimError> {
        let mut rows: Vec<(usize, Vec<char>)> = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let symbols: Vec<char> = line.chars().collect();
            if let Some((_, first)) = rows.first()
                && first.len() != symbols.len()
            {
                return Err(SimError::RaggedMap {
                    line: index + 1,
                    expected: first.len(),
                    found: symbols.len(),
                });
            }
            rows.push((index + 1, symbols));
        }

        let Some((_, first)) = rows.first() else {
            return Err(SimError::EmptyMap);
        };
        let width = first.len() as i32;
        let height = rows.len() as i32;

        let mut tiles = vec![Tile::Road; (width * height) as usize];
        let mut start = None;
        let mut has_finish = false;
        let mut keys_required = 0;

        for (row, (line, symbols)) in rows.iter().enumerate() {
            let y = height - 1 - row as i32;
            for (column, &symbol) in symbols.iter().enumerate() {
                let pos = Position::new(column as i32, y);
                let tile = match symbol {
                    '#' => Tile::Wall,
                    '.' => Tile::Road,
                    'M' => Tile::Mud,
                    'L' => Tile::Lava { key: None },
                    '1'..='9' => Tile::Lava {
                        key: symbol.to_digit(10),
                    },
                    'G' => Tile::Grass,
                    'H' => Tile::Health,
                    'F' => Tile::Finish,
                    'S' => {
                        if start.is_some() {
                            warn!("Ignoring extra start tile at {}", pos);
                        } else {
                            start = Some(pos);
                        }
                        Tile::Road
                    }
                    _ => {
                        return Err(SimError::UnknownTile {
                            symbol,
                            line: *line,
                            column: column + 1,
                        });
                    }
                };
                if tile.key().is_some() {
                    keys_required += 1;
                }
                has_finish |= tile == Tile::Finish;
                tiles[(y * width + column as i32) as usize] = tile;
            }
        }

        let start = start.ok_or(SimError::MissingStart)?;
        if !has_finish {
            return Err(SimError::MissingFinish);
        }

        Ok(Self {
            width,
            height,
            tiles,
            start,
            keys_required,
        })
    }

    /// Seeded random map with a wall border, start in the south-west corner
    /// and finish in the north-east corner. Maps where a key or the finish
    /// cannot be reached are regenerated; after too many attempts an
    /// obstacle-free map is used instead.
    pub fn generate(config: &SimConfig) -> Self {
        let width = config.width.max(MIN_MAP_SIZE);
        let height = config.height.max(MIN_MAP_SIZE);
        let mut rng = StdRng::seed_from_u64(config.seed);

        for attempt in 0..GENERATION_ATTEMPTS {
            let world = Self::scatter(&mut rng, width, height, config.keys, true);
            if world.is_solvable() {
                debug!(attempt, seed = config.seed, "Generated {}x{} map", width, height);
                return world;
            }
        }

        warn!(
            "No solvable map after {} attempts, using an open map",
            GENERATION_ATTEMPTS
        );
        Self::scatter(&mut rng, width, height, config.keys, false)
    }

    fn scatter(rng: &mut StdRng, width: i32, height: i32, keys: usize, obstacles: bool) -> Self {
        let start = Position::new(1, 1);
        let finish = Position::new(width - 2, height - 2);
        let launch = start.step(Heading::East);

        let mut world = Self {
            width,
            height,
            tiles: vec![Tile::Road; (width * height) as usize],
            start,
            keys_required: 0,
        };

        let cells: Vec<Position> = world.positions().collect();
        let mut free = Vec::new();
        for pos in cells {
            if pos.x == 0 || pos.y == 0 || pos.x == width - 1 || pos.y == height - 1 {
                world.set_tile(pos, Tile::Wall);
                continue;
            }
            if pos == start || pos == finish || pos == launch {
                continue;
            }
            let tile = if obstacles {
                match rng.random_range(0..100) {
                    0..14 => Tile::Wall,
                    14..18 => Tile::Mud,
                    18..23 => Tile::Lava { key: None },
                    23..29 => Tile::Grass,
                    _ => Tile::Road,
                }
            } else {
                Tile::Road
            };
            world.set_tile(pos, tile);
            if tile == Tile::Road {
                free.push(pos);
            }
        }
        world.set_tile(finish, Tile::Finish);

        for _ in 0..HEALING_TILES {
            if free.is_empty() {
                break;
            }
            let pos = free.swap_remove(rng.random_range(0..free.len()));
            world.set_tile(pos, Tile::Health);
        }

        for key in 1..=keys.min(9) {
            if free.is_empty() {
                warn!("Only room for {} of {} keys", key - 1, keys);
                break;
            }
            let pos = free.swap_remove(rng.random_range(0..free.len()));
            world.set_tile(pos, Tile::Lava { key: Some(key as u32) });
            world.keys_required += 1;
        }

        world
    }

    /// Every key and the finish can be reached from the start, ignoring
    /// the heading constraint.
    fn is_solvable(&self) -> bool {
        let mut reached = vec![false; self.tiles.len()];
        let mut queue = VecDeque::from([self.start]);
        reached[self.index(self.start)] = true;

        while let Some(current) = queue.pop_front() {
            for neighbor in current.neighbors() {
                match self.tile(neighbor) {
                    None | Some(Tile::Wall | Tile::Mud) => continue,
                    Some(_) => {}
                }
                let index = self.index(neighbor);
                if !reached[index] {
                    reached[index] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        self.tiles
            .iter()
            .zip(reached)
            .all(|(tile, reached)| reached || (tile.key().is_none() && *tile != Tile::Finish))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Vehicles always start facing east.
    pub fn start_heading(&self) -> Heading {
        Heading::East
    }

    pub fn keys_required(&self) -> usize {
        self.keys_required
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.in_bounds(pos).then(|| self.tiles[self.index(pos)])
    }

    fn set_tile(&mut self, pos: Position, tile: Tile) {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.tiles[index] = tile;
        }
    }

    /// Remove the key lying at `pos`, leaving plain lava behind.
    pub fn take_key(&mut self, pos: Position) -> Option<u32> {
        let key = self.tile(pos)?.key()?;
        self.set_tile(pos, Tile::Lava { key: None });
        Some(key)
    }

    /// What the navigator is told up front: walls, with every other cell
    /// reported as road.
    pub fn initial_layout(&self) -> HashMap<Position, Tile> {
        self.positions()
            .map(|pos| {
                let tile = match self.tiles[self.index(pos)] {
                    Tile::Wall => Tile::Wall,
                    _ => Tile::Road,
                };
                (pos, tile)
            })
            .collect()
    }

    /// Tiles within the square view around `center`, clipped to the map.
    pub fn sense(&self, center: Position, radius: i32) -> HashMap<Position, Tile> {
        Bounds::from_center_and_range(center, radius.max(0))
            .positions()
            .filter_map(|pos| self.tile(pos).map(|tile| (pos, tile)))
            .collect()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                let symbol = if pos == self.start {
                    'S'
                } else {
                    match self.tiles[self.index(pos)] {
                        Tile::Wall => '#',
                        Tile::Road => '.',
                        Tile::Mud => 'M',
                        Tile::Lava { key } => key
                            .filter(|&k| k > 0)
                            .and_then(|k| char::from_digit(k, 10))
                            .unwrap_or('L'),
                        Tile::Grass => 'G',
                        Tile::Health => 'H',
                        Tile::Finish => 'F',
                    }
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
