use std::fmt;

/// Grid coordinate. `y` grows towards the north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Orthogonal neighbours in fixed scan order.
    pub fn neighbors(&self) -> [Position; 4] {
        [
            self.step(Heading::North),
            self.step(Heading::East),
            self.step(Heading::South),
            self.step(Heading::West),
        ]
    }

    pub fn step(&self, heading: Heading) -> Position {
        let (dx, dy) = heading.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal facing of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Counter-clockwise order starting at east.
    pub const ALL: [Heading; 4] = [Heading::East, Heading::North, Heading::West, Heading::South];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Heading> {
        match (dx, dy) {
            (0, 1) => Some(Heading::North),
            (1, 0) => Some(Heading::East),
            (0, -1) => Some(Heading::South),
            (-1, 0) => Some(Heading::West),
            _ => None,
        }
    }

    /// Unit heading from `from` to an adjacent `to`.
    pub fn between(from: Position, to: Position) -> Option<Heading> {
        Heading::from_delta(to.x - from.x, to.y - from.y)
    }

    pub fn opposite(self) -> Heading {
        match self {
            Heading::North => Heading::South,
            Heading::East => Heading::West,
            Heading::South => Heading::North,
            Heading::West => Heading::East,
        }
    }

    /// Heading after a clockwise quarter turn.
    pub fn right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// Heading after a counter-clockwise quarter turn.
    pub fn left(self) -> Heading {
        self.right().opposite()
    }

    /// Index into [`Heading::ALL`].
    pub fn rotation_index(self) -> usize {
        match self {
            Heading::East => 0,
            Heading::North => 1,
            Heading::West => 2,
            Heading::South => 3,
        }
    }

    /// The four headings rotated so that `self` comes first.
    pub fn priority_order(self) -> [Heading; 4] {
        let start = self.rotation_index();
        std::array::from_fn(|i| Heading::ALL[(start + i) % 4])
    }

    pub fn glyph(self) -> char {
        match self {
            Heading::North => '^',
            Heading::East => '>',
            Heading::South => 'v',
            Heading::West => '<',
        }
    }
}

/// Primitive motion command accepted by the agent, one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Forward,
    Reverse,
    TurnLeft,
    TurnRight,
    Brake,
    Idle,
}

impl Command {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Command::Forward => "FORWARD",
            Command::Reverse => "REVERSE",
            Command::TurnLeft => "TURN_LEFT",
            Command::TurnRight => "TURN_RIGHT",
            Command::Brake => "BRAKE",
            Command::Idle => "IDLE",
        }
    }
}

/// Tile classification reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    /// Traps the vehicle; treated as impassable.
    Mud,
    /// Damages the vehicle; may hold a numbered key.
    Lava { key: Option<u32> },
    Grass,
    Health,
    Finish,
    Road,
}

impl Tile {
    pub fn is_hazard(&self) -> bool {
        matches!(self, Tile::Lava { .. } | Tile::Grass)
    }

    pub fn key(&self) -> Option<u32> {
        match self {
            Tile::Lava { key } => key.filter(|&k| k > 0),
            _ => None,
        }
    }
}

/// Axis-aligned inclusive rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn from_center_and_range(center: Position, range: i32) -> Self {
        Self {
            min_x: center.x - range,
            max_x: center.x + range,
            min_y: center.y - range,
            max_y: center.y + range,
        }
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| Position::new(x, y)))
    }
}
