//! Core types for the crosswalk simulation
//!
//! Plain geometry and identifiers shared by the grid, the relative views
//! and every agent.

use std::fmt;
use std::ops::Add;

/// Handle to an entity stored in the [`EntityArena`](super::entity::EntityArena).
/// Grid cells hold these handles, never the entities themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// An absolute cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Axis-aligned rectangle with inclusive corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub upper_left: Point,
    pub lower_right: Point,
}

impl Rectangle {
    /// A `rows x cols` rectangle anchored at the origin
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            upper_left: Point::new(0, 0),
            lower_right: Point::new(rows - 1, cols - 1),
        }
    }

    pub fn from_corners(upper_left: Point, lower_right: Point) -> Self {
        Self {
            upper_left,
            lower_right,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.upper_left.row <= point.row
            && point.row <= self.lower_right.row
            && self.upper_left.col <= point.col
            && point.col <= self.lower_right.col
    }

    pub fn start_row(&self) -> i32 {
        self.upper_left.row
    }

    pub fn end_row(&self) -> i32 {
        self.lower_right.row
    }

    pub fn start_col(&self) -> i32 {
        self.upper_left.col
    }

    pub fn end_col(&self) -> i32 {
        self.lower_right.col
    }

    pub fn rows(&self) -> i32 {
        self.end_row() - self.start_row() + 1
    }

    pub fn cols(&self) -> i32 {
        self.end_col() - self.start_col() + 1
    }

    pub fn upper_right(&self) -> Point {
        Point::new(self.upper_left.row, self.lower_right.col)
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.lower_right.row, self.upper_left.col)
    }

    /// Translate by `rows` downwards and `cols` to the right (negative values
    /// move up/left)
    pub fn shifted(&self, rows: i32, cols: i32) -> Self {
        Self {
            upper_left: Point::new(self.upper_left.row + rows, self.upper_left.col + cols),
            lower_right: Point::new(self.lower_right.row + rows, self.lower_right.col + cols),
        }
    }
}

/// Cardinal direction an agent treats as "forward"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }
}

/// A `(forward, right)` offset expressed in an agent's own frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Displacement {
    pub forward: i32,
    pub right: i32,
}

impl Displacement {
    pub const STILL: Displacement = Displacement {
        forward: 0,
        right: 0,
    };

    pub fn new(forward: i32, right: i32) -> Self {
        Self { forward, right }
    }

    pub fn forward(amount: i32) -> Self {
        Self::new(amount, 0)
    }

    pub fn backward(amount: i32) -> Self {
        Self::new(-amount, 0)
    }

    pub fn right(amount: i32) -> Self {
        Self::new(0, amount)
    }

    pub fn left(amount: i32) -> Self {
        Self::new(0, -amount)
    }

    pub fn is_still(&self) -> bool {
        self.forward == 0 && self.right == 0
    }

    /// Shrink both components one unit toward zero
    pub fn decrease(&mut self) {
        self.forward -= self.forward.signum();
        self.right -= self.right.signum();
    }

    /// Map this displacement onto the grid, starting from `center` and facing `facing`
    pub fn apply(&self, facing: Direction, center: Point) -> Point {
        match facing {
            Direction::East => Point::new(center.row + self.right, center.col + self.forward),
            Direction::West => Point::new(center.row - self.right, center.col - self.forward),
            Direction::North => Point::new(center.row - self.forward, center.col + self.right),
            Direction::South => Point::new(center.row + self.forward, center.col - self.right),
        }
    }

    /// Inverse of [`apply`](Self::apply): the displacement that leads from
    /// `center` to `point` for an agent facing `facing`
    pub fn between(facing: Direction, center: Point, point: Point) -> Self {
        let d_row = point.row - center.row;
        let d_col = point.col - center.col;
        match facing {
            Direction::East => Self::new(d_col, d_row),
            Direction::West => Self::new(-d_col, -d_row),
            Direction::North => Self::new(-d_row, d_col),
            Direction::South => Self::new(d_row, -d_col),
        }
    }
}

impl Add for Displacement {
    type Output = Displacement;

    fn add(self, other: Displacement) -> Displacement {
        Displacement::new(self.forward + other.forward, self.right + other.right)
    }
}

/// Top speed a pedestrian can reach, also used when hurrying off the crosswalk
pub const PEDESTRIAN_MAX_SPEED: i32 = 6;

/// How far behind a pedestrian looks before merging into an adjacent lane
pub const LATERAL_LOOKBEHIND: i32 = 6;

/// Cells a vehicle advances per tick
pub const VEHICLE_SPEED: i32 = 10;

/// Pedestrians a waiting area can hold before arrivals are turned away
pub const WAITING_AREA_CAPACITY: u32 = 100;
