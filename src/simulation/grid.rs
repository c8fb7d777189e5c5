//! Shared occupancy grid
//!
//! Holds one [`EntityId`] per cell at most. The grid knows nothing about what
//! an entity is; callers supply predicates when they need to filter.

use thiserror::Error;

use super::generator::Generator;
use super::types::{EntityId, Point};

/// Invariant violations on grid cells
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) is already occupied by {occupant}")]
    Occupied { row: i32, col: i32, occupant: EntityId },

    #[error("cell ({row}, {col}) is empty")]
    Empty { row: i32, col: i32 },

    #[error("cell ({row}, {col}) is out of bounds")]
    OutOfBounds { row: i32, col: i32 },
}

/// Row-major occupancy grid
#[derive(Debug, Clone)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Option<EntityId>>,
}

impl Grid {
    pub fn new(rows: i32, cols: i32) -> Self {
        let size = (rows.max(0) * cols.max(0)) as usize;
        Self {
            rows,
            cols,
            cells: vec![None; size],
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn contains(&self, point: Point) -> bool {
        (0..self.rows).contains(&point.row) && (0..self.cols).contains(&point.col)
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if self.contains(Point::new(row, col)) {
            Some((row * self.cols + col) as usize)
        } else {
            None
        }
    }

    /// Whether the cell holds an entity. Out-of-bounds cells are never filled.
    pub fn is_filled(&self, row: i32, col: i32) -> bool {
        self.occupant(row, col).is_some()
    }

    /// The entity at a cell, if any
    pub fn occupant(&self, row: i32, col: i32) -> Option<EntityId> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// Place `entity` in an empty cell
    pub fn fill(&mut self, row: i32, col: i32, entity: EntityId) -> Result<(), GridError> {
        let index = self
            .index(row, col)
            .ok_or(GridError::OutOfBounds { row, col })?;
        if let Some(occupant) = self.cells[index] {
            return Err(GridError::Occupied { row, col, occupant });
        }
        self.cells[index] = Some(entity);
        Ok(())
    }

    /// Empty an occupied cell, returning what was there
    pub fn clear(&mut self, row: i32, col: i32) -> Result<EntityId, GridError> {
        let index = self
            .index(row, col)
            .ok_or(GridError::Empty { row, col })?;
        self.cells[index].take().ok_or(GridError::Empty { row, col })
    }

    /// The entity at an occupied cell
    pub fn get(&self, row: i32, col: i32) -> Result<EntityId, GridError> {
        self.occupant(row, col).ok_or(GridError::Empty { row, col })
    }

    fn matches<P>(&self, row: i32, col: i32, predicate: &P) -> bool
    where
        P: Fn(EntityId) -> bool,
    {
        self.occupant(row, col).is_some_and(predicate)
    }

    /// Gap to the first matching entity to the right of `(row, col)`
    ///
    /// Scans at most `max_checks` cells (the rest of the row when `None`) and
    /// returns the number of cells skipped before the match.
    pub fn distance_to_next<P>(
        &self,
        row: i32,
        col: i32,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<i32>
    where
        P: Fn(EntityId) -> bool,
    {
        let max_checks = max_checks.unwrap_or(self.cols - col);
        let end = self.cols.min(col + max_checks + 1);
        (col + 1..end)
            .find(|&c| self.matches(row, c, &predicate))
            .map(|c| c - col - 1)
    }

    /// Gap to the first matching entity to the left of `(row, col)`
    pub fn distance_to_prev<P>(
        &self,
        row: i32,
        col: i32,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<i32>
    where
        P: Fn(EntityId) -> bool,
    {
        let max_checks = max_checks.unwrap_or(col);
        let start = (-1).max(col - max_checks - 1);
        (start + 1..col)
            .rev()
            .find(|&c| self.matches(row, c, &predicate))
            .map(|c| col - c - 1)
    }

    /// Gap to the first matching entity below `(row, col)`
    pub fn distance_to_vertical_next<P>(
        &self,
        row: i32,
        col: i32,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<i32>
    where
        P: Fn(EntityId) -> bool,
    {
        let max_checks = max_checks.unwrap_or(self.rows - row);
        let end = self.rows.min(row + max_checks + 1);
        (row + 1..end)
            .find(|&r| self.matches(r, col, &predicate))
            .map(|r| r - row - 1)
    }

    /// Gap to the first matching entity above `(row, col)`
    pub fn distance_to_vertical_prev<P>(
        &self,
        row: i32,
        col: i32,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<i32>
    where
        P: Fn(EntityId) -> bool,
    {
        let max_checks = max_checks.unwrap_or(row);
        let start = (-1).max(row - max_checks - 1);
        (start + 1..row)
            .rev()
            .find(|&r| self.matches(r, col, &predicate))
            .map(|r| row - r - 1)
    }

    pub fn next<P>(&self, row: i32, col: i32, predicate: P, max_checks: Option<i32>) -> Option<EntityId>
    where
        P: Fn(EntityId) -> bool,
    {
        self.distance_to_next(row, col, predicate, max_checks)
            .and_then(|gap| self.occupant(row, col + gap + 1))
    }

    pub fn prev<P>(&self, row: i32, col: i32, predicate: P, max_checks: Option<i32>) -> Option<EntityId>
    where
        P: Fn(EntityId) -> bool,
    {
        self.distance_to_prev(row, col, predicate, max_checks)
            .and_then(|gap| self.occupant(row, col - gap - 1))
    }

    pub fn vertical_next<P>(
        &self,
        row: i32,
        col: i32,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<EntityId>
    where
        P: Fn(EntityId) -> bool,
    {
        self.distance_to_vertical_next(row, col, predicate, max_checks)
            .and_then(|gap| self.occupant(row + gap + 1, col))
    }

    pub fn vertical_prev<P>(
        &self,
        row: i32,
        col: i32,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<EntityId>
    where
        P: Fn(EntityId) -> bool,
    {
        self.distance_to_vertical_prev(row, col, predicate, max_checks)
            .and_then(|gap| self.occupant(row - gap - 1, col))
    }

    /// Snapshot of every occupied cell's handle, row by row
    pub fn occupied_handles(&self) -> Vec<EntityId> {
        self.cells.iter().flatten().copied().collect()
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Visit every entity present right now exactly once, in random order
    ///
    /// The snapshot is taken up front, so `visit` sees each handle once even
    /// if the caller mutates its own state in between.
    pub fn apply_randomized<F>(&self, rng: &mut dyn Generator, mut visit: F)
    where
        F: FnMut(EntityId),
    {
        let mut pending = self.occupied_handles();
        while let Some(entity) = take_random(&mut pending, rng) {
            visit(entity);
        }
    }
}

/// Draw and remove a uniformly random element from `pending`
pub fn take_random<T>(pending: &mut Vec<T>, rng: &mut dyn Generator) -> Option<T> {
    if pending.is_empty() {
        return None;
    }
    let position = rng.int_range(0, pending.len());
    Some(pending.remove(position))
}
