//! Agent-local view over the shared grid
//!
//! A [`RelativeView`] lets an agent talk in `(forward, right)` terms. It keeps
//! its own center, facing and bounds; the grid is passed in on every call so
//! the view never owns or borrows it across ticks.

use super::grid::{Grid, GridError};
use super::types::{Direction, Displacement, EntityId, Point, Rectangle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeView {
    center: Point,
    bounds: Rectangle,
    facing: Direction,
}

impl RelativeView {
    pub fn new(center: Point, bounds: Rectangle, facing: Direction) -> Self {
        Self {
            center,
            bounds,
            facing,
        }
    }

    /// A view with the same facing and bounds whose center is shifted by `displacement`
    pub fn displaced(&self, displacement: Displacement) -> Self {
        Self::new(self.point(displacement), self.bounds, self.facing)
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn rows(&self) -> i32 {
        self.bounds.rows()
    }

    pub fn cols(&self) -> i32 {
        self.bounds.cols()
    }

    /// Absolute point reached by `displacement` from the center
    pub fn point(&self, displacement: Displacement) -> Point {
        displacement.apply(self.facing, self.center)
    }

    /// Whether the center lies inside `zone`
    pub fn is_in(&self, zone: &Rectangle) -> bool {
        zone.contains(self.center)
    }

    /// Whether `displacement` lands inside both the view bounds and the grid
    pub fn is_inbounds(&self, grid: &Grid, displacement: Displacement) -> bool {
        let point = self.point(displacement);
        self.bounds.contains(point) && grid.contains(point)
    }

    pub fn is_filled(&self, grid: &Grid, displacement: Displacement) -> bool {
        let point = self.point(displacement);
        grid.is_filled(point.row, point.col)
    }

    /// Occupant at `displacement`, `None` when empty or outside the view
    pub fn get(&self, grid: &Grid, displacement: Displacement) -> Option<EntityId> {
        if !self.is_inbounds(grid, displacement) {
            return None;
        }
        let point = self.point(displacement);
        grid.occupant(point.row, point.col)
    }

    pub fn fill(
        &self,
        grid: &mut Grid,
        displacement: Displacement,
        entity: EntityId,
    ) -> Result<(), GridError> {
        let point = self.point(displacement);
        if !self.is_inbounds(grid, displacement) {
            return Err(GridError::OutOfBounds {
                row: point.row,
                col: point.col,
            });
        }
        grid.fill(point.row, point.col, entity)
    }

    pub fn clear(&self, grid: &mut Grid, displacement: Displacement) -> Result<EntityId, GridError> {
        let point = self.point(displacement);
        grid.clear(point.row, point.col)
    }

    /// Gap to the first matching entity further along the forward axis
    pub fn distance_to_next<P>(
        &self,
        grid: &Grid,
        displacement: Displacement,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<i32>
    where
        P: Fn(EntityId) -> bool,
    {
        let Point { row, col } = self.point(displacement);
        match self.facing {
            Direction::East => grid.distance_to_next(row, col, predicate, max_checks),
            Direction::West => grid.distance_to_prev(row, col, predicate, max_checks),
            Direction::North => grid.distance_to_vertical_prev(row, col, predicate, max_checks),
            Direction::South => grid.distance_to_vertical_next(row, col, predicate, max_checks),
        }
    }

    /// Gap to the first matching entity behind, along the forward axis
    pub fn distance_to_prev<P>(
        &self,
        grid: &Grid,
        displacement: Displacement,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<i32>
    where
        P: Fn(EntityId) -> bool,
    {
        let Point { row, col } = self.point(displacement);
        match self.facing {
            Direction::East => grid.distance_to_prev(row, col, predicate, max_checks),
            Direction::West => grid.distance_to_next(row, col, predicate, max_checks),
            Direction::North => grid.distance_to_vertical_next(row, col, predicate, max_checks),
            Direction::South => grid.distance_to_vertical_prev(row, col, predicate, max_checks),
        }
    }

    pub fn next<P>(
        &self,
        grid: &Grid,
        displacement: Displacement,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<EntityId>
    where
        P: Fn(EntityId) -> bool,
    {
        let Point { row, col } = self.point(displacement);
        match self.facing {
            Direction::East => grid.next(row, col, predicate, max_checks),
            Direction::West => grid.prev(row, col, predicate, max_checks),
            Direction::North => grid.vertical_prev(row, col, predicate, max_checks),
            Direction::South => grid.vertical_next(row, col, predicate, max_checks),
        }
    }

    pub fn prev<P>(
        &self,
        grid: &Grid,
        displacement: Displacement,
        predicate: P,
        max_checks: Option<i32>,
    ) -> Option<EntityId>
    where
        P: Fn(EntityId) -> bool,
    {
        let Point { row, col } = self.point(displacement);
        match self.facing {
            Direction::East => grid.prev(row, col, predicate, max_checks),
            Direction::West => grid.next(row, col, predicate, max_checks),
            Direction::North => grid.vertical_next(row, col, predicate, max_checks),
            Direction::South => grid.vertical_prev(row, col, predicate, max_checks),
        }
    }

    /// Move the occupant of the center by `displacement`
    ///
    /// The origin must be occupied and the destination must be free and in
    /// bounds. A still displacement does nothing.
    pub fn move_by(&mut self, grid: &mut Grid, displacement: Displacement) -> Result<(), GridError> {
        if displacement.is_still() {
            return Ok(());
        }

        let origin = self.center;
        let target = self.point(displacement);
        if !grid.is_filled(origin.row, origin.col) {
            return Err(GridError::Empty {
                row: origin.row,
                col: origin.col,
            });
        }
        if !self.is_inbounds(grid, displacement) {
            return Err(GridError::OutOfBounds {
                row: target.row,
                col: target.col,
            });
        }
        if let Some(occupant) = grid.occupant(target.row, target.col) {
            return Err(GridError::Occupied {
                row: target.row,
                col: target.col,
                occupant,
            });
        }

        let me = grid.clear(origin.row, origin.col)?;
        grid.fill(target.row, target.col, me)?;
        self.center = target;
        Ok(())
    }

    /// Move by `displacement`, shrinking it toward zero while the destination is taken
    ///
    /// Returns the displacement actually applied, which is still when every
    /// intermediate cell was blocked.
    pub fn move_decelerating(
        &mut self,
        grid: &mut Grid,
        mut displacement: Displacement,
    ) -> Result<Displacement, GridError> {
        while !displacement.is_still() && self.is_filled(grid, displacement) {
            displacement.decrease();
        }
        self.move_by(grid, displacement)?;
        Ok(displacement)
    }

    /// Shift the center without touching the grid. Callers that move several
    /// cells at once clear and refill the grid themselves.
    pub(crate) fn recenter(&mut self, displacement: Displacement) {
        self.center = self.point(displacement);
    }
}
