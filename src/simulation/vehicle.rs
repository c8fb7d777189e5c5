//! Vehicle decision and movement logic
//!
//! A vehicle covers a `width x length` block of cells. The front-left cell is
//! the driver and makes every decision; the other cells hold [`VehiclePart`]
//! handles that point back at the driver.

use super::entity::{EntityArena, MoveOutcome, RoadEntity, TickContext};
use super::generator::Generator;
use super::grid::{Grid, GridError};
use super::relative_grid::RelativeView;
use super::types::{Direction, Displacement, EntityId, Rectangle, VEHICLE_SPEED};

const GLYPHS: [&str; 7] = ["🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "🟫"];

#[derive(Debug, Clone)]
pub struct Vehicle {
    glyph: &'static str,
    velocity: i32,
    crossing: bool,
    desired: Displacement,
    width: i32,
    length: i32,
    driver: RelativeView,
    parts: Vec<(EntityId, RelativeView)>,
    turning: bool,
}

impl Vehicle {
    /// Build a vehicle whose rear-left cell sits at `origin` and put it on the grid
    ///
    /// `prototype` gives the footprint: its columns are the width and its
    /// rows the length. Returns the driver's handle.
    pub fn spawn(
        origin: &RelativeView,
        prototype: &Rectangle,
        turning: bool,
        grid: &mut Grid,
        entities: &mut EntityArena,
        rng: &mut dyn Generator,
    ) -> Result<EntityId, GridError> {
        let glyph = GLYPHS[rng.int_range(0, GLYPHS.len())];
        let width = prototype.cols();
        let length = prototype.rows();

        let driver_id = entities.allocate();
        let driver = origin.displaced(Displacement::forward(length - 1));
        let mut parts = Vec::new();
        for i in 0..width {
            for j in 0..length {
                if i == 0 && j == length - 1 {
                    continue;
                }
                let view = origin.displaced(Displacement::right(i) + Displacement::forward(j));
                parts.push((entities.allocate(), view));
            }
        }

        driver.fill(grid, Displacement::STILL, driver_id)?;
        for (part_id, view) in &parts {
            view.fill(grid, Displacement::STILL, *part_id)?;
            entities.insert(
                *part_id,
                RoadEntity::VehiclePart(VehiclePart {
                    parent: driver_id,
                    facing: view.facing(),
                }),
            );
        }

        entities.insert(
            driver_id,
            RoadEntity::Vehicle(Vehicle {
                glyph,
                velocity: VEHICLE_SPEED,
                crossing: false,
                desired: Displacement::STILL,
                width,
                length,
                driver,
                parts,
                turning,
            }),
        );
        Ok(driver_id)
    }

    pub fn facing(&self) -> Direction {
        self.driver.facing()
    }

    pub fn is_crossing(&self) -> bool {
        self.crossing
    }

    pub fn is_turning(&self) -> bool {
        self.turning
    }

    pub fn glyph(&self) -> &'static str {
        self.glyph
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn driver(&self) -> &RelativeView {
        &self.driver
    }

    pub fn desired(&self) -> Displacement {
        self.desired
    }

    /// Handles of every cell except the driver's
    pub fn part_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.parts.iter().map(|(id, _)| *id)
    }

    /// Anything at all within `velocity` cells ahead, across the full width
    fn is_entity_ahead(&self, grid: &Grid) -> bool {
        (0..self.width).any(|i| {
            self.driver
                .next(grid, Displacement::right(i), |_| true, Some(self.velocity))
                .is_some()
        })
    }

    /// Whether the nearest thing ahead in any column is a pedestrian
    fn is_pedestrian_ahead(&self, grid: &Grid, entities: &EntityArena) -> bool {
        (0..self.width).any(|i| {
            self.driver
                .next(grid, Displacement::right(i), |_| true, Some(self.velocity))
                .is_some_and(|id| entities.is_pedestrian(id))
        })
    }

    /// Choose this tick's displacement
    pub fn think(&mut self, ctx: &TickContext<'_>) {
        let blocked = self.is_entity_ahead(ctx.grid);
        let go = if self.turning {
            !blocked
        } else if blocked || (ctx.signal.is_green() && !self.crossing) {
            // Straight lanes wait out the walk phase before committing.
            false
        } else {
            self.crossing || ctx.signal.is_red()
        };

        self.desired = if go {
            Displacement::forward(self.velocity)
        } else {
            Displacement::STILL
        };
    }

    /// Carry out the displacement chosen in [`think`](Self::think)
    ///
    /// A pedestrian ahead makes the vehicle yield; if its body would already
    /// reach into the crosswalk that is reported as a conflict. Driving past
    /// the lane end removes the whole vehicle.
    pub fn advance(
        &mut self,
        grid: &mut Grid,
        entities: &EntityArena,
        crosswalk: &Rectangle,
    ) -> Result<MoveOutcome, GridError> {
        if self.desired.is_still() {
            return Ok(MoveOutcome::Held);
        }

        if self.is_pedestrian_ahead(grid, entities) {
            let intrudes = self
                .parts
                .iter()
                .any(|(_, view)| view.displaced(self.desired).is_in(crosswalk));
            return Ok(if intrudes {
                MoveOutcome::Conflict
            } else {
                MoveOutcome::Held
            });
        }

        if !self.driver.is_inbounds(grid, self.desired) {
            self.remove(grid)?;
            return Ok(MoveOutcome::Exited);
        }

        self.crossing = true;
        self.translate(grid)?;
        Ok(MoveOutcome::Moved)
    }

    /// Shift every cell by the desired displacement in one step
    fn translate(&mut self, grid: &mut Grid) -> Result<(), GridError> {
        let desired = self.desired;
        let mut cells = Vec::with_capacity(self.parts.len() + 1);
        cells.push(self.driver.clear(grid, Displacement::STILL)?);
        for (_, view) in &self.parts {
            cells.push(view.clear(grid, Displacement::STILL)?);
        }

        let views = std::iter::once(&mut self.driver).chain(self.parts.iter_mut().map(|(_, v)| v));
        for (view, id) in views.zip(cells) {
            view.fill(grid, desired, id)?;
            view.recenter(desired);
        }
        Ok(())
    }

    /// Clear the driver and every part from the grid
    pub fn remove(&self, grid: &mut Grid) -> Result<(), GridError> {
        self.driver.clear(grid, Displacement::STILL)?;
        for (_, view) in &self.parts {
            view.clear(grid, Displacement::STILL)?;
        }
        Ok(())
    }
}

/// Passive cell of a vehicle's footprint
#[derive(Debug, Clone)]
pub struct VehiclePart {
    parent: EntityId,
    facing: Direction,
}

impl VehiclePart {
    pub fn parent(&self) -> EntityId {
        self.parent
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }
}
