//! Vehicle lane feeding cars toward the crosswalk

use super::entity::EntityArena;
use super::generator::Generator;
use super::grid::{Grid, GridError};
use super::relative_grid::RelativeView;
use super::types::{Displacement, EntityId, Rectangle};
use super::vehicle::Vehicle;

/// Spawner at the upstream end of one lane
#[derive(Debug, Clone)]
pub struct VehicleLane {
    view: RelativeView,
    vehicle: Rectangle,
    arrival_rate: f64,
    waiting: u32,
    turning: bool,
}

impl VehicleLane {
    /// `view` is centered on the lane mouth's rear-left cell; `vehicle` is the
    /// footprint of every vehicle this lane spawns
    pub fn new(view: RelativeView, vehicle: Rectangle, arrival_rate: f64, turning: bool) -> Self {
        Self {
            view,
            vehicle,
            arrival_rate,
            waiting: 0,
            turning,
        }
    }

    pub fn waiting(&self) -> u32 {
        self.waiting
    }

    pub fn is_turning(&self) -> bool {
        self.turning
    }

    pub fn view(&self) -> &RelativeView {
        &self.view
    }

    /// Columns between the lane edge and a centered vehicle
    fn offset(&self) -> i32 {
        (self.view.cols() - self.vehicle.cols()) / 2
    }

    /// Whether every cell a new vehicle would cover is free
    pub fn can_place(&self, grid: &Grid) -> bool {
        let offset = self.offset();
        (0..self.vehicle.cols()).all(|i| {
            (0..self.vehicle.rows())
                .all(|j| !self.view.is_filled(grid, Displacement::new(j, offset + i)))
        })
    }

    /// Spawn one waiting vehicle, centered in the lane, if there is room
    fn place(
        &mut self,
        grid: &mut Grid,
        entities: &mut EntityArena,
        rng: &mut dyn Generator,
    ) -> Result<Option<EntityId>, GridError> {
        if self.waiting == 0 || !self.can_place(grid) {
            return Ok(None);
        }

        let origin = self.view.displaced(Displacement::right(self.offset()));
        let id = Vehicle::spawn(&origin, &self.vehicle, self.turning, grid, entities, rng)?;
        self.waiting -= 1;
        Ok(Some(id))
    }

    /// Draw this tick's arrivals and release at most one vehicle
    pub fn update(
        &mut self,
        grid: &mut Grid,
        entities: &mut EntityArena,
        rng: &mut dyn Generator,
    ) -> Result<Option<EntityId>, GridError> {
        self.waiting += rng.poisson(self.arrival_rate);
        self.place(grid, entities, rng)
    }
}
