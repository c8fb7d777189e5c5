//! Pedestrian waiting area at one end of the crosswalk

use super::entity::{EntityArena, RoadEntity};
use super::generator::Generator;
use super::grid::{Grid, GridError};
use super::pedestrian::Pedestrian;
use super::relative_grid::RelativeView;
use super::signal::Signal;
use super::types::Displacement;

/// Queue of pedestrians waiting to step onto the crosswalk
///
/// The view's center is the first cell of the queue mouth; each lane of the
/// crosswalk is one cell to the right of the previous one.
#[derive(Debug, Clone)]
pub struct WaitingArea {
    view: RelativeView,
    waiting: u32,
    arrival_rate: f64,
    capacity: u32,
}

impl WaitingArea {
    pub fn new(arrival_rate: f64, view: RelativeView, capacity: u32) -> Self {
        Self {
            view,
            waiting: 0,
            arrival_rate,
            capacity,
        }
    }

    pub fn waiting(&self) -> u32 {
        self.waiting
    }

    pub fn view(&self) -> &RelativeView {
        &self.view
    }

    fn lanes(&self) -> i32 {
        self.view.rows()
    }

    /// Draw this tick's arrivals, turning away whoever doesn't fit
    fn generate(&mut self, rng: &mut dyn Generator) {
        if self.waiting >= self.capacity {
            return;
        }
        let arrivals = rng.poisson(self.arrival_rate);
        self.waiting += arrivals.min(self.capacity - self.waiting);
    }

    fn has_space(&self, grid: &Grid) -> bool {
        (0..self.lanes()).any(|lane| !self.view.is_filled(grid, Displacement::right(lane)))
    }

    /// Seat one pedestrian in a free lane, starting the search at a random lane
    fn place(
        &mut self,
        grid: &mut Grid,
        entities: &mut EntityArena,
        rng: &mut dyn Generator,
    ) -> Result<(), GridError> {
        let lanes = self.lanes();
        let mut lane = rng.int_range(0, lanes as usize) as i32;
        while self.view.is_filled(grid, Displacement::right(lane)) {
            lane = (lane + 1) % lanes;
        }

        let seat = Displacement::right(lane);
        let pedestrian = Pedestrian::new(self.view.displaced(seat), None, None, rng);
        let id = entities.allocate();
        self.view.fill(grid, seat, id)?;
        entities.insert(id, RoadEntity::Pedestrian(pedestrian));
        self.waiting -= 1;
        Ok(())
    }

    /// Take in arrivals and, while the walk light is on, seat as many as fit
    pub fn update(
        &mut self,
        signal: &Signal,
        grid: &mut Grid,
        entities: &mut EntityArena,
        rng: &mut dyn Generator,
    ) -> Result<(), GridError> {
        self.generate(rng);
        if signal.is_green() {
            while self.waiting > 0 && self.has_space(grid) {
                self.place(grid, entities, rng)?;
            }
        }
        Ok(())
    }
}
