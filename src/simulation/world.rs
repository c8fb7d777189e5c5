//! Main simulation world that ties everything together
//!
//! [`SimWorld`] owns the grid, the signal, the spawners and every entity, and
//! advances them one tick at a time.

use anyhow::{Context, Result};
use log::{debug, trace};

use super::config::SimConfig;
use super::entity::{EntityArena, MoveOutcome, RoadEntity, TickContext};
use super::generator::{Generator, SeededGenerator};
use super::grid::Grid;
use super::relative_grid::RelativeView;
use super::render::{self, Renderer};
use super::signal::Signal;
use super::types::{Direction, EntityId, Rectangle, WAITING_AREA_CAPACITY};
use super::vehicle_lane::VehicleLane;
use super::waiting_area::WaitingArea;

/// The main simulation world
pub struct SimWorld<G: Generator = SeededGenerator> {
    /// Configuration the world was built from
    pub config: SimConfig,

    /// Shared occupancy grid
    pub grid: Grid,

    /// Every live pedestrian, vehicle and vehicle part
    pub entities: EntityArena,

    /// Zone where pedestrians and vehicles may meet
    pub crosswalk: Rectangle,

    /// Pedestrian signal
    pub signal: Signal,

    /// West then east waiting area
    pub waiting_areas: Vec<WaitingArea>,

    /// Lanes from west to east
    pub vehicle_lanes: Vec<VehicleLane>,

    /// Ticks simulated so far
    pub epoch: u64,

    /// Conflicts recorded so far
    pub conflicts: u64,

    rng: G,
}

impl SimWorld<SeededGenerator> {
    /// Create a world driven by a seeded generator
    pub fn new_with_seed(config: SimConfig, seed: u64) -> Result<Self> {
        Self::new(config, SeededGenerator::new(seed))
    }
}

impl<G: Generator> SimWorld<G> {
    pub fn new(config: SimConfig, rng: G) -> Result<Self> {
        config.validate().context("invalid simulation layout")?;
        let timing = config.signal;
        let signal = Signal::new(timing.cycle, timing.green, timing.yellow)
            .context("invalid signal timing")?;

        let grid = Grid::new(config.total_rows(), config.total_cols());
        let crosswalk = config.crosswalk_zone();
        debug!(
            "Building {}x{} world, crosswalk rows {}..={} cols {}..={}",
            grid.rows(),
            grid.cols(),
            crosswalk.start_row(),
            crosswalk.end_row(),
            crosswalk.start_col(),
            crosswalk.end_col()
        );

        let waiting_areas = Self::build_waiting_areas(&config);
        let vehicle_lanes = Self::build_vehicle_lanes(&config);

        Ok(Self {
            config,
            grid,
            entities: EntityArena::new(),
            crosswalk,
            signal,
            waiting_areas,
            vehicle_lanes,
            epoch: 0,
            conflicts: 0,
            rng,
        })
    }

    fn build_waiting_areas(config: &SimConfig) -> Vec<WaitingArea> {
        let walking_zone = config.walking_zone();
        let west = RelativeView::new(walking_zone.upper_left, walking_zone, Direction::East);
        let east = RelativeView::new(walking_zone.lower_right, walking_zone, Direction::West);

        vec![
            WaitingArea::new(config.pedestrian_arrival_rate, west, WAITING_AREA_CAPACITY),
            WaitingArea::new(config.pedestrian_arrival_rate, east, WAITING_AREA_CAPACITY),
        ]
    }

    fn build_vehicle_lanes(config: &SimConfig) -> Vec<VehicleLane> {
        let lanes = config.vehicle_lanes();
        let lane_cols = config.vehicle_lane.cols();

        (0..lanes)
            .map(|i| {
                let zone = config
                    .vehicle_lane
                    .shifted(0, config.waiting_area.cols() + i * lane_cols);

                // Western lanes drive south, eastern lanes drive north.
                let (facing, origin) = if i < lanes / 2 {
                    (Direction::South, zone.upper_right())
                } else {
                    (Direction::North, zone.lower_left())
                };

                let turning = i == 0 || i == lanes - 1;
                VehicleLane::new(
                    RelativeView::new(origin, zone, facing),
                    config.vehicle,
                    config.vehicle_arrival_rate,
                    turning,
                )
            })
            .collect()
    }

    /// Advance one tick and return the number of conflicts it produced
    pub fn tick(&mut self) -> Result<u32> {
        self.signal.update();

        for area in &mut self.waiting_areas {
            area.update(&self.signal, &mut self.grid, &mut self.entities, &mut self.rng)
                .with_context(|| format!("placing pedestrians at epoch {}", self.epoch))?;
        }

        // Everyone decides against the same snapshot before anyone moves.
        for id in self.visiting_order() {
            self.think_entity(id);
        }

        let mut conflicts = 0;
        for id in self.visiting_order() {
            if self.move_entity(id)? == MoveOutcome::Conflict {
                conflicts += 1;
            }
        }

        for lane in &mut self.vehicle_lanes {
            lane.update(&mut self.grid, &mut self.entities, &mut self.rng)
                .with_context(|| format!("placing vehicles at epoch {}", self.epoch))?;
        }

        if conflicts > 0 {
            debug!("Epoch {}: {} conflict(s)", self.epoch, conflicts);
        }
        self.epoch += 1;
        self.conflicts += u64::from(conflicts);
        Ok(conflicts)
    }

    /// Every entity on the grid right now, in random order
    fn visiting_order(&mut self) -> Vec<EntityId> {
        let mut order = Vec::with_capacity(self.grid.occupied_count());
        self.grid.apply_randomized(&mut self.rng, |id| order.push(id));
        order
    }

    /// Tick until `epoch` is reached. Does nothing if it already has been.
    pub fn advance_to(&mut self, epoch: u64) -> Result<()> {
        while self.epoch < epoch {
            self.tick()?;
        }
        Ok(())
    }

    /// Run the think phase for one entity
    ///
    /// The entity is taken out of the arena while it thinks so it can read
    /// everybody else. Parts and missing handles are ignored.
    pub fn think_entity(&mut self, id: EntityId) {
        let Some(mut entity) = self.entities.remove(id) else {
            return;
        };

        let ctx = TickContext {
            grid: &self.grid,
            entities: &self.entities,
            signal: &self.signal,
            crosswalk: &self.crosswalk,
        };
        match &mut entity {
            RoadEntity::Pedestrian(pedestrian) => pedestrian.think(&ctx, &mut self.rng),
            RoadEntity::Vehicle(vehicle) => vehicle.think(&ctx),
            RoadEntity::VehiclePart(_) => {}
        }

        self.entities.insert(id, entity);
    }

    /// Run the move phase for one entity
    ///
    /// Entities that exit are dropped from the arena together with any parts.
    pub fn move_entity(&mut self, id: EntityId) -> Result<MoveOutcome> {
        let Some(mut entity) = self.entities.remove(id) else {
            return Ok(MoveOutcome::Held);
        };

        let outcome = match &mut entity {
            RoadEntity::Pedestrian(pedestrian) => pedestrian.advance(&mut self.grid, &self.crosswalk),
            RoadEntity::Vehicle(vehicle) => {
                vehicle.advance(&mut self.grid, &self.entities, &self.crosswalk)
            }
            RoadEntity::VehiclePart(_) => Ok(MoveOutcome::Held),
        }
        .with_context(|| format!("moving {} at epoch {}", id, self.epoch))?;

        if outcome == MoveOutcome::Exited {
            trace!("{} left the simulation at epoch {}", id, self.epoch);
            if let RoadEntity::Vehicle(vehicle) = &entity {
                for part in vehicle.part_ids() {
                    self.entities.remove(part);
                }
            }
        } else {
            self.entities.insert(id, entity);
        }
        Ok(outcome)
    }

    /// Draw the board (the whole grid when `bounds` is `None`)
    pub fn render(&self, renderer: &dyn Renderer, bounds: Option<Rectangle>) -> String {
        render::plot(&self.grid, &self.entities, renderer, bounds)
    }

    /// One-paragraph status report
    pub fn summary(&self) -> String {
        let waiting: Vec<String> = self
            .waiting_areas
            .iter()
            .map(|area| area.waiting().to_string())
            .collect();
        format!(
            "Epoch: {}\nConflicts: {}\nSignal: {}\nPedestrians: {}, Vehicles: {}\nWaiting (west, east): {}",
            self.epoch,
            self.conflicts,
            self.signal,
            self.entities.pedestrian_count(),
            self.entities.vehicle_count(),
            waiting.join(", ")
        )
    }

    /// Print the summary to stdout
    pub fn print_summary(&self) {
        println!("{}", self.summary());
    }

    /// Print the whole board to stdout
    pub fn draw_map(&self, renderer: &dyn Renderer) {
        print!("{}", self.render(renderer, None));
    }
}
