//! Scenario configuration
//!
//! [`SimConfig`] is the immutable description a [`SimWorld`](super::SimWorld)
//! is built from. It is normally derived from a [`Layout`] plus hourly
//! arrival rates.

use anyhow::{bail, Result};

use super::types::Rectangle;

/// Seconds (ticks) per hour, used to turn hourly rates into per-tick rates
pub const TICKS_PER_HOUR: f64 = 3600.0;

/// Number of waiting areas sharing the pedestrian demand
pub const WAITING_AREAS: f64 = 2.0;

/// Dimensions of the intersection, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub crosswalk_rows: i32,
    pub crosswalk_cols: i32,
    pub waiting_area_cols: i32,
    pub vehicle_lanes: i32,
    pub vehicle_rows: i32,
    pub vehicle_cols: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            crosswalk_rows: 6,
            crosswalk_cols: 42,
            waiting_area_cols: 1,
            vehicle_lanes: 6,
            vehicle_rows: 6,
            vehicle_cols: 5,
        }
    }
}

/// Signal timing, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalTiming {
    pub cycle: u32,
    pub green: u32,
    pub yellow: u32,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            cycle: 90,
            green: 50,
            yellow: 5,
        }
    }
}

/// Everything needed to build one simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub crosswalk: Rectangle,
    pub vehicle_lane: Rectangle,
    pub waiting_area: Rectangle,
    pub vehicle: Rectangle,
    pub signal: SignalTiming,
    /// Mean pedestrian arrivals per tick at each waiting area
    pub pedestrian_arrival_rate: f64,
    /// Mean vehicle arrivals per tick at each lane
    pub vehicle_arrival_rate: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_layout(Layout::default(), SignalTiming::default())
            .with_hourly_rates(2000.0, 1400.0)
    }
}

impl SimConfig {
    /// Derive the zone prototypes from a layout. Arrival rates start at zero.
    pub fn from_layout(layout: Layout, signal: SignalTiming) -> Self {
        let lane_cols = if layout.vehicle_lanes > 0 {
            layout.crosswalk_cols / layout.vehicle_lanes
        } else {
            0
        };
        let crosswalk = Rectangle::new(layout.crosswalk_rows, layout.crosswalk_cols);
        Self {
            crosswalk,
            vehicle_lane: Rectangle::new(2 * layout.vehicle_rows + crosswalk.rows(), lane_cols),
            waiting_area: Rectangle::new(layout.crosswalk_rows, layout.waiting_area_cols),
            vehicle: Rectangle::new(layout.vehicle_rows, layout.vehicle_cols),
            signal,
            pedestrian_arrival_rate: 0.0,
            vehicle_arrival_rate: 0.0,
        }
    }

    /// Set arrival rates from whole-intersection hourly volumes
    ///
    /// Pedestrian volume is split between the two waiting areas and vehicle
    /// volume between the lanes.
    pub fn with_hourly_rates(mut self, pedestrians_per_hour: f64, vehicles_per_hour: f64) -> Self {
        self.pedestrian_arrival_rate = pedestrians_per_hour / (WAITING_AREAS * TICKS_PER_HOUR);
        self.vehicle_arrival_rate =
            vehicles_per_hour / (self.vehicle_lanes().max(1) as f64 * TICKS_PER_HOUR);
        self
    }

    pub fn total_rows(&self) -> i32 {
        self.vehicle_lane.rows()
    }

    pub fn total_cols(&self) -> i32 {
        self.crosswalk.cols() + 2 * self.waiting_area.cols()
    }

    pub fn vehicle_lanes(&self) -> i32 {
        if self.vehicle_lane.cols() > 0 {
            self.crosswalk.cols() / self.vehicle_lane.cols()
        } else {
            0
        }
    }

    /// Crosswalk zone in absolute grid coordinates
    pub fn crosswalk_zone(&self) -> Rectangle {
        self.crosswalk
            .shifted(self.vehicle.rows(), self.waiting_area.cols())
    }

    /// Rows pedestrians may walk: the crosswalk plus the waiting columns
    pub fn walking_zone(&self) -> Rectangle {
        let zone = if self.waiting_area.cols() > 0 {
            Rectangle::new(self.crosswalk.rows(), self.crosswalk.cols() + 2)
                .shifted(0, self.waiting_area.cols() - 1)
        } else {
            Rectangle::new(self.crosswalk.rows(), self.crosswalk.cols())
        };
        zone.shifted(self.vehicle.rows(), 0)
    }

    /// Waiting area zones, west first, in absolute coordinates
    pub fn waiting_area_zones(&self) -> [Rectangle; 2] {
        let west = self.waiting_area.shifted(self.vehicle.rows(), 0);
        let east = self.waiting_area.shifted(
            self.vehicle.rows(),
            self.waiting_area.cols() + self.crosswalk.cols(),
        );
        [west, east]
    }

    /// Reject layouts the simulation cannot run
    pub fn validate(&self) -> Result<()> {
        if self.crosswalk.rows() < 1 || self.crosswalk.cols() < 1 {
            bail!("crosswalk must have at least one row and one column");
        }
        if self.vehicle.rows() < 1 || self.vehicle.cols() < 1 {
            bail!("vehicles must be at least one cell long and wide");
        }
        if self.waiting_area.cols() < 0 {
            bail!("waiting area columns cannot be negative");
        }
        if self.vehicle_lanes() < 1 {
            bail!("the crosswalk needs at least one vehicle lane");
        }
        if self.vehicle.cols() > self.vehicle_lane.cols() {
            bail!(
                "vehicles ({} cells wide) do not fit in lanes {} cells wide",
                self.vehicle.cols(),
                self.vehicle_lane.cols()
            );
        }
        if self.pedestrian_arrival_rate < 0.0 || self.vehicle_arrival_rate < 0.0 {
            bail!("arrival rates cannot be negative");
        }
        Ok(())
    }
}
