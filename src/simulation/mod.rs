//! Crosswalk simulation module
//!
//! Cellular-automaton model of one signalized crosswalk: pedestrians walk
//! across a striped zone while vehicles drive through it, and every time a
//! vehicle is committed into space a pedestrian has claimed a conflict is
//! counted. Everything here runs headless and single-threaded.

mod config;
mod entity;
mod generator;
mod grid;
mod pedestrian;
mod relative_grid;
mod render;
mod signal;
mod types;
mod vehicle;
mod vehicle_lane;
mod waiting_area;
mod world;

pub use config::{Layout, SignalTiming, SimConfig, TICKS_PER_HOUR, WAITING_AREAS};
pub use entity::{EntityArena, MoveOutcome, RoadEntity, TickContext};
pub use generator::{Generator, SeededGenerator};
pub use grid::{take_random, Grid, GridError};
pub use pedestrian::Pedestrian;
pub use relative_grid::RelativeView;
pub use render::{plot, EmojiRenderer, Renderer};
pub use signal::{Signal, SignalError, SignalState};
pub use types::{
    Direction, Displacement, EntityId, Point, Rectangle, LATERAL_LOOKBEHIND, PEDESTRIAN_MAX_SPEED,
    VEHICLE_SPEED, WAITING_AREA_CAPACITY,
};
pub use vehicle::{Vehicle, VehiclePart};
pub use vehicle_lane::VehicleLane;
pub use waiting_area::WaitingArea;
pub use world::SimWorld;
