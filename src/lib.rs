//! Crosswalk Conflict Simulator
//!
//! Agent-based simulation of pedestrian/vehicle conflicts at a signalized
//! crosswalk, plus a parallel parameter sweep over arrival rates.

pub mod results;
pub mod simulation;
pub mod sweep;
