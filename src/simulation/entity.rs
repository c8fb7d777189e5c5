//! Road entities and the arena that owns them
//!
//! The grid only stores [`EntityId`] handles. Every pedestrian, vehicle and
//! vehicle part lives in the [`EntityArena`], and cross references (a part
//! pointing at its vehicle) are handles into the same arena.

use std::collections::HashMap;

use super::grid::Grid;
use super::pedestrian::Pedestrian;
use super::signal::Signal;
use super::types::{Direction, EntityId, Rectangle};
use super::vehicle::{Vehicle, VehiclePart};

/// What happened to an entity during the move phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Stayed in place
    Held,
    /// Changed cells
    Moved,
    /// Left the simulation and was cleared from the grid
    Exited,
    /// A vehicle was committed into crosswalk space claimed by a pedestrian
    Conflict,
}

/// Read-only state every entity may consult while thinking
pub struct TickContext<'a> {
    pub grid: &'a Grid,
    pub entities: &'a EntityArena,
    pub signal: &'a Signal,
    pub crosswalk: &'a Rectangle,
}

/// Anything that can occupy a cell
#[derive(Debug, Clone)]
pub enum RoadEntity {
    Pedestrian(Pedestrian),
    Vehicle(Vehicle),
    VehiclePart(VehiclePart),
}

impl RoadEntity {
    pub fn is_vehicle(&self) -> bool {
        !matches!(self, RoadEntity::Pedestrian(_))
    }

    pub fn facing(&self) -> Direction {
        match self {
            RoadEntity::Pedestrian(p) => p.facing(),
            RoadEntity::Vehicle(v) => v.facing(),
            RoadEntity::VehiclePart(part) => part.facing(),
        }
    }
}

/// Owner of every live entity, keyed by the handle stored in the grid
#[derive(Debug, Default)]
pub struct EntityArena {
    entities: HashMap<EntityId, RoadEntity>,
    next_id: usize,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh handle
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: EntityId, entity: RoadEntity) {
        self.entities.insert(id, entity);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<RoadEntity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&RoadEntity> {
        self.entities.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn pedestrian(&self, id: EntityId) -> Option<&Pedestrian> {
        match self.entities.get(&id) {
            Some(RoadEntity::Pedestrian(p)) => Some(p),
            _ => None,
        }
    }

    pub fn vehicle(&self, id: EntityId) -> Option<&Vehicle> {
        match self.entities.get(&id) {
            Some(RoadEntity::Vehicle(v)) => Some(v),
            _ => None,
        }
    }

    pub fn is_pedestrian(&self, id: EntityId) -> bool {
        self.pedestrian(id).is_some()
    }

    pub fn pedestrian_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| matches!(e, RoadEntity::Pedestrian(_)))
            .count()
    }

    pub fn vehicle_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| matches!(e, RoadEntity::Vehicle(_)))
            .count()
    }

    /// Crossing flag; parts report their vehicle's flag
    pub fn is_crossing(&self, id: EntityId) -> bool {
        match self.entities.get(&id) {
            Some(RoadEntity::Pedestrian(p)) => p.is_crossing(),
            Some(RoadEntity::Vehicle(v)) => v.is_crossing(),
            Some(RoadEntity::VehiclePart(part)) => self.is_crossing(part.parent()),
            None => false,
        }
    }

    /// Display glyph; parts borrow their vehicle's glyph
    pub fn glyph(&self, id: EntityId) -> Option<&'static str> {
        match self.entities.get(&id)? {
            RoadEntity::Pedestrian(p) => Some(p.glyph()),
            RoadEntity::Vehicle(v) => Some(v.glyph()),
            RoadEntity::VehiclePart(part) => self.glyph(part.parent()),
        }
    }
}
