//! Pedestrian decision and movement logic

use super::entity::{EntityArena, MoveOutcome, TickContext};
use super::generator::Generator;
use super::grid::{Grid, GridError};
use super::relative_grid::RelativeView;
use super::types::{
    Direction, Displacement, EntityId, Rectangle, LATERAL_LOOKBEHIND, PEDESTRIAN_MAX_SPEED,
};

const GLYPHS: [&str; 7] = ["😀", "😁", "🙃", "🤔", "😶", "🙄", "😎"];
const HURRY_GLYPH: &str = "😰";

/// A pedestrian crossing from one waiting area to the other
#[derive(Debug, Clone)]
pub struct Pedestrian {
    view: RelativeView,
    desired: Displacement,
    crossing: bool,
    velocity: i32,
    glyph: &'static str,
}

impl Pedestrian {
    /// Create a pedestrian at the view's center
    ///
    /// Velocity and glyph are drawn from `rng` when not given, in that order.
    pub fn new(
        view: RelativeView,
        velocity: Option<i32>,
        glyph: Option<&'static str>,
        rng: &mut dyn Generator,
    ) -> Self {
        let velocity = velocity.unwrap_or_else(|| sample_velocity(rng));
        let glyph = glyph.unwrap_or_else(|| GLYPHS[rng.int_range(0, GLYPHS.len())]);
        Self {
            view,
            desired: Displacement::STILL,
            crossing: false,
            velocity,
            glyph,
        }
    }

    pub fn view(&self) -> &RelativeView {
        &self.view
    }

    pub fn facing(&self) -> Direction {
        self.view.facing()
    }

    pub fn is_crossing(&self) -> bool {
        self.crossing
    }

    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    pub fn glyph(&self) -> &'static str {
        self.glyph
    }

    /// Displacement chosen in the last think phase
    pub fn desired(&self) -> Displacement {
        self.desired
    }

    fn hurry(&mut self) {
        self.velocity = PEDESTRIAN_MAX_SPEED;
        self.glyph = HURRY_GLYPH;
    }

    /// Choose this tick's displacement
    pub fn think(&mut self, ctx: &TickContext<'_>, rng: &mut dyn Generator) {
        if ctx.signal.is_yellow_after_green() {
            if !self.crossing {
                self.desired = Displacement::STILL;
                return;
            }
            self.hurry();
        }

        if ctx.signal.is_red() {
            if !self.view.is_in(ctx.crosswalk) {
                self.desired = Displacement::STILL;
                return;
            }
            self.hurry();
        }

        if self.can_move_forward(ctx.grid, ctx.entities) {
            self.desired = self.forward_displacement(ctx.grid, ctx.entities);
            return;
        }

        let left = self.can_move_sideways(ctx.grid, ctx.entities, Displacement::left(1));
        let right = self.can_move_sideways(ctx.grid, ctx.entities, Displacement::right(1));
        self.desired = match (left, right) {
            (true, false) => Displacement::left(1),
            (false, true) => Displacement::right(1),
            (true, true) if rng.uniform() > 0.5 => Displacement::left(1),
            (true, true) => Displacement::right(1),
            (false, false) => Displacement::STILL,
        };
    }

    /// Same-direction pedestrians already on the crosswalk
    fn is_leader(&self, entities: &EntityArena, id: EntityId) -> bool {
        entities
            .pedestrian(id)
            .is_some_and(|p| p.crossing && p.facing() == self.facing())
    }

    fn is_oncoming(&self, entities: &EntityArena, id: EntityId) -> bool {
        entities
            .pedestrian(id)
            .is_some_and(|p| p.crossing && p.facing() == self.facing().opposite())
    }

    fn can_move_forward(&self, grid: &Grid, entities: &EntityArena) -> bool {
        if !self.view.is_inbounds(grid, Displacement::forward(1)) {
            return true;
        }
        self.view
            .distance_to_next(
                grid,
                Displacement::STILL,
                |id| self.is_leader(entities, id),
                Some(1),
            )
            .is_none()
    }

    fn forward_displacement(&self, grid: &Grid, entities: &EntityArena) -> Displacement {
        let gap = self.view.distance_to_next(
            grid,
            Displacement::STILL,
            |id| self.is_leader(entities, id),
            None,
        );
        match gap {
            Some(gap) if gap <= self.velocity => Displacement::forward(gap),
            _ => Displacement::forward(self.velocity),
        }
    }

    /// Lane change toward `side` (one cell left or right)
    fn can_move_sideways(&self, grid: &Grid, entities: &EntityArena, side: Displacement) -> bool {
        if !self.view.is_filled(grid, Displacement::forward(1)) {
            return false;
        }
        if !self.view.is_inbounds(grid, side) || self.view.is_filled(grid, side) {
            return false;
        }

        let oncoming = self.view.distance_to_next(
            grid,
            side,
            |id| self.is_oncoming(entities, id),
            Some(self.velocity),
        );
        if oncoming.is_some() {
            return false;
        }

        // Never cut in front of a follower that is at least as fast.
        match self.view.prev(
            grid,
            side,
            |id| self.is_leader(entities, id),
            Some(LATERAL_LOOKBEHIND),
        ) {
            None => true,
            Some(follower) => entities
                .pedestrian(follower)
                .is_some_and(|p| p.velocity < self.velocity),
        }
    }

    /// Carry out the displacement chosen in [`think`](Self::think)
    ///
    /// Leaving the walking area or stepping off the crosswalk removes the
    /// pedestrian from the grid. Pedestrians never report conflicts.
    pub fn advance(&mut self, grid: &mut Grid, crosswalk: &Rectangle) -> Result<MoveOutcome, GridError> {
        if !self.view.is_inbounds(grid, self.desired) {
            self.view.clear(grid, Displacement::STILL)?;
            return Ok(MoveOutcome::Exited);
        }

        if self.desired.is_still() {
            return Ok(MoveOutcome::Held);
        }

        self.crossing = true;
        if !self.view.displaced(self.desired).is_in(crosswalk) {
            self.view.clear(grid, Displacement::STILL)?;
            return Ok(MoveOutcome::Exited);
        }

        let taken = self.view.move_decelerating(grid, self.desired)?;
        self.desired = taken;
        if taken.is_still() {
            Ok(MoveOutcome::Held)
        } else {
            Ok(MoveOutcome::Moved)
        }
    }
}

/// Walking speed, skewed toward the slower end
fn sample_velocity(rng: &mut dyn Generator) -> i32 {
    let n = rng.uniform();
    if n > 0.978 {
        6
    } else if n > 0.93 {
        5
    } else if n > 0.793 {
        4
    } else if n > 0.273 {
        3
    } else {
        2
    }
}
