//! Console rendering of the board
//!
//! Rendering is read-only: a [`Renderer`] turns one cell into a display token
//! and [`plot`] stitches the tokens into rows.

use std::fmt::Write;

use super::config::SimConfig;
use super::entity::EntityArena;
use super::grid::Grid;
use super::types::{Point, Rectangle};

/// Turns a cell into the text drawn for it
pub trait Renderer {
    /// `occupant` is the glyph of whatever fills the cell
    fn token(&self, point: Point, occupant: Option<&str>) -> String;
}

/// Emoji board: zebra stripes on the crosswalk, hollow squares on the
/// waiting areas and the occupant's own glyph everywhere else
#[derive(Debug, Clone)]
pub struct EmojiRenderer {
    crosswalk: Rectangle,
    waiting_areas: [Rectangle; 2],
}

impl EmojiRenderer {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            crosswalk: config.crosswalk_zone(),
            waiting_areas: config.waiting_area_zones(),
        }
    }
}

impl Renderer for EmojiRenderer {
    fn token(&self, point: Point, occupant: Option<&str>) -> String {
        if let Some(glyph) = occupant {
            return glyph.to_string();
        }
        if self.waiting_areas.iter().any(|zone| zone.contains(point)) {
            "🔳".to_string()
        } else if self.crosswalk.contains(point) && point.col % 4 <= 1 {
            "⬜".to_string()
        } else {
            "⬛".to_string()
        }
    }
}

/// Draw `bounds` (the whole grid when `None`) with row and column numbers
pub fn plot(
    grid: &Grid,
    entities: &EntityArena,
    renderer: &dyn Renderer,
    bounds: Option<Rectangle>,
) -> String {
    let bounds = bounds.unwrap_or_else(|| Rectangle::new(grid.rows(), grid.cols()));
    let mut out = String::from("  ");
    for col in bounds.start_col()..=bounds.end_col() {
        let _ = write!(out, "{:2}", col);
    }
    out.push('\n');

    for row in bounds.start_row()..=bounds.end_row() {
        let _ = write!(out, "{:2}", row);
        for col in bounds.start_col()..=bounds.end_col() {
            let occupant = grid
                .occupant(row, col)
                .and_then(|id| entities.glyph(id));
            out.push_str(&renderer.token(Point::new(row, col), occupant));
        }
        out.push('\n');
    }
    out
}
