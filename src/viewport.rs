//! Projection between world space and terminal cells.
//!
//! Terminal cells are roughly twice as tall as wide, so a world unit spans twice as many
//! columns as rows. Screen rows grow downward while world y grows upward.

use blasttui::{GridCoord, GridLayout, WorldPos};
use ratatui::layout::Rect;
use std::ops::Range;

/// Columns per row for a square-looking tile.
const CELL_ASPECT: f32 = 2.0;
/// Largest tile, in terminal rows.
const MAX_ROWS_PER_TILE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen rectangle covered by the board's world bounds.
    pub area: Rect,
    cols_per_unit: f32,
    rows_per_unit: f32,
    bottom_left: WorldPos,
    top_right: WorldPos,
}

impl Viewport {
    /// Largest projection that fits `avail`, centred in it. Tiles keep at least one row,
    /// so a board too big for the terminal is clipped rather than squashed to nothing.
    pub fn fit(avail: Rect, layout: &GridLayout) -> Self {
        let (world_w, world_h) = layout.world_size();
        let tile = layout.tile_size();
        let fit_rows = (avail.height as f32 / world_h).min(avail.width as f32 / (world_w * CELL_ASPECT));
        let rows_per_unit = fit_rows.clamp(1.0 / tile, MAX_ROWS_PER_TILE / tile);
        let cols_per_unit = rows_per_unit * CELL_ASPECT;

        let width = ((world_w * cols_per_unit).round() as u16).min(avail.width);
        let height = ((world_h * rows_per_unit).round() as u16).min(avail.height);
        let area = Rect {
            x: avail.x + avail.width.saturating_sub(width) / 2,
            y: avail.y + avail.height.saturating_sub(height) / 2,
            width,
            height,
        };
        Self {
            area,
            cols_per_unit,
            rows_per_unit,
            bottom_left: layout.bottom_left(),
            top_right: layout.top_right(),
        }
    }

    /// World position at the centre of screen cell (col, row). None outside the board area.
    pub fn to_world(&self, col: u16, row: u16) -> Option<WorldPos> {
        let a = self.area;
        if col < a.x || row < a.y || col >= a.x + a.width || row >= a.y + a.height {
            return None;
        }
        Some(WorldPos::new(
            self.bottom_left.x + ((col - a.x) as f32 + 0.5) / self.cols_per_unit,
            self.top_right.y - ((row - a.y) as f32 + 0.5) / self.rows_per_unit,
        ))
    }

    /// Screen columns and rows whose centres fall inside the square of side `size`
    /// centred at `centre`, clipped to the board area.
    pub fn tile_cells(&self, centre: WorldPos, size: f32) -> (Range<u16>, Range<u16>) {
        let half = size * 0.5;
        let a = self.area;

        let col_at = |wx: f32| ((wx - self.bottom_left.x) * self.cols_per_unit - 0.5).ceil();
        let cols = clip(col_at(centre.x - half), col_at(centre.x + half), a.x, a.width);

        let row_at = |wy: f32| ((self.top_right.y - wy) * self.rows_per_unit - 0.5).ceil();
        let rows = clip(row_at(centre.y + half), row_at(centre.y - half), a.y, a.height);
        (cols, rows)
    }

    /// Screen cells covered by the tile at `coord` in its resting position.
    pub fn grid_cells(&self, layout: &GridLayout, coord: GridCoord) -> (Range<u16>, Range<u16>) {
        self.tile_cells(layout.grid_to_world(coord.x, coord.y), layout.tile_size())
    }
}

fn clip(start: f32, end: f32, origin: u16, len: u16) -> Range<u16> {
    let start = start.clamp(0.0, len as f32) as u16;
    let end = end.clamp(0.0, len as f32) as u16;
    origin + start..origin + end.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big_area() -> Rect {
        Rect::new(0, 0, 200, 60)
    }

    #[test]
    fn test_fit_is_centred_and_capped() {
        let layout = GridLayout::new(3, 3, 1.0, 0.0).unwrap();
        let vp = Viewport::fit(big_area(), &layout);
        // 3 rows per tile cap, 6 columns per tile.
        assert_eq!((vp.area.width, vp.area.height), (18, 9));
        assert_eq!(vp.area.x, (200 - 18) / 2);
        assert_eq!(vp.area.y, (60 - 9) / 2);
    }

    #[test]
    fn test_click_maps_to_tile_under_it() {
        let layout = GridLayout::new(9, 9, 1.0, 0.1).unwrap();
        let vp = Viewport::fit(Rect::new(0, 0, 80, 24), &layout);
        for coord in layout.coords() {
            let (cols, rows) = vp.grid_cells(&layout, coord);
            assert!(!cols.is_empty() && !rows.is_empty(), "{coord:?} has no cells");
            for col in cols {
                for row in rows.clone() {
                    let w = vp.to_world(col, row).unwrap();
                    assert_eq!(layout.world_to_grid(w), coord);
                }
            }
        }
    }

    #[test]
    fn test_bottom_row_is_drawn_lowest() {
        let layout = GridLayout::new(2, 2, 1.0, 0.0).unwrap();
        let vp = Viewport::fit(big_area(), &layout);
        let (_, bottom) = vp.grid_cells(&layout, GridCoord::new(0, 0));
        let (_, top) = vp.grid_cells(&layout, GridCoord::new(0, 1));
        assert!(top.end <= bottom.start);
    }

    #[test]
    fn test_outside_area_is_none() {
        let layout = GridLayout::new(2, 2, 1.0, 0.0).unwrap();
        let vp = Viewport::fit(big_area(), &layout);
        assert!(vp.to_world(0, 0).is_none());
        assert!(vp.to_world(vp.area.x, vp.area.y).is_some());
        assert!(vp.to_world(vp.area.x + vp.area.width, vp.area.y).is_none());
    }
}
