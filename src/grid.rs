//! Grid layout: mapping between integer board coordinates and world-space positions.
//!
//! The board's bounding rectangle is centred on the world origin. y = 0 is the bottom row,
//! so world y grows upward with grid y.

use crate::error::GridError;
use tracing::error;

/// Integer board coordinate. Signed so that [`GridLayout::world_to_grid`] can
/// report positions left of or below the board; check with [`GridLayout::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours: right, left, up, down. May be off the board.
    pub fn neighbours(self) -> [Self; 4] {
        [
            Self::new(self.x + 1, self.y),
            Self::new(self.x - 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x, self.y - 1),
        ]
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Continuous world-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Immutable board geometry: cell counts plus tile size and the gap between tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    width: usize,
    height: usize,
    tile_size: f32,
    tile_spacing: f32,
    bottom_left: WorldPos,
    top_right: WorldPos,
}

impl GridLayout {
    pub const DEFAULT_WIDTH: usize = 9;
    pub const DEFAULT_HEIGHT: usize = 9;
    pub const DEFAULT_TILE_SIZE: f32 = 1.0;
    pub const DEFAULT_TILE_SPACING: f32 = 0.1;

    pub fn new(
        width: usize,
        height: usize,
        tile_size: f32,
        tile_spacing: f32,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        if !(tile_spacing.is_finite() && tile_spacing >= 0.0) {
            return Err(GridError::InvalidTileSpacing(tile_spacing));
        }

        Ok(Self::with_bounds(width, height, tile_size, tile_spacing))
    }

    fn with_bounds(width: usize, height: usize, tile_size: f32, tile_spacing: f32) -> Self {
        let total_width = width as f32 * tile_size + (width - 1) as f32 * tile_spacing;
        let total_height = height as f32 * tile_size + (height - 1) as f32 * tile_spacing;
        Self {
            width,
            height,
            tile_size,
            tile_spacing,
            bottom_left: WorldPos::new(-total_width * 0.5, -total_height * 0.5),
            top_right: WorldPos::new(total_width * 0.5, total_height * 0.5),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn tile_spacing(&self) -> f32 {
        self.tile_spacing
    }

    /// Distance between the left edges of two adjacent tiles.
    #[inline]
    pub fn pitch(&self) -> f32 {
        self.tile_size + self.tile_spacing
    }

    pub fn bottom_left(&self) -> WorldPos {
        self.bottom_left
    }

    pub fn top_right(&self) -> WorldPos {
        self.top_right
    }

    /// Bounding rectangle size (width, height) in world units.
    pub fn world_size(&self) -> (f32, f32) {
        (
            self.top_right.x - self.bottom_left.x,
            self.top_right.y - self.bottom_left.y,
        )
    }

    #[inline]
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.is_valid(coord.x, coord.y)
    }

    /// Centre of the tile at (x, y). An invalid coordinate is logged and maps to the
    /// world origin.
    pub fn grid_to_world(&self, x: i32, y: i32) -> WorldPos {
        if !self.is_valid(x, y) {
            error!(x, y, "invalid grid position");
            return WorldPos::ORIGIN;
        }
        let half = self.tile_size * 0.5;
        WorldPos::new(
            self.bottom_left.x + x as f32 * self.pitch() + half,
            self.bottom_left.y + y as f32 * self.pitch() + half,
        )
    }

    /// Floor of the position's offset from the bottom-left corner, in tiles.
    /// Never clamps: the result can lie outside the board.
    pub fn world_to_grid(&self, pos: WorldPos) -> GridCoord {
        let local_x = pos.x - self.bottom_left.x;
        let local_y = pos.y - self.bottom_left.y;
        GridCoord::new(
            (local_x / self.pitch()).floor() as i32,
            (local_y / self.pitch()).floor() as i32,
        )
    }

    /// Every valid coordinate, column by column from the bottom.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.width as i32)
            .flat_map(move |x| (0..self.height as i32).map(move |y| GridCoord::new(x, y)))
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::with_bounds(
            Self::DEFAULT_WIDTH,
            Self::DEFAULT_HEIGHT,
            Self::DEFAULT_TILE_SIZE,
            Self::DEFAULT_TILE_SPACING,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(w: usize, h: usize) -> GridLayout {
        GridLayout::new(w, h, 1.0, 0.1).unwrap()
    }

    #[test]
    fn test_bounds_centred_on_origin() {
        let l = layout(9, 9);
        let (w, h) = l.world_size();
        assert!((w - 9.8).abs() < 1e-5);
        assert!((h - 9.8).abs() < 1e-5);
        assert!((l.bottom_left().x + 4.9).abs() < 1e-5);
        assert!((l.top_right().y - 4.9).abs() < 1e-5);
    }

    #[test]
    fn test_default_matches_new() {
        assert_eq!(GridLayout::default(), layout(9, 9));
    }

    #[test]
    fn test_grid_to_world_bottom_left_tile() {
        let l = layout(9, 9);
        let p = l.grid_to_world(0, 0);
        assert!((p.x - (-4.9 + 0.5)).abs() < 1e-5);
        assert!((p.y - (-4.9 + 0.5)).abs() < 1e-5);
        let p = l.grid_to_world(1, 2);
        assert!((p.x - (-4.9 + 1.1 + 0.5)).abs() < 1e-5);
        assert!((p.y - (-4.9 + 2.2 + 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_grid_to_world_invalid_is_origin() {
        let l = layout(3, 3);
        assert_eq!(l.grid_to_world(3, 0), WorldPos::ORIGIN);
        assert_eq!(l.grid_to_world(0, -1), WorldPos::ORIGIN);
    }

    #[test]
    fn test_round_trip_every_tile() {
        for (w, h, size, gap) in [(9, 9, 1.0, 0.1), (4, 7, 0.5, 0.0), (1, 1, 2.0, 0.3)] {
            let l = GridLayout::new(w, h, size, gap).unwrap();
            for c in l.coords() {
                assert_eq!(l.world_to_grid(l.grid_to_world(c.x, c.y)), c);
            }
        }
    }

    #[test]
    fn test_world_to_grid_does_not_clamp() {
        let l = layout(3, 3);
        let below_left = l.world_to_grid(WorldPos::new(-100.0, -100.0));
        assert!(below_left.x < 0 && below_left.y < 0);
        assert!(!l.contains(below_left));
        let above_right = l.world_to_grid(WorldPos::new(100.0, 100.0));
        assert!(above_right.x >= 3 && above_right.y >= 3);
    }

    #[test]
    fn test_is_valid_edges() {
        let l = layout(4, 2);
        assert!(l.is_valid(0, 0));
        assert!(l.is_valid(3, 1));
        assert!(!l.is_valid(4, 1));
        assert!(!l.is_valid(3, 2));
        assert!(!l.is_valid(-1, 0));
    }

    #[test]
    fn test_rejects_bad_layouts() {
        assert_eq!(
            GridLayout::new(0, 3, 1.0, 0.0),
            Err(GridError::EmptyGrid { width: 0, height: 3 })
        );
        assert!(matches!(
            GridLayout::new(3, 3, 0.0, 0.0),
            Err(GridError::InvalidTileSize(_))
        ));
        assert!(matches!(
            GridLayout::new(3, 3, 1.0, -0.1),
            Err(GridError::InvalidTileSpacing(_))
        ));
    }
}
