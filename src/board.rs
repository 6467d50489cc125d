//! Board state: a fixed width x height grid of cells, each empty or holding a colour.

use crate::error::BoardError;
use crate::grid::{GridCoord, GridLayout};
use rand::Rng;
use std::fmt;

/// Tile colours. Equality only; the order of [`Color::ALL`] is just the theme index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl Color {
    pub const ALL: [Self; 6] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Purple,
        Self::Orange,
    ];

    /// Position in [`Color::ALL`]; used to pick the theme colour.
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Yellow => 3,
            Self::Purple => 4,
            Self::Orange => 5,
        }
    }

    /// First `n` colours of [`Color::ALL`] (clamped to 1..=6).
    pub fn palette(n: usize) -> Vec<Self> {
        Self::ALL[..n.clamp(1, Self::ALL.len())].to_vec()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Orange => "orange",
        };
        f.write_str(name)
    }
}

/// Content of one board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Empty => None,
            Self::Filled(c) => Some(c),
        }
    }
}

impl From<Color> for Cell {
    fn from(c: Color) -> Self {
        Self::Filled(c)
    }
}

/// Grid of cells. y = 0 is the bottom row. Stored column-major so a column is contiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// cells[x * height + y]
    cells: Vec<Cell>,
}

impl Board {
    /// All-empty board. Zero dimensions give a board with no addressable cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn for_layout(layout: &GridLayout) -> Self {
        Self::new(layout.width(), layout.height())
    }

    /// Build from rows listed bottom to top (`rows[0]` is y = 0). None if empty or ragged.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return None;
        }
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                board.cells[x * height + y] = cell;
            }
        }
        Some(board)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> Result<usize, BoardError> {
        let (x, y) = (coord.x, coord.y);
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(BoardError::InvalidCoordinate {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x as usize * self.height + y as usize)
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.index(coord).is_ok()
    }

    pub fn get(&self, coord: GridCoord) -> Result<Cell, BoardError> {
        self.index(coord).map(|i| self.cells[i])
    }

    pub fn set(&mut self, coord: GridCoord, cell: Cell) -> Result<(), BoardError> {
        let i = self.index(coord)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Lenient lookup for drawing code: None when out of range.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.get(GridCoord::new(x, y)).ok()
    }

    /// Overwrite every cell with a colour drawn uniformly from `palette`.
    pub fn fill_random<R: Rng + ?Sized>(
        &mut self,
        palette: &[Color],
        rng: &mut R,
    ) -> Result<(), BoardError> {
        if palette.is_empty() {
            return Err(BoardError::EmptyPalette);
        }
        for cell in &mut self.cells {
            *cell = Cell::Filled(palette[rng.gen_range(0..palette.len())]);
        }
        Ok(())
    }

    /// Column `x` bottom to top. Panics if `x` is out of range.
    pub fn column(&self, x: usize) -> &[Cell] {
        &self.cells[x * self.height..(x + 1) * self.height]
    }

    pub(crate) fn column_mut(&mut self, x: usize) -> &mut [Cell] {
        &mut self.cells[x * self.height..(x + 1) * self.height]
    }

    /// Every (coordinate, cell) pair, column by column from the bottom.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, &cell)| {
            let coord = GridCoord::new((i / self.height) as i32, (i % self.height) as i32);
            (coord, cell)
        })
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.filled_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4, 3);
        assert_eq!(board.filled_count(), 0);
        assert!(board.is_cleared());
        assert_eq!(board.iter().count(), 12);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new(3, 3);
        let c = GridCoord::new(2, 1);
        board.set(c, Cell::Filled(Color::Blue)).unwrap();
        assert_eq!(board.get(c), Ok(Cell::Filled(Color::Blue)));
        assert_eq!(board.cell(2, 1), Some(Cell::Filled(Color::Blue)));
        assert_eq!(board.column(2), &[Cell::Empty, Cell::Filled(Color::Blue), Cell::Empty]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut board = Board::new(2, 2);
        let err = board.get(GridCoord::new(2, 0)).unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidCoordinate { x: 2, y: 0, width: 2, height: 2 }
        );
        assert!(board.set(GridCoord::new(0, -1), Cell::Empty).is_err());
        assert_eq!(board.cell(-1, 0), None);
    }

    #[test]
    fn test_from_rows_bottom_up() {
        use Color::{Blue, Red};
        let board = Board::from_rows(&[
            vec![Red.into(), Blue.into()],
            vec![Blue.into(), Red.into()],
        ])
        .unwrap();
        assert_eq!(board.cell(0, 0), Some(Cell::Filled(Red)));
        assert_eq!(board.cell(1, 0), Some(Cell::Filled(Blue)));
        assert_eq!(board.cell(0, 1), Some(Cell::Filled(Blue)));
        assert!(Board::from_rows(&[vec![Cell::Empty], vec![]]).is_none());
        assert!(Board::from_rows(&[]).is_none());
    }

    #[test]
    fn test_fill_random_fills_every_cell_from_palette() {
        let mut board = Board::new(9, 9);
        let palette = [Color::Red, Color::Yellow];
        board.fill_random(&palette, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(board.filled_count(), 81);
        assert!(board
            .iter()
            .all(|(_, c)| matches!(c, Cell::Filled(Color::Red | Color::Yellow))));
    }

    #[test]
    fn test_fill_random_is_deterministic_for_a_seed() {
        let mut a = Board::new(6, 5);
        let mut b = Board::new(6, 5);
        a.fill_random(&Color::ALL, &mut StdRng::seed_from_u64(42)).unwrap();
        b.fill_random(&Color::ALL, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fill_random_empty_palette() {
        let mut board = Board::new(2, 2);
        let err = board.fill_random(&[], &mut StdRng::seed_from_u64(1));
        assert_eq!(err, Err(BoardError::EmptyPalette));
        assert!(board.is_cleared());
    }

    #[test]
    fn test_palette_clamps() {
        assert_eq!(Color::palette(0), vec![Color::Red]);
        assert_eq!(Color::palette(3).len(), 3);
        assert_eq!(Color::palette(99).len(), 6);
    }
}
