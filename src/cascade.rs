//! Clearing and gravity: empty a set of cells, then let every column settle downward.

use crate::board::{Board, Cell, Color};
use crate::error::BoardError;
use crate::grid::GridCoord;

/// One tile that fell during compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMove {
    pub color: Color,
    pub from: GridCoord,
    pub to: GridCoord,
}

impl CellMove {
    /// Rows fallen.
    pub fn distance(&self) -> i32 {
        self.from.y - self.to.y
    }
}

/// Empty every coordinate in `to_clear`, then compact each column so filled cells
/// rest on the lowest free rows in their original order.
///
/// Moves are listed column by column (left to right), bottom to top within a column.
/// Every coordinate is checked before the board is touched, so an out-of-range entry
/// leaves the board unchanged. Read any colours you need from the cleared cells first.
pub fn clear_and_drop<I>(board: &mut Board, to_clear: I) -> Result<Vec<CellMove>, BoardError>
where
    I: IntoIterator<Item = GridCoord>,
{
    let to_clear: Vec<GridCoord> = to_clear.into_iter().collect();
    if let Some(bad) = to_clear.iter().find(|c| !board.contains(**c)) {
        return Err(BoardError::InvalidCoordinate {
            x: bad.x,
            y: bad.y,
            width: board.width(),
            height: board.height(),
        });
    }
    for coord in to_clear {
        board.set(coord, Cell::Empty)?;
    }
    Ok(compact(board))
}

/// Gravity pass over every column. Columns without gaps produce no moves.
pub fn compact(board: &mut Board) -> Vec<CellMove> {
    let mut moves = Vec::new();
    for x in 0..board.width() {
        let column = board.column_mut(x);
        // Rows below `landing` are filled; the first falling cell lands there.
        let mut landing = 0;
        for y in 0..column.len() {
            let Cell::Filled(color) = column[y] else {
                continue;
            };
            if y != landing {
                column[landing] = column[y];
                column[y] = Cell::Empty;
                moves.push(CellMove {
                    color,
                    from: GridCoord::new(x as i32, y as i32),
                    to: GridCoord::new(x as i32, landing as i32),
                });
            }
            landing += 1;
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color::{Blue, Green, Red, Yellow};
    use std::collections::HashSet;

    fn column(cells: &[Cell]) -> Board {
        let rows: Vec<Vec<Cell>> = cells.iter().map(|&c| vec![c]).collect();
        Board::from_rows(&rows).unwrap()
    }

    fn colours(board: &Board, x: usize) -> Vec<Color> {
        board.column(x).iter().filter_map(|c| c.color()).collect()
    }

    #[test]
    fn test_single_gap_in_column() {
        let mut board = column(&[Red.into(), Cell::Empty, Blue.into()]);
        let moves = clear_and_drop(&mut board, Vec::new()).unwrap();
        assert_eq!(
            moves,
            vec![CellMove {
                color: Blue,
                from: GridCoord::new(0, 2),
                to: GridCoord::new(0, 1),
            }]
        );
        assert_eq!(board.column(0), &[Cell::Filled(Red), Cell::Filled(Blue), Cell::Empty]);
    }

    #[test]
    fn test_empty_clear_set_is_noop() {
        let mut board = column(&[Red.into(), Green.into(), Blue.into()]);
        let before = board.clone();
        let moves = clear_and_drop(&mut board, Vec::new()).unwrap();
        assert!(moves.is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_stack_falls_in_order() {
        let mut board = column(&[
            Red.into(),
            Green.into(),
            Blue.into(),
            Yellow.into(),
            Red.into(),
        ]);
        let moves =
            clear_and_drop(&mut board, [GridCoord::new(0, 0), GridCoord::new(0, 2)]).unwrap();
        assert_eq!(colours(&board, 0), vec![Green, Yellow, Red]);
        assert_eq!(board.column(0)[3..], [Cell::Empty, Cell::Empty]);
        let falls: Vec<(i32, i32)> = moves.iter().map(|m| (m.from.y, m.to.y)).collect();
        assert_eq!(falls, vec![(1, 0), (3, 1), (4, 2)]);
        assert_eq!(moves[2].distance(), 2);
    }

    #[test]
    fn test_columns_are_independent() {
        let mut board = Board::from_rows(&[
            vec![Red.into(), Blue.into()],
            vec![Green.into(), Blue.into()],
            vec![Yellow.into(), Red.into()],
        ])
        .unwrap();
        let moves = clear_and_drop(&mut board, [GridCoord::new(0, 1)]).unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].from, GridCoord::new(0, 2));
        assert_eq!(moves[0].to, GridCoord::new(0, 1));
        assert_eq!(colours(&board, 1), vec![Blue, Blue, Red]);
    }

    #[test]
    fn test_full_clear_has_no_moves() {
        let mut board = Board::from_rows(&vec![vec![Cell::Filled(Red); 3]; 3]).unwrap();
        let all: HashSet<GridCoord> = board.iter().map(|(c, _)| c).collect();
        let moves = clear_and_drop(&mut board, all).unwrap();
        assert!(moves.is_empty());
        assert!(board.is_cleared());
    }

    #[test]
    fn test_count_and_order_preserved() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let mut board = Board::new(5, 6);
            board.fill_random(&Color::ALL[..3], &mut rng).unwrap();
            let to_clear: HashSet<GridCoord> = board
                .iter()
                .map(|(c, _)| c)
                .filter(|_| rng.gen_bool(0.3))
                .collect();

            let before = board.filled_count();
            let mut expected: Vec<Vec<Color>> = Vec::new();
            for x in 0..board.width() {
                expected.push(
                    board
                        .column(x)
                        .iter()
                        .enumerate()
                        .filter(|(y, _)| !to_clear.contains(&GridCoord::new(x as i32, *y as i32)))
                        .filter_map(|(_, c)| c.color())
                        .collect(),
                );
            }

            let moves = clear_and_drop(&mut board, to_clear.iter().copied()).unwrap();
            assert_eq!(board.filled_count(), before - to_clear.len());
            for (x, want) in expected.iter().enumerate() {
                assert_eq!(&colours(&board, x), want);
                let n = want.len();
                assert!(board.column(x)[n..].iter().all(|c| c.is_empty()));
            }
            for m in &moves {
                assert_eq!(m.from.x, m.to.x);
                assert!(m.to.y < m.from.y);
                assert_eq!(board.get(m.to), Ok(Cell::Filled(m.color)));
            }
        }
    }

    #[test]
    fn test_invalid_coordinate_leaves_board_untouched() {
        let mut board = column(&[Red.into(), Blue.into()]);
        let before = board.clone();
        let err = clear_and_drop(&mut board, [GridCoord::new(0, 0), GridCoord::new(0, 5)]);
        assert!(matches!(err, Err(BoardError::InvalidCoordinate { x: 0, y: 5, .. })));
        assert_eq!(board, before);
    }
}
