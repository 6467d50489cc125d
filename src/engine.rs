//! One player action as a single transaction: validate, match, clear, drop.

use crate::board::{Board, Color};
use crate::cascade::{CellMove, clear_and_drop};
use crate::error::{BoardError, EngineError};
use crate::grid::{GridCoord, GridLayout, WorldPos};
use crate::matcher::{MIN_MATCH_SIZE, find_connected, is_matchable};
use rand::Rng;
use tracing::{debug, info, warn};

/// Board geometry, colours in play and removal threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub layout: GridLayout,
    pub palette: Vec<Color>,
    pub min_match: usize,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.palette.is_empty() {
            return Err(BoardError::EmptyPalette.into());
        }
        if self.min_match == 0 {
            return Err(EngineError::ZeroMinMatch);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: GridLayout::default(),
            palette: Color::ALL.to_vec(),
            min_match: MIN_MATCH_SIZE,
        }
    }
}

/// Result of a selection that removed a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blast {
    /// Removed cells with the colour they held, sorted by (x, y).
    pub removed: Vec<(GridCoord, Color)>,
    /// Falls, column by column, bottom to top.
    pub moves: Vec<CellMove>,
}

/// Why a selection changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    EmptyCell,
    BelowThreshold { size: usize, min: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cleared(Blast),
    NoOp(NoOpReason),
}

impl Outcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp(_))
    }
}

/// The board simulation. Owns the board exclusively; callers serialise actions.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    board: Board,
}

impl Engine {
    /// Validate `config` and deal a fully filled random board.
    pub fn new<R: Rng + ?Sized>(config: EngineConfig, rng: &mut R) -> Result<Self, EngineError> {
        config.validate()?;
        let mut board = Board::for_layout(&config.layout);
        board.fill_random(&config.palette, rng)?;
        info!(
            width = config.layout.width(),
            height = config.layout.height(),
            colors = config.palette.len(),
            min_match = config.min_match,
            "board dealt"
        );
        Ok(Self { config, board })
    }

    /// Start from an existing board (e.g. a hand-built position).
    pub fn with_board(config: EngineConfig, board: Board) -> Result<Self, EngineError> {
        config.validate()?;
        if board.width() != config.layout.width() || board.height() != config.layout.height() {
            return Err(EngineError::BoardSizeMismatch {
                board: (board.width(), board.height()),
                layout: (config.layout.width(), config.layout.height()),
            });
        }
        Ok(Self { config, board })
    }

    /// Deal a new random board over the same layout and palette.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        self.board.fill_random(&self.config.palette, rng)?;
        info!("board reset");
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layout(&self) -> &GridLayout {
        &self.config.layout
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Select the tile at `coord`: pop its group if it is large enough, then drop.
    pub fn select(&mut self, coord: GridCoord) -> Result<Outcome, EngineError> {
        if !self.config.layout.contains(coord) {
            warn!(x = coord.x, y = coord.y, "selection outside board");
        }
        let cell = self.board.get(coord)?;
        let Some(color) = cell.color() else {
            debug!(x = coord.x, y = coord.y, "selected empty cell");
            return Ok(Outcome::NoOp(NoOpReason::EmptyCell));
        };

        let group = find_connected(&self.board, coord)?;
        debug!(x = coord.x, y = coord.y, %color, size = group.len(), "selected tile");
        if !is_matchable(&group, self.config.min_match) {
            return Ok(Outcome::NoOp(NoOpReason::BelowThreshold {
                size: group.len(),
                min: self.config.min_match,
            }));
        }

        let mut removed: Vec<(GridCoord, Color)> = group.iter().map(|&c| (c, color)).collect();
        removed.sort_unstable_by_key(|(c, _)| *c);
        let moves = clear_and_drop(&mut self.board, group)?;
        info!(
            %color,
            removed = removed.len(),
            moved = moves.len(),
            remaining = self.board.filled_count(),
            "group cleared"
        );
        Ok(Outcome::Cleared(Blast { removed, moves }))
    }

    /// Select by world position: map to a grid coordinate, validate, then [`Engine::select`].
    pub fn select_world(&mut self, pos: WorldPos) -> Result<Outcome, EngineError> {
        let coord = self.config.layout.world_to_grid(pos);
        self.select(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::board::Color::{Blue, Red};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(w: usize, h: usize) -> EngineConfig {
        EngineConfig {
            layout: GridLayout::new(w, h, 1.0, 0.1).unwrap(),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_new_deals_full_board() {
        let engine = Engine::new(config(5, 4), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(engine.board().filled_count(), 20);
    }

    #[test]
    fn test_config_validation() {
        let mut cfg = config(2, 2);
        cfg.palette.clear();
        assert_eq!(cfg.validate(), Err(EngineError::Board(BoardError::EmptyPalette)));
        let mut cfg = config(2, 2);
        cfg.min_match = 0;
        assert_eq!(cfg.validate(), Err(EngineError::ZeroMinMatch));
    }

    #[test]
    fn test_with_board_checks_size() {
        let board = Board::new(3, 3);
        assert!(Engine::with_board(config(2, 2), board).is_err());
    }

    #[test]
    fn test_select_pair_drops_column() {
        let board = Board::from_rows(&[
            vec![Red.into(), Blue.into()],
            vec![Red.into(), Blue.into()],
            vec![Blue.into(), Red.into()],
        ])
        .unwrap();
        let mut engine = Engine::with_board(config(2, 3), board).unwrap();
        let outcome = engine.select(GridCoord::new(0, 1)).unwrap();
        let blast = match outcome {
            Outcome::Cleared(blast) => blast,
            other => panic!("expected a clear, got {other:?}"),
        };
        assert_eq!(
            blast.removed,
            vec![(GridCoord::new(0, 0), Red), (GridCoord::new(0, 1), Red)]
        );
        assert_eq!(
            blast.moves,
            vec![CellMove {
                color: Blue,
                from: GridCoord::new(0, 2),
                to: GridCoord::new(0, 0),
            }]
        );
        assert_eq!(engine.board().column(0), &[Cell::Filled(Blue), Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_select_world_outside_board() {
        let mut engine = Engine::new(config(3, 3), &mut StdRng::seed_from_u64(1)).unwrap();
        let err = engine.select_world(WorldPos::new(50.0, 0.0)).unwrap_err();
        assert!(err.is_invalid_coordinate());
    }

    #[test]
    fn test_reset_refills() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut engine = Engine::new(
            EngineConfig {
                palette: vec![Red],
                ..config(3, 3)
            },
            &mut rng,
        )
        .unwrap();
        engine.select(GridCoord::new(0, 0)).unwrap();
        assert!(engine.board().is_cleared());
        engine.reset(&mut rng).unwrap();
        assert_eq!(engine.board().filled_count(), 9);
    }
}
