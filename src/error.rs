//! Error types for the board engine.

use thiserror::Error;

/// Layout configuration that cannot describe a board.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
    #[error("tile spacing must be non-negative and finite, got {0}")]
    InvalidTileSpacing(f32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} board")]
    InvalidCoordinate {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    #[error("colour palette is empty")]
    EmptyPalette,
}

/// Errors from [`crate::Engine`] actions and configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("minimum match size must be at least 1")]
    ZeroMinMatch,
    #[error("board is {}x{} but the layout is {}x{}", board.0, board.1, layout.0, layout.1)]
    BoardSizeMismatch {
        board: (usize, usize),
        layout: (usize, usize),
    },
}

impl EngineError {
    /// True when the action only failed because it pointed outside the board.
    pub fn is_invalid_coordinate(&self) -> bool {
        matches!(self, Self::Board(BoardError::InvalidCoordinate { .. }))
    }
}
