//! Blasttui core: board simulation for a tile-blast puzzle.
//!
//! Pick a tile; if its same-coloured orthogonal group is at least the minimum match size
//! the group is removed and every column settles under gravity. One pass per action,
//! no refill. The engine reports what was removed and what fell so a front end can
//! animate it.

pub mod board;
pub mod cascade;
pub mod engine;
pub mod error;
pub mod grid;
pub mod matcher;

pub use board::{Board, Cell, Color};
pub use cascade::{CellMove, clear_and_drop};
pub use engine::{Blast, Engine, EngineConfig, NoOpReason, Outcome};
pub use error::{BoardError, EngineError, GridError};
pub use grid::{GridCoord, GridLayout, WorldPos};
pub use matcher::{MIN_MATCH_SIZE, find_connected, is_matchable};
