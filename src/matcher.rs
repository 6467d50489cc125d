//! Connected-group search: breadth-first flood fill over same-coloured orthogonal neighbours.

use crate::board::{Board, Cell};
use crate::error::BoardError;
use crate::grid::GridCoord;
use std::collections::{HashSet, VecDeque};

/// Smallest group a selection may remove. A lone tile never pops.
pub const MIN_MATCH_SIZE: usize = 2;

/// Maximal group of cells sharing the start cell's colour, reachable through
/// up/down/left/right steps. Empty start cell gives an empty set.
pub fn find_connected(board: &Board, start: GridCoord) -> Result<HashSet<GridCoord>, BoardError> {
    let mut group = HashSet::new();
    let target = match board.get(start)? {
        Cell::Empty => return Ok(group),
        Cell::Filled(c) => c,
    };

    let mut visited = vec![false; board.width() * board.height()];
    let slot = |c: GridCoord| c.x as usize * board.height() + c.y as usize;

    let mut queue = VecDeque::new();
    visited[slot(start)] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        group.insert(current);
        for next in current.neighbours() {
            if !board.contains(next) || visited[slot(next)] {
                continue;
            }
            if board.get(next)? == Cell::Filled(target) {
                visited[slot(next)] = true;
                queue.push_back(next);
            }
        }
    }
    Ok(group)
}

/// True when a group is large enough to remove under `min_match`.
#[inline]
pub fn is_matchable(group: &HashSet<GridCoord>, min_match: usize) -> bool {
    !group.is_empty() && group.len() >= min_match
}
