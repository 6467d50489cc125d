//! Playback of one blast: removed tiles burst, then the rest fall into place.

use blasttui::{Blast, Board, Color, GridCoord, GridLayout, WorldPos};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Removal effect length.
pub const BURST: Duration = Duration::from_millis(220);
/// Fall tween length.
pub const FALL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Burst,
    Fall,
    Done,
}

/// A blast being shown. The engine's board already holds the settled result.
#[derive(Debug, Clone)]
pub struct Transition {
    blast: Blast,
    started: Instant,
}

impl Transition {
    pub fn new(blast: Blast, now: Instant) -> Self {
        Self {
            blast,
            started: now,
        }
    }

    pub fn phase(&self, now: Instant) -> Phase {
        let t = now.saturating_duration_since(self.started);
        if t < BURST {
            Phase::Burst
        } else if !self.blast.moves.is_empty() && t < BURST + FALL {
            Phase::Fall
        } else {
            Phase::Done
        }
    }

    pub fn removed(&self) -> &[(GridCoord, Color)] {
        &self.blast.removed
    }

    /// Quadratic ease-out of the fall, 0 at the start of the fall phase, 1 at its end.
    pub fn fall_progress(&self, now: Instant) -> f32 {
        let t = now.saturating_duration_since(self.started + BURST);
        let linear = (t.as_secs_f32() / FALL.as_secs_f32()).clamp(0.0, 1.0);
        1.0 - (1.0 - linear) * (1.0 - linear)
    }

    /// Tiles to draw at `now`, as (world centre, colour). During the burst this is the
    /// board as it was before the action; after the fall it is `board` itself.
    pub fn scene(&self, board: &Board, layout: &GridLayout, now: Instant) -> Vec<(WorldPos, Color)> {
        let phase = self.phase(now);
        let mut resting: HashMap<GridCoord, Color> =
            board.iter().filter_map(|(c, cell)| Some((c, cell.color()?))).collect();
        if phase == Phase::Done {
            return to_world(layout, resting);
        }

        for m in &self.blast.moves {
            resting.remove(&m.to);
        }
        if phase == Phase::Burst {
            for m in &self.blast.moves {
                resting.insert(m.from, m.color);
            }
            resting.extend(self.blast.removed.iter().copied());
            return to_world(layout, resting);
        }

        let k = self.fall_progress(now);
        let mut tiles = to_world(layout, resting);
        tiles.extend(self.blast.moves.iter().map(|m| {
            let from = layout.grid_to_world(m.from.x, m.from.y);
            let to = layout.grid_to_world(m.to.x, m.to.y);
            (WorldPos::new(to.x, from.y + (to.y - from.y) * k), m.color)
        }));
        tiles
    }
}

fn to_world(layout: &GridLayout, tiles: HashMap<GridCoord, Color>) -> Vec<(WorldPos, Color)> {
    tiles
        .into_iter()
        .map(|(c, color)| (layout.grid_to_world(c.x, c.y), color))
        .collect()
}
