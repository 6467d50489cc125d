//! Layout and drawing: board panel, tiles, cursor, burst effect, sidebar.

use crate::anim::{self, Phase, Transition};
use crate::theme::Theme;
use crate::viewport::Viewport;
use blasttui::{Engine, GridCoord, WorldPos};
use blasttui::Color as TileColor;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

const SIDEBAR_WIDTH: u16 = 26;

/// Everything one frame needs, borrowed from the app.
pub struct View<'a> {
    pub engine: &'a Engine,
    pub theme: &'a Theme,
    pub transition: Option<&'a Transition>,
    pub cursor: GridCoord,
    pub status: &'a str,
    pub seed: Option<u64>,
    pub now: Instant,
}

/// Removal fade state. Created on the first burst frame, dropped when the burst ends.
#[derive(Default)]
pub struct BurstFx {
    effect: Option<Effect>,
    last_process: Option<Instant>,
}

impl BurstFx {
    pub fn clear(&mut self) {
        self.effect = None;
        self.last_process = None;
    }

    pub fn is_active(&self) -> bool {
        self.effect.is_some()
    }
}

/// Draw the board and sidebar. Returns the board's projection so clicks can be mapped back.
pub fn draw(frame: &mut Frame, view: &View, burst: &mut BurstFx) -> Viewport {
    let area = frame.area();
    frame
        .buffer_mut()
        .set_style(area, Style::default().bg(view.theme.bg));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);

    let viewport = draw_board(frame, view, chunks[0]);

    match view.transition {
        Some(tr) if tr.phase(view.now) == Phase::Burst => {
            apply_burst_effect(frame, view, tr, &viewport, burst);
        }
        _ => burst.clear(),
    }

    draw_sidebar(frame, view, chunks[1]);
    viewport
}

fn draw_board(frame: &mut Frame, view: &View, area: Rect) -> Viewport {
    let theme = view.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Blasttui ", theme.title));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let layout = view.engine.layout();
    let viewport = Viewport::fit(inner, layout);
    let tiles: Vec<(WorldPos, TileColor)> = match view.transition {
        Some(tr) => tr.scene(view.engine.board(), layout, view.now),
        None => view
            .engine
            .board()
            .iter()
            .filter_map(|(c, cell)| Some((layout.grid_to_world(c.x, c.y), cell.color()?)))
            .collect(),
    };

    let buf = frame.buffer_mut();
    for (centre, color) in tiles {
        let (cols, rows) = viewport.tile_cells(centre, layout.tile_size());
        let style = Style::default().bg(theme.tile(color));
        for x in cols {
            for y in rows.clone() {
                buf[(x, y)].set_symbol(" ").set_style(style);
            }
        }
    }

    if view.transition.is_none() {
        draw_cursor(frame, view, &viewport);
    }
    viewport
}

/// Half-block brackets on the left and right edge of the cursor tile.
fn draw_cursor(frame: &mut Frame, view: &View, viewport: &Viewport) {
    let (cols, rows) = viewport.grid_cells(view.engine.layout(), view.cursor);
    if cols.is_empty() {
        return;
    }
    let buf = frame.buffer_mut();
    let (left, right) = (cols.start, cols.end - 1);
    for y in rows {
        let bg = buf[(left, y)].bg;
        buf[(left, y)]
            .set_symbol("▌")
            .set_style(Style::default().fg(view.theme.title).bg(bg));
        if right != left {
            let bg = buf[(right, y)].bg;
            buf[(right, y)]
                .set_symbol("▐")
                .set_style(Style::default().fg(view.theme.title).bg(bg));
        }
    }
}

/// Fade the removed tiles to the background (tachyonfx), advancing by the time since the last frame.
fn apply_burst_effect(
    frame: &mut Frame,
    view: &View,
    tr: &Transition,
    viewport: &Viewport,
    burst: &mut BurstFx,
) {
    let delta = burst
        .last_process
        .map(|t| view.now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    burst.last_process = Some(view.now);

    let area = viewport.area;
    if burst.effect.is_none() {
        let layout = view.engine.layout();
        let mut cells = HashSet::new();
        for &(coord, _) in tr.removed() {
            let (cols, rows) = viewport.grid_cells(layout, coord);
            for x in cols {
                cells.extend(rows.clone().map(|y| (x, y)));
            }
        }
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            cells.contains(&(pos.x, pos.y))
        }));
        let bg = view.theme.bg;
        let burst_ms = anim::BURST.as_millis() as u32;
        let effect = fx::fade_to(bg, bg, (burst_ms, Interpolation::Linear))
            .with_filter(filter)
            .with_area(area);
        burst.effect = Some(effect);
    }

    if let Some(effect) = burst.effect.as_mut() {
        frame.render_effect(effect, area, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);
    let config = view.engine.config();
    let board = view.engine.board();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Board
            Constraint::Length(1),
            Constraint::Length(5), // Last action
            Constraint::Length(1),
            Constraint::Min(8), // Keys
        ])
        .split(area);

    let stat = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label}: "), title_style),
            Span::styled(value, fg_style),
        ])
    };

    let mut swatches = Vec::new();
    for &c in &config.palette {
        swatches.push(Span::styled("██", Style::default().fg(theme.tile(c))));
        swatches.push(Span::raw(" "));
    }
    let total = board.width() * board.height();
    let board_lines = vec![
        stat("Size", format!("{}×{}", board.width(), board.height())),
        stat("Tiles", format!("{}/{}", board.filled_count(), total)),
        stat("Min group", config.min_match.to_string()),
        stat(
            "Seed",
            view.seed.map_or_else(|| "random".to_string(), |s| s.to_string()),
        ),
        Line::from(Span::styled("Colours:", title_style)),
        Line::from(swatches),
    ];
    section(frame, " Board ", Text::from(board_lines), chunks[0], border_style, title_style);

    let last = Paragraph::new(Span::styled(view.status, fg_style)).wrap(Wrap { trim: true });
    let last_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Last ", title_style));
    last.block(last_block).render(chunks[2], frame.buffer_mut());

    let hint = |key: &str, what: &str| {
        Line::from(vec![
            Span::styled(format!("{key:<8}"), fg_style),
            Span::styled(what.to_string(), Style::default().fg(theme.inactive_fg)),
        ])
    };
    let keys = vec![
        hint("click", "pop group"),
        hint("←↓↑→", "move cursor"),
        hint("hjkl", "move cursor"),
        hint("enter", "pop group"),
        hint("n", "new board"),
        hint("q", "quit"),
    ];
    section(frame, " Keys ", Text::from(keys), chunks[4], border_style, title_style);
}

fn section(
    frame: &mut Frame,
    title: &str,
    body: Text,
    area: Rect,
    border_style: Style,
    title_style: Style,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title.to_string(), title_style));
    Paragraph::new(body).block(block).render(area, frame.buffer_mut());
}
