//! App: terminal init, main loop, key and mouse handling.

use crate::Args;
use crate::anim::{Phase, Transition};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, BurstFx, View};
use crate::viewport::Viewport;
use anyhow::Result;
use blasttui::{Engine, EngineConfig, EngineError, GridCoord, NoOpReason, Outcome, WorldPos};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Redraw interval while idle or animating (~60 FPS).
const FRAME: Duration = Duration::from_millis(16);

pub struct App {
    engine: Engine,
    theme: Theme,
    rng: StdRng,
    seed: Option<u64>,
    animate: bool,
    cursor: GridCoord,
    /// Blast being played back; the engine's board is already settled.
    transition: Option<Transition>,
    burst: BurstFx,
    /// Board projection from the last frame, for mapping clicks.
    viewport: Option<Viewport>,
    status: String,
}

impl App {
    pub fn new(args: &Args, config: EngineConfig, theme: Theme) -> Result<Self> {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let engine = Engine::new(config, &mut rng)?;
        info!(seed = ?args.seed, animate = !args.no_animation, "session started");
        Ok(Self {
            engine,
            theme,
            rng,
            seed: args.seed,
            animate: !args.no_animation,
            cursor: GridCoord::new(0, 0),
            transition: None,
            burst: BurstFx::default(),
            viewport: None,
            status: "Click a group of two or more.".to_string(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal = DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        info!("session ended");

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            if self
                .transition
                .as_ref()
                .is_some_and(|t| t.phase(now) == Phase::Done)
            {
                self.transition = None;
            }

            let view = View {
                engine: &self.engine,
                theme: &self.theme,
                transition: self.transition.as_ref(),
                cursor: self.cursor,
                status: &self.status,
                seed: self.seed,
                now,
            };
            let burst = &mut self.burst;
            let mut viewport = None;
            terminal.draw(|f| viewport = Some(ui::draw(f, &view, burst)))?;
            self.viewport = viewport;

            let timeout = FRAME.saturating_sub(now.elapsed());
            if !event::poll(timeout)? {
                continue;
            }
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let action = key_to_action(key);
                        if action == Action::Quit {
                            return Ok(());
                        }
                        self.apply_action(action, Instant::now())?;
                    }
                    Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                        self.click(mouse.column, mouse.row, Instant::now())?;
                    }
                    _ => {}
                }
            }
        }
    }

    /// True while a blast is still playing; selections are ignored until it finishes.
    fn busy(&self, now: Instant) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|t| t.phase(now) != Phase::Done)
    }

    fn apply_action(&mut self, action: Action, now: Instant) -> Result<()> {
        match action {
            Action::CursorLeft => self.move_cursor(-1, 0),
            Action::CursorRight => self.move_cursor(1, 0),
            Action::CursorUp => self.move_cursor(0, 1),
            Action::CursorDown => self.move_cursor(0, -1),
            Action::Select => {
                if !self.busy(now) {
                    let result = self.engine.select(self.cursor);
                    self.settle(result, now)?;
                }
            }
            Action::NewBoard => {
                if !self.busy(now) {
                    self.engine.reset(&mut self.rng)?;
                    self.transition = None;
                    self.burst.clear();
                    self.status = "New board.".to_string();
                }
            }
            Action::Quit | Action::None => {}
        }
        Ok(())
    }

    /// Left click at screen cell (col, row). Clicks outside the board are ignored.
    fn click(&mut self, col: u16, row: u16, now: Instant) -> Result<()> {
        let Some(pos) = self.viewport.and_then(|vp| vp.to_world(col, row)) else {
            return Ok(());
        };
        if self.busy(now) {
            debug!(col, row, "click ignored during animation");
            return Ok(());
        }
        self.select_world(pos, now)
    }

    fn select_world(&mut self, pos: WorldPos, now: Instant) -> Result<()> {
        let coord = self.engine.layout().world_to_grid(pos);
        if self.engine.layout().contains(coord) {
            self.cursor = coord;
        }
        let result = self.engine.select_world(pos);
        self.settle(result, now)
    }

    /// Turn an engine result into status text and, for a blast, a transition.
    fn settle(&mut self, result: Result<Outcome, EngineError>, now: Instant) -> Result<()> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if e.is_invalid_coordinate() => {
                self.status = "Outside the board.".to_string();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        self.status = match outcome {
            Outcome::NoOp(NoOpReason::EmptyCell) => "Nothing there.".to_string(),
            Outcome::NoOp(NoOpReason::BelowThreshold { size, min }) => {
                format!("Group of {size} is too small; needs {min}.")
            }
            Outcome::Cleared(blast) => {
                let color = blast.removed.first().map(|&(_, c)| c);
                let mut msg = match color {
                    Some(c) => format!("Popped {} {c}.", blast.removed.len()),
                    None => "Popped nothing.".to_string(),
                };
                if self.engine.board().is_cleared() {
                    msg.push_str(" Board cleared! Press n for a new one.");
                }
                if self.animate {
                    self.transition = Some(Transition::new(blast, now));
                    self.burst.clear();
                }
                msg
            }
        };
        Ok(())
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let layout = self.engine.layout();
        let max_x = layout.width() as i32 - 1;
        let max_y = layout.height() as i32 - 1;
        self.cursor = GridCoord::new(
            (self.cursor.x + dx).clamp(0, max_x),
            (self.cursor.y + dy).clamp(0, max_y),
        );
    }
}
