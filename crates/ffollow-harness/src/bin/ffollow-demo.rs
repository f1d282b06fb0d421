#![forbid(unsafe_code)]

//! Live follow-feed demo.
//!
//! Streams synthetic log lines into a terminal viewport driven by the
//! auto-scroll arbiter. Scroll away to suspend following; the jump button
//! appears once the view settles.
//!
//! # Running
//!
//! ```sh
//! cargo run -p ffollow-harness --bin ffollow-demo
//! FFOLLOW_LOG=/tmp/ffollow.jsonl RUST_LOG=ffollow_core=trace cargo run -p ffollow-harness --bin ffollow-demo
//! ```
//!
//! # Controls
//!
//! - Mouse drag / wheel, Up/Down, PageUp/PageDown: scroll
//! - Click the jump button, End or Enter: jump to bottom
//! - `l`: toggle lock-to-bottom
//! - `q`, Esc, Ctrl+C: quit

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use unicode_width::UnicodeWidthChar;

use ffollow_core::logging::init_json_subscriber;
use ffollow_core::{ArbiterConfig, ControllerConfig, FollowController, FollowEvent};
use ffollow_harness::{JumpButton, RowId, Scrollback, SimViewport, TerminalSession};

/// Env var naming a file for JSON logs.
const ENV_LOG: &str = "FFOLLOW_LOG";
/// Delay between synthetic lines.
const LINE_CADENCE: Duration = Duration::from_millis(8);
/// Frame budget while waiting for input.
const FRAME: Duration = Duration::from_millis(16);
/// Lines the feed may fall behind before it skips ahead.
const MAX_BURST: u32 = 64;
/// Lines kept for display; older rows render blank.
const MAX_LINES: usize = 10_000;
/// Rows moved per wheel notch.
const WHEEL_ROWS: f32 = 3.0;
const BUTTON_LABEL: &str = " ↓ Jump to bottom ";

const LEVELS: [&str; 4] = ["INFO ", "DEBUG", "WARN ", "TRACE"];
const SOURCES: [&str; 5] = ["net", "db", "cache", "worker", "界面"];

type Controller = FollowController<RowId, u64, SimViewport, JumpButton>;

// ============================================================================
// App
// ============================================================================

struct App {
    ctl: Controller,
    lines: Scrollback,
    next_line: Instant,
    last_tick: Instant,
    /// Terminal row under the pointer while a mouse drag is active.
    drag_row: Option<u16>,
    width: u16,
    height: u16,
    quit: bool,
}

impl App {
    fn new(ctl: Controller, width: u16, height: u16) -> Self {
        let now = Instant::now();
        Self {
            ctl,
            lines: Scrollback::new(MAX_LINES),
            next_line: now,
            last_tick: now,
            drag_row: None,
            width,
            height,
            quit: false,
        }
    }

    fn viewport(&mut self) -> &mut SimViewport {
        self.ctl.commander_mut()
    }

    /// Advance animation and feed to `now`, then settle the controller.
    fn tick(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.viewport().tick(dt);

        let mut produced = 0;
        while self.next_line <= now {
            self.push_line();
            produced += 1;
            self.next_line += LINE_CADENCE;
            if produced >= MAX_BURST {
                self.next_line = now + LINE_CADENCE;
            }
        }
        self.sync();
    }

    fn push_line(&mut self) {
        let n = self.lines.total();
        let i = n as usize;
        self.lines.push(format!(
            "{n:>7} {} [{:<6}] request {} handled in {}µs",
            LEVELS[i % LEVELS.len()],
            SOURCES[(i / 3) % SOURCES.len()],
            n.wrapping_mul(2_654_435_761) % 100_000,
            (n * 37) % 900 + 20,
        ));
        self.viewport().append(1);
        self.ctl.enqueue(FollowEvent::ContentVersion(self.lines.total()));
    }

    fn sync(&mut self) {
        let reports = self.viewport().drain_reports();
        for report in reports {
            self.ctl.enqueue(report);
        }
        self.ctl.pump();
    }

    fn begin_drag(&mut self) {
        self.viewport().begin_drag();
        self.sync();
        self.ctl.enqueue(FollowEvent::DragStarted);
        self.ctl.pump();
    }

    fn end_drag(&mut self) {
        self.viewport().end_drag();
        self.ctl.enqueue(FollowEvent::DragEnded);
        self.sync();
    }

    /// A complete drag gesture of `rows` rows, as wheel and keys produce.
    fn nudge(&mut self, rows: f32) {
        self.begin_drag();
        self.viewport().drag_by(rows);
        self.sync();
        self.end_drag();
    }

    fn tap(&mut self) {
        self.ctl.enqueue(FollowEvent::AffordanceTapped);
        self.sync();
    }

    fn toggle_lock(&mut self) {
        let lock = !self.ctl.arbiter().lock_to_bottom();
        tracing::info!(lock, "lock toggled");
        self.ctl.enqueue(FollowEvent::Lock(lock));
        self.sync();
    }

    fn content_height(&self) -> u16 {
        self.height.saturating_sub(1).max(1)
    }

    fn button_row(&self) -> u16 {
        self.content_height().saturating_sub(1)
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let rows = self.content_height();
        self.viewport().resize(rows);
        self.sync();
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let page = f32::from(self.content_height());
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            KeyCode::Char('l') => self.toggle_lock(),
            KeyCode::End | KeyCode::Enter => self.tap(),
            KeyCode::Up => self.nudge(-1.0),
            KeyCode::Down => self.nudge(1.0),
            KeyCode::PageUp => self.nudge(-page),
            KeyCode::PageDown => self.nudge(page),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.ctl.affordance().visible && mouse.row == self.button_row() {
                    self.tap();
                } else {
                    self.drag_row = Some(mouse.row);
                    self.begin_drag();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(prev) = self.drag_row {
                    self.drag_row = Some(mouse.row);
                    // Pulling the content down reveals older rows.
                    let delta = f32::from(prev) - f32::from(mouse.row);
                    self.viewport().drag_by(delta);
                    self.sync();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag_row.take().is_some() {
                    self.end_drag();
                }
            }
            MouseEventKind::ScrollUp => self.nudge(-WHEEL_ROWS),
            MouseEventKind::ScrollDown => self.nudge(WHEEL_ROWS),
            _ => {}
        }
    }

    fn render(&mut self, out: &mut impl Write) -> io::Result<()> {
        let width = usize::from(self.width);
        let content_height = self.content_height();
        let visible = self.ctl.commander().visible_rows();

        for y in 0..content_height {
            let idx = visible.start + u64::from(y);
            let text = if idx < visible.end {
                self.lines.get(idx).unwrap_or("")
            } else {
                ""
            };
            queue!(
                out,
                MoveTo(0, y),
                Clear(ClearType::CurrentLine),
                Print(fit(text, width))
            )?;
        }

        let button = *self.ctl.affordance();
        if button.visible {
            let label_width = display_width(BUTTON_LABEL);
            let x = self.width.saturating_sub(u16::try_from(label_width).unwrap_or(u16::MAX) + 1);
            queue!(
                out,
                MoveTo(x, self.button_row()),
                SetAttribute(Attribute::Reverse),
                Print(fit(BUTTON_LABEL, width)),
                SetAttribute(Attribute::Reset)
            )?;
        }

        let arbiter = self.ctl.arbiter();
        let stats = arbiter.stats();
        let status = format!(
            " {} | lock {} | phase {} | lines {} | cmds {} | absorbed {}  (l lock, End jump, q quit)",
            if arbiter.should_auto_scroll() { "FOLLOWING" } else { "PAUSED" },
            if arbiter.lock_to_bottom() { "on" } else { "off" },
            arbiter.state().phase,
            self.lines.total(),
            stats.commands(),
            stats.absorbed_changes,
        );
        queue!(
            out,
            MoveTo(0, content_height),
            Clear(ClearType::CurrentLine),
            SetAttribute(Attribute::Bold),
            Print(fit(&status, width)),
            SetAttribute(Attribute::Reset)
        )?;
        out.flush()
    }
}

// ============================================================================
// Text helpers
// ============================================================================

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate `text` to at most `width` terminal cells.
fn fit(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::with_capacity(text.len().min(width * 4));
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

// ============================================================================
// Entry point
// ============================================================================

fn init_logging() -> io::Result<()> {
    if let Ok(path) = std::env::var(ENV_LOG) {
        let file = File::create(&path)?;
        if !init_json_subscriber(None, Mutex::new(file)) {
            eprintln!("ffollow-demo: a tracing subscriber was already installed");
        }
    }
    Ok(())
}

fn invalid_config(err: ffollow_core::ConfigError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

fn run() -> io::Result<()> {
    init_logging()?;

    let arbiter = ArbiterConfig::new(RowId::Bottom)
        .from_env()
        .map_err(invalid_config)?;
    let controller = ControllerConfig::default()
        .coalesce_content(true)
        .from_env()
        .map_err(invalid_config)?;
    tracing::info!(
        lock = arbiter.lock_to_bottom,
        scroll_ms = arbiter.scroll_duration.as_millis() as u64,
        coalesce = controller.coalesce_content,
        "ffollow-demo starting"
    );

    let (width, height) = terminal::size()?;
    let viewport = SimViewport::new(height.saturating_sub(1).max(1));
    let ctl = FollowController::new(arbiter, controller, viewport, JumpButton::default());
    let mut app = App::new(ctl, width, height);

    let mut session = TerminalSession::new()?;
    execute!(session.out(), Clear(ClearType::All))?;

    while !app.quit {
        app.tick(Instant::now());
        app.render(session.out())?;
        if event::poll(FRAME)? {
            let ev = event::read()?;
            app.handle(ev);
        }
    }

    tracing::info!(stats = %app.ctl.arbiter().stats().to_json(), "ffollow-demo finished");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ffollow-demo: {err}");
        std::process::exit(1);
    }
}
