#![forbid(unsafe_code)]

//! Terminal session for the live demo.
//!
//! [`TerminalSession`] enables raw mode, the alternate screen and mouse
//! capture, and puts the terminal back on every exit path:
//!
//! - normal return: [`Drop`];
//! - panic: a process-wide panic hook, which also covers release builds
//!   where panics abort and `Drop` never runs;
//! - SIGINT / SIGTERM (unix): a `signal-hook` listener thread that restores
//!   the terminal and exits with `128 + signal`.

use std::io::{self, Stdout, Write};
use std::sync::OnceLock;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// An active full-screen session. Restores the terminal when dropped.
#[derive(Debug)]
pub struct TerminalSession {
    out: Stdout,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode, the alternate screen and mouse capture.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();
        #[cfg(unix)]
        let signal_guard = Some(SignalGuard::new()?);

        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide) {
            best_effort_cleanup();
            return Err(err);
        }
        tracing::info!("terminal session started");
        Ok(Self {
            out,
            #[cfg(unix)]
            signal_guard,
        })
    }

    /// Writer for frame output.
    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();
        best_effort_cleanup();
        tracing::info!("terminal session restored");
    }
}

/// Queue the escape sequences that undo [`TerminalSession::new`] and flush.
/// Raw mode is a termios setting, not a sequence, and is handled separately.
pub fn write_restore<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, DisableMouseCapture, Show, LeaveAlternateScreen)?;
    out.flush()
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = write_restore(&mut stdout);
    let _ = terminal::disable_raw_mode();
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                if matches!(signal, SIGINT | SIGTERM) {
                    tracing::warn!(signal, "termination signal received, cleaning up");
                    best_effort_cleanup();
                    std::process::exit(128 + signal);
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
