#![forbid(unsafe_code)]

//! Simulation harness for `ffollow-core`.
//!
//! The arbiter never touches a real scroll view. This crate supplies the
//! pieces around it so behavior can be exercised end to end:
//!
//! - [`animation`]: eased scroll tweens that can be retargeted mid-flight.
//! - [`viewport`]: a row-based viewport that reports anchors and phases and
//!   executes scroll commands.
//! - [`feed`]: a scripted, virtual-clock feed simulator with a jump button.
//! - [`scrollback`]: bounded line storage addressed by absolute row.
//! - [`terminal`]: a full-screen session that restores the terminal on
//!   drop, panic and termination signals.
//!
//! The `ffollow-demo` binary drives the same pieces from a live terminal.

pub mod animation;
pub mod feed;
pub mod scrollback;
pub mod terminal;
pub mod viewport;

pub use animation::{Animation, ScrollTween};
pub use feed::{FeedSimulator, JumpButton, SimConfig, Step, VisibilityChange};
pub use scrollback::Scrollback;
pub use terminal::TerminalSession;
pub use viewport::{CommandLog, RowId, SimViewport};
