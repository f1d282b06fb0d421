#![forbid(unsafe_code)]

//! Core: auto-scroll arbitration for continuously appended content.
//!
//! A live feed wants two things at once: stay pinned to the newest content,
//! and never fight a user who scrolled away to read. [`AutoScrollArbiter`]
//! resolves drag, anchor, phase, content, lock and tap signals into one
//! `should_auto_scroll` decision and at most one scroll command per cause.
//! [`FollowController`] serializes those signals onto a queue and wires the
//! arbiter to a [`ScrollCommander`] and an [`Affordance`].
//!
//! # Example
//!
//! ```
//! use ffollow_core::{ArbiterConfig, ControllerConfig, FollowController, NoAffordance, ScrollCommand};
//!
//! let mut scrolls = 0;
//! let mut ctl = FollowController::new(
//!     ArbiterConfig::new("bottom"),
//!     ControllerConfig::default(),
//!     |_: &ScrollCommand<&'static str>| scrolls += 1,
//!     NoAffordance,
//! );
//! ctl.report_content_version(1u64);
//! ctl.report_drag_start();
//! ctl.report_content_version(2u64);
//! assert!(!ctl.arbiter().should_auto_scroll());
//! drop(ctl);
//! assert_eq!(scrolls, 1);
//! ```

pub mod anchor;
pub mod arbiter;
pub mod command;
pub mod config;
pub mod controller;
pub mod event;
pub mod logging;
pub mod overlay;

pub use anchor::{AnchorId, ContentVersion, ScrollPhase};
pub use arbiter::{ArbiterState, ArbiterStats, AutoScrollArbiter, Outcome, StateChange};
pub use command::{Affordance, NoAffordance, ScrollCause, ScrollCommand, ScrollCommander};
pub use config::{ArbiterConfig, ConfigError, ControllerConfig};
pub use controller::FollowController;
pub use event::FollowEvent;
pub use overlay::OverlayVisibility;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, trace_span};
