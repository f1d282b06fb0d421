#![forbid(unsafe_code)]

//! Deterministic feed simulator.
//!
//! `FeedSimulator` wires a [`FollowController`] to a [`SimViewport`] and a
//! [`JumpButton`], then runs a script of [`Step`]s on a virtual clock. No
//! real time passes, so a run is a pure function of its script.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ffollow_harness::feed::{FeedSimulator, SimConfig, Step};
//!
//! let mut sim = FeedSimulator::new(SimConfig::default());
//! sim.run(&[
//!     Step::Stream { lines: 50, every: Duration::from_millis(5) },
//!     Step::Settle,
//! ]);
//! assert!(sim.at_bottom());
//! ```

use std::time::Duration;

use ffollow_core::{
    Affordance, ArbiterConfig, ControllerConfig, FollowController, FollowEvent,
};

use crate::viewport::{RowId, SimViewport};

/// Affordance state as a renderer would hold it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpButton {
    /// Whether the button is drawn.
    pub visible: bool,
    /// Whether clicks reach it.
    pub enabled: bool,
}

impl Affordance for JumpButton {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Append rows and report the new content version.
    Append(u64),
    /// Append one row at a time, advancing the clock between rows.
    Stream {
        /// Rows to append.
        lines: u64,
        /// Clock advance between rows.
        every: Duration,
    },
    /// Advance the virtual clock.
    Advance(Duration),
    /// Advance until the viewport stops moving.
    Settle,
    /// Press on the content.
    DragStart,
    /// Move the content by rows (negative reveals older rows).
    DragBy(f32),
    /// Release.
    DragEnd,
    /// Set the external lock.
    Lock(bool),
    /// Tap the jump-to-bottom button.
    Tap,
}

/// Simulator parameters.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Visible rows.
    pub height: u16,
    /// Virtual frame length; animations advance in steps of this size.
    pub frame: Duration,
    /// Arbiter configuration.
    pub arbiter: ArbiterConfig<RowId>,
    /// Controller configuration.
    pub controller: ControllerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            height: 20,
            frame: Duration::from_millis(1),
            arbiter: ArbiterConfig::new(RowId::Bottom),
            controller: ControllerConfig::default(),
        }
    }
}

/// A visibility change of the jump button at a point in virtual time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChange {
    /// Virtual time of the change.
    pub at: Duration,
    /// New visibility.
    pub visible: bool,
}

/// Upper bound on frames [`Step::Settle`] will advance.
const SETTLE_LIMIT: u32 = 100_000;

/// Runs scripts against a controller, viewport and jump button.
#[derive(Debug)]
pub struct FeedSimulator {
    ctl: FollowController<RowId, u64, SimViewport, JumpButton>,
    frame: Duration,
    clock: Duration,
    visibility: Vec<VisibilityChange>,
}

impl FeedSimulator {
    /// Build a simulator and deliver the viewport's initial reports.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let frame = if config.frame.is_zero() {
            Duration::from_millis(1)
        } else {
            config.frame
        };
        let ctl = FollowController::new(
            config.arbiter,
            config.controller,
            SimViewport::new(config.height),
            JumpButton::default(),
        );
        let mut sim = Self {
            ctl,
            frame,
            clock: Duration::ZERO,
            visibility: Vec::new(),
        };
        sim.sync();
        sim
    }

    /// Run every step in order.
    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            self.step(step);
        }
    }

    /// Run one step.
    pub fn step(&mut self, step: &Step) {
        tracing::trace!(?step, clock_ms = self.clock.as_millis() as u64, "sim step");
        match *step {
            Step::Append(rows) => self.append(rows),
            Step::Stream { lines, every } => {
                for _ in 0..lines {
                    self.append(1);
                    self.advance(every);
                }
            }
            Step::Advance(dt) => self.advance(dt),
            Step::Settle => {
                let mut frames = 0;
                while self.viewport().is_animating() && frames < SETTLE_LIMIT {
                    self.advance(self.frame);
                    frames += 1;
                }
            }
            Step::DragStart => {
                // The viewport starts moving before the gesture is recognized.
                self.ctl.commander_mut().begin_drag();
                self.forward_reports();
                self.ctl.enqueue(FollowEvent::DragStarted);
                self.pump_and_record();
            }
            Step::DragBy(delta) => {
                self.ctl.commander_mut().drag_by(delta);
                self.sync();
            }
            Step::DragEnd => {
                self.ctl.commander_mut().end_drag();
                self.ctl.enqueue(FollowEvent::DragEnded);
                self.sync();
            }
            Step::Lock(lock) => {
                self.ctl.enqueue(FollowEvent::Lock(lock));
                self.sync();
            }
            Step::Tap => {
                self.ctl.enqueue(FollowEvent::AffordanceTapped);
                self.sync();
            }
        }
    }

    /// The controller under test.
    #[must_use]
    pub fn controller(&self) -> &FollowController<RowId, u64, SimViewport, JumpButton> {
        &self.ctl
    }

    /// The simulated viewport.
    #[must_use]
    pub fn viewport(&self) -> &SimViewport {
        self.ctl.commander()
    }

    /// The jump button as last pushed by the controller.
    #[must_use]
    pub fn button(&self) -> JumpButton {
        *self.ctl.affordance()
    }

    /// Virtual time elapsed.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Whether the viewport shows the bottom sentinel.
    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.viewport().trailing_anchor() == RowId::Bottom
    }

    /// Every jump-button visibility change so far.
    #[must_use]
    pub fn visibility_changes(&self) -> &[VisibilityChange] {
        &self.visibility
    }

    /// Visibility changes that reverted a previous change within `window`.
    /// A well-behaved arbiter produces none under steady streaming.
    #[must_use]
    pub fn flickers(&self, window: Duration) -> usize {
        self.visibility
            .windows(2)
            .filter(|pair| pair[1].at.saturating_sub(pair[0].at) < window)
            .count()
    }

    fn append(&mut self, rows: u64) {
        self.ctl.commander_mut().append(rows);
        let version = self.viewport().rows();
        self.ctl.enqueue(FollowEvent::ContentVersion(version));
        self.sync();
    }

    fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        while !remaining.is_zero() {
            let slice = remaining.min(self.frame);
            self.ctl.commander_mut().tick(slice);
            self.clock += slice;
            remaining -= slice;
            self.sync();
        }
    }

    /// Forward viewport reports, pump, and note button changes.
    fn sync(&mut self) {
        self.forward_reports();
        self.pump_and_record();
    }

    fn forward_reports(&mut self) {
        let reports = self.ctl.commander_mut().drain_reports();
        for report in reports {
            self.ctl.enqueue(report);
        }
    }

    fn pump_and_record(&mut self) {
        self.ctl.pump();

        let visible = self.ctl.affordance().visible;
        let last = self.visibility.last().is_some_and(|c| c.visible);
        if visible != last {
            self.visibility.push(VisibilityChange {
                at: self.clock,
                visible,
            });
        }
    }
}
