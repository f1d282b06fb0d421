#![forbid(unsafe_code)]

//! Auto-scroll arbitration.
//!
//! [`AutoScrollArbiter`] is the single authority over whether new content
//! should pull the viewport to the bottom. It consumes drag, anchor, phase,
//! content, lock and tap events and answers each with an [`Outcome`]: the set
//! of state fields that changed and at most one [`ScrollCommand`].
//!
//! # Invariants
//!
//! 1. Engaging the lock always arms auto-follow and issues one command.
//!    While the lock is held, any anchor report at the bottom re-arms.
//! 2. The affordance is visible iff auto-follow is suspended and the phase is
//!    idle (see [`OverlayVisibility::derive`]).
//! 3. At most one command per content change, per lock engage and per tap.
//!    Repeated identical reports never emit anything.
//!
//! # Failure Modes
//!
//! - No bottom anchor reported yet: anchor comparisons are false, so nothing
//!   re-arms on absent data.
//! - The commander ignores a command (content not laid out yet): nothing is
//!   retried here; the next anchor report restores a consistent picture.

use std::time::Duration;

use bitflags::bitflags;

use crate::anchor::{AnchorId, ContentVersion, ScrollPhase};
use crate::command::{ScrollCause, ScrollCommand};
use crate::config::ArbiterConfig;
use crate::event::FollowEvent;
use crate::overlay::OverlayVisibility;

bitflags! {
    /// Which parts of the arbiter's observable state an event changed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateChange: u8 {
        /// `should_auto_scroll` flipped.
        const AUTO_SCROLL = 1 << 0;
        /// `lock_to_bottom` flipped.
        const LOCK = 1 << 1;
        /// A different bottom anchor was reported.
        const ANCHOR = 1 << 2;
        /// The scroll phase changed.
        const PHASE = 1 << 3;
        /// A new content version was seen.
        const CONTENT = 1 << 4;
        /// Derived affordance visibility changed.
        const VISIBILITY = 1 << 5;
    }
}

/// The arbiter's policy state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbiterState<A> {
    /// Scroll to the bottom on the next content change.
    pub should_auto_scroll: bool,
    /// Mirror of the externally owned lock.
    pub lock_to_bottom: bool,
    /// Last anchor reported at the trailing edge, if any.
    pub current_bottom_anchor: Option<A>,
    /// Last reported motion phase.
    pub phase: ScrollPhase,
}

/// Result of feeding one event to the arbiter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an outcome may carry a scroll command that has to reach the commander"]
pub struct Outcome<A> {
    /// Command to forward to the scroll commander, if any.
    pub command: Option<ScrollCommand<A>>,
    /// State fields touched by the event.
    pub changed: StateChange,
}

impl<A> Outcome<A> {
    fn none() -> Self {
        Self {
            command: None,
            changed: StateChange::empty(),
        }
    }

    /// Whether the event left everything untouched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.command.is_none() && self.changed.is_empty()
    }
}

/// Diagnostic counters. Monotonic for the arbiter's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArbiterStats {
    /// Commands issued because content changed while following.
    pub content_commands: u64,
    /// Commands issued because the lock engaged.
    pub lock_commands: u64,
    /// Commands issued because the affordance was tapped.
    pub tap_commands: u64,
    /// Content changes absorbed while auto-follow was suspended.
    pub absorbed_changes: u64,
    /// Content reports equal to the previous one.
    pub duplicate_reports: u64,
    /// Drags that suspended auto-follow.
    pub suspensions: u64,
    /// Re-arms caused by a drag ending at the bottom.
    pub drag_rearms: u64,
    /// Re-arms caused by an anchor report at the bottom while locked.
    pub anchor_rearms: u64,
    /// Lock releases that turned auto-follow off.
    pub lock_releases: u64,
}

impl ArbiterStats {
    /// Total commands issued for any cause.
    #[must_use]
    pub fn commands(&self) -> u64 {
        self.content_commands + self.lock_commands + self.tap_commands
    }

    /// Serialize counters to JSON (for diagnostics/evidence logs).
    #[must_use]
    pub fn to_json(&self) -> String {
        format!(
            concat!(
                r#"{{"content_commands":{},"lock_commands":{},"tap_commands":{},"#,
                r#""absorbed_changes":{},"duplicate_reports":{},"suspensions":{},"#,
                r#""drag_rearms":{},"anchor_rearms":{},"lock_releases":{}}}"#
            ),
            self.content_commands,
            self.lock_commands,
            self.tap_commands,
            self.absorbed_changes,
            self.duplicate_reports,
            self.suspensions,
            self.drag_rearms,
            self.anchor_rearms,
            self.lock_releases,
        )
    }
}

/// Decides when a continuously growing region follows its newest content.
///
/// Feed events with the `on_*` handlers or [`handle`](Self::handle); read the
/// affordance state from [`overlay`](Self::overlay).
#[derive(Debug, Clone)]
pub struct AutoScrollArbiter<A, V> {
    bottom_anchor: A,
    animated: bool,
    scroll_duration: Duration,
    state: ArbiterState<A>,
    /// Last content version seen, for change detection.
    last_version: Option<V>,
    stats: ArbiterStats,
}

impl<A: AnchorId, V: ContentVersion> AutoScrollArbiter<A, V> {
    /// Create an arbiter for one scroll region.
    #[must_use]
    pub fn new(config: ArbiterConfig<A>) -> Self {
        let should_auto_scroll = config.auto_scroll || config.lock_to_bottom;
        crate::debug!(
            lock_to_bottom = config.lock_to_bottom,
            should_auto_scroll,
            "arbiter created"
        );
        Self {
            bottom_anchor: config.bottom_anchor,
            animated: config.animated,
            scroll_duration: config.scroll_duration,
            state: ArbiterState {
                should_auto_scroll,
                lock_to_bottom: config.lock_to_bottom,
                current_bottom_anchor: None,
                phase: ScrollPhase::Idle,
            },
            last_version: None,
            stats: ArbiterStats::default(),
        }
    }

    /// The fixed anchor marking the bottom of all content.
    #[inline]
    #[must_use]
    pub fn bottom_anchor(&self) -> &A {
        &self.bottom_anchor
    }

    /// Current policy state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &ArbiterState<A> {
        &self.state
    }

    /// Whether the next content change will scroll to the bottom.
    #[inline]
    #[must_use]
    pub fn should_auto_scroll(&self) -> bool {
        self.state.should_auto_scroll
    }

    /// Whether the external lock is currently held.
    #[inline]
    #[must_use]
    pub fn lock_to_bottom(&self) -> bool {
        self.state.lock_to_bottom
    }

    /// Diagnostic counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> &ArbiterStats {
        &self.stats
    }

    /// Derived affordance state.
    #[inline]
    #[must_use]
    pub fn overlay(&self) -> OverlayVisibility {
        OverlayVisibility::derive(self.state.should_auto_scroll, self.state.phase)
    }

    /// Whether the last reported trailing anchor is the bottom anchor.
    /// `false` until the first report.
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.state.current_bottom_anchor.as_ref() == Some(&self.bottom_anchor)
    }

    /// Dispatch one event to its handler.
    pub fn handle(&mut self, event: FollowEvent<A, V>) -> Outcome<A> {
        match event {
            FollowEvent::DragStarted => self.on_drag_start(),
            FollowEvent::DragEnded => self.on_drag_end(),
            FollowEvent::BottomAnchor(anchor) => self.on_bottom_anchor_changed(anchor),
            FollowEvent::Phase(phase) => self.on_scroll_phase_changed(phase),
            FollowEvent::ContentVersion(version) => self.on_content_changed(version),
            FollowEvent::Lock(lock) => self.on_lock_to_bottom_changed(lock),
            FollowEvent::AffordanceTapped => self.on_affordance_tapped(),
        }
    }

    /// A manual drag began: suspend auto-follow before the offset moves, so
    /// content arriving mid-gesture cannot re-pin the view.
    pub fn on_drag_start(&mut self) -> Outcome<A> {
        let before = self.overlay();
        let mut changed = StateChange::empty();
        if self.set_auto_scroll(false, "drag_start") {
            self.stats.suspensions += 1;
            changed |= StateChange::AUTO_SCROLL;
        }
        self.finish(before, changed, None)
    }

    /// The drag ended. Re-arm only if the viewport settled at the bottom.
    /// Passive: the pin takes effect on the next content change.
    pub fn on_drag_end(&mut self) -> Outcome<A> {
        let before = self.overlay();
        let mut changed = StateChange::empty();
        if self.is_at_bottom() && self.set_auto_scroll(true, "drag_end_at_bottom") {
            self.stats.drag_rearms += 1;
            changed |= StateChange::AUTO_SCROLL;
        }
        self.finish(before, changed, None)
    }

    /// The trailing-edge anchor was reported. While locked, any report at
    /// the bottom re-arms, including a repeat of the current anchor.
    pub fn on_bottom_anchor_changed(&mut self, anchor: A) -> Outcome<A> {
        let before = self.overlay();
        let mut changed = StateChange::empty();
        if self.state.current_bottom_anchor.as_ref() != Some(&anchor) {
            crate::trace!(anchor = ?anchor, "bottom anchor reported");
            self.state.current_bottom_anchor = Some(anchor);
            changed |= StateChange::ANCHOR;
        }
        if self.state.lock_to_bottom
            && self.is_at_bottom()
            && self.set_auto_scroll(true, "anchor_at_bottom_locked")
        {
            self.stats.anchor_rearms += 1;
            changed |= StateChange::AUTO_SCROLL;
        }
        self.finish(before, changed, None)
    }

    /// New content may have arrived. Only a change in version counts.
    pub fn on_content_changed(&mut self, version: V) -> Outcome<A> {
        if self.last_version.as_ref() == Some(&version) {
            self.stats.duplicate_reports += 1;
            crate::trace!("duplicate content version ignored");
            return Outcome::none();
        }
        let before = self.overlay();
        self.last_version = Some(version);
        let command = if self.state.should_auto_scroll {
            self.stats.content_commands += 1;
            Some(self.command(ScrollCause::ContentChanged))
        } else {
            self.stats.absorbed_changes += 1;
            crate::trace!("content change absorbed while suspended");
            None
        };
        self.finish(before, StateChange::CONTENT, command)
    }

    /// The external lock changed. Engaging forces follow and scrolls now;
    /// releasing stops forcing follow without moving anything.
    pub fn on_lock_to_bottom_changed(&mut self, lock: bool) -> Outcome<A> {
        if self.state.lock_to_bottom == lock {
            return Outcome::none();
        }
        let before = self.overlay();
        self.state.lock_to_bottom = lock;
        let mut changed = StateChange::LOCK;
        let command = if lock {
            if self.set_auto_scroll(true, "lock_engaged") {
                changed |= StateChange::AUTO_SCROLL;
            }
            self.stats.lock_commands += 1;
            Some(self.command(ScrollCause::LockEngaged))
        } else {
            if self.set_auto_scroll(false, "lock_released") {
                self.stats.lock_releases += 1;
                changed |= StateChange::AUTO_SCROLL;
            }
            None
        };
        self.finish(before, changed, command)
    }

    /// The viewport started or stopped moving. Observation only.
    pub fn on_scroll_phase_changed(&mut self, phase: ScrollPhase) -> Outcome<A> {
        if self.state.phase == phase {
            return Outcome::none();
        }
        let before = self.overlay();
        crate::trace!(phase = phase.as_str(), "scroll phase changed");
        self.state.phase = phase;
        self.finish(before, StateChange::PHASE, None)
    }

    /// The jump-to-bottom affordance was tapped: scroll and re-arm.
    pub fn on_affordance_tapped(&mut self) -> Outcome<A> {
        let before = self.overlay();
        let mut changed = StateChange::empty();
        if self.set_auto_scroll(true, "affordance_tapped") {
            changed |= StateChange::AUTO_SCROLL;
        }
        self.stats.tap_commands += 1;
        let command = Some(self.command(ScrollCause::AffordanceTapped));
        self.finish(before, changed, command)
    }

    /// Returns `true` if the flag actually changed.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn set_auto_scroll(&mut self, value: bool, reason: &'static str) -> bool {
        if self.state.should_auto_scroll == value {
            return false;
        }
        self.state.should_auto_scroll = value;
        crate::debug!(should_auto_scroll = value, reason, "auto-follow changed");
        true
    }

    fn command(&self, cause: ScrollCause) -> ScrollCommand<A> {
        crate::debug!(cause = cause.as_str(), "scroll to bottom");
        ScrollCommand {
            anchor: self.bottom_anchor.clone(),
            animated: self.animated,
            duration: self.scroll_duration,
            cause,
        }
    }

    fn finish(
        &self,
        before: OverlayVisibility,
        mut changed: StateChange,
        command: Option<ScrollCommand<A>>,
    ) -> Outcome<A> {
        if self.overlay() != before {
            changed |= StateChange::VISIBILITY;
        }
        Outcome { command, changed }
    }
}
