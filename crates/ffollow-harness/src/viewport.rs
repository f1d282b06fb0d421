#![forbid(unsafe_code)]

//! A simulated scroll viewport.
//!
//! [`SimViewport`] models a column of equally tall rows followed by a
//! zero-height bottom sentinel, seen through a window `height` rows tall.
//! It plays the three external roles around the arbiter:
//!
//! - **AnchorTracker**: [`drain_reports`](SimViewport::drain_reports) yields
//!   the trailing-edge anchor and motion phase whenever they change.
//! - **ScrollCommander**: commands start (or retarget) a [`ScrollTween`].
//! - **Gesture surface**: [`begin_drag`](SimViewport::begin_drag),
//!   [`drag_by`](SimViewport::drag_by) and [`end_drag`](SimViewport::end_drag)
//!   move the offset directly.
//!
//! It has no policy of its own: it never decides to scroll.

use std::time::Duration;

use ffollow_core::{FollowEvent, ScrollCause, ScrollCommand, ScrollCommander, ScrollPhase};

use crate::animation::{Animation, ScrollTween};

/// Anchor identity inside the simulated viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    /// A content row, zero-indexed from the oldest.
    Row(u64),
    /// The sentinel after the last row: the bottom of all content.
    Bottom,
}

/// What an animated scroll is chasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// Keep chasing the bottom while rows keep arriving.
    Bottom,
    /// A fixed offset.
    Offset(u64),
}

/// Per-cause command counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandLog {
    /// Commands caused by content changes.
    pub content: u64,
    /// Commands caused by the lock engaging.
    pub lock: u64,
    /// Commands caused by affordance taps.
    pub tap: u64,
}

impl CommandLog {
    /// Total commands received.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.content + self.lock + self.tap
    }

    fn record(&mut self, cause: ScrollCause) {
        match cause {
            ScrollCause::ContentChanged => self.content += 1,
            ScrollCause::LockEngaged => self.lock += 1,
            ScrollCause::AffordanceTapped => self.tap += 1,
        }
    }
}

/// Simulated viewport over `rows` content rows.
#[derive(Debug, Clone)]
pub struct SimViewport {
    rows: u64,
    height: u16,
    /// Index of the top visible row, fractional while animating.
    offset: f32,
    tween: Option<(ScrollTween, Target)>,
    dragging: bool,
    reported_anchor: Option<RowId>,
    reported_phase: ScrollPhase,
    commands: CommandLog,
}

impl SimViewport {
    /// An empty viewport showing `height` rows.
    #[must_use]
    pub fn new(height: u16) -> Self {
        Self {
            rows: 0,
            height: height.max(1),
            offset: 0.0,
            tween: None,
            dragging: false,
            reported_anchor: None,
            reported_phase: ScrollPhase::Idle,
            commands: CommandLog::default(),
        }
    }

    /// Number of content rows.
    #[must_use]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Visible height in rows.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Index of the first visible row.
    #[must_use]
    pub fn top_row(&self) -> u64 {
        self.offset.round().max(0.0) as u64
    }

    /// Largest valid top-row offset.
    #[must_use]
    pub fn max_offset(&self) -> u64 {
        self.rows.saturating_sub(u64::from(self.height))
    }

    /// Commands received so far.
    #[must_use]
    pub fn commands(&self) -> &CommandLog {
        &self.commands
    }

    /// Whether an animated scroll is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Current motion phase.
    #[must_use]
    pub fn phase(&self) -> ScrollPhase {
        if self.dragging || self.tween.is_some() {
            ScrollPhase::InMotion
        } else {
            ScrollPhase::Idle
        }
    }

    /// Anchor currently at the trailing edge.
    #[must_use]
    pub fn trailing_anchor(&self) -> RowId {
        let bottom_of_view = self.top_row() + u64::from(self.height);
        if bottom_of_view >= self.rows {
            RowId::Bottom
        } else {
            RowId::Row(bottom_of_view - 1)
        }
    }

    /// Range of row indices currently visible.
    #[must_use]
    pub fn visible_rows(&self) -> std::ops::Range<u64> {
        let top = self.top_row().min(self.rows);
        let end = (top + u64::from(self.height)).min(self.rows);
        top..end
    }

    /// Append rows at the end. The offset stays put.
    pub fn append(&mut self, rows: u64) {
        self.rows = self.rows.saturating_add(rows);
    }

    /// Change the visible height, clamping the offset.
    pub fn resize(&mut self, height: u16) {
        self.height = height.max(1);
        self.clamp_offset();
    }

    /// The user grabbed the content. Any animation stops where it is.
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.tween = None;
    }

    /// Move the content by `delta` rows (negative reveals older rows).
    pub fn drag_by(&mut self, delta: f32) {
        self.tween = None;
        self.offset += delta;
        self.clamp_offset();
        self.offset = self.offset.round();
    }

    /// The user let go.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Advance any in-flight animation by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        let max = self.max_offset() as f32;
        if let Some((tween, target)) = self.tween.as_mut() {
            if *target == Target::Bottom {
                tween.retarget(max);
            }
            tween.tick(dt);
            self.offset = tween.position();
            if tween.is_complete() {
                self.offset = tween.target();
                self.tween = None;
            }
        }
        self.clamp_offset();
    }

    /// Anchor and phase reports that changed since the last drain, in the
    /// order an AnchorTracker would deliver them.
    pub fn drain_reports<V>(&mut self) -> Vec<FollowEvent<RowId, V>> {
        let mut reports = Vec::new();
        let anchor = self.trailing_anchor();
        if self.reported_anchor != Some(anchor) {
            self.reported_anchor = Some(anchor);
            reports.push(FollowEvent::BottomAnchor(anchor));
        }
        let phase = self.phase();
        if self.reported_phase != phase {
            self.reported_phase = phase;
            reports.push(FollowEvent::Phase(phase));
        }
        reports
    }

    fn target_offset(&self, anchor: RowId) -> (f32, Target) {
        match anchor {
            RowId::Bottom => (self.max_offset() as f32, Target::Bottom),
            RowId::Row(idx) => {
                let top = (idx + 1)
                    .saturating_sub(u64::from(self.height))
                    .min(self.max_offset());
                (top as f32, Target::Offset(top))
            }
        }
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.clamp(0.0, self.max_offset() as f32);
    }
}

impl ScrollCommander<RowId> for SimViewport {
    fn scroll_to(&mut self, command: &ScrollCommand<RowId>) {
        self.commands.record(command.cause);
        let (to, target) = self.target_offset(command.anchor);
        if !command.animated {
            self.tween = None;
            self.offset = to;
            return;
        }
        match self.tween.as_mut() {
            // Same destination: keep the running curve and move its end point.
            Some((tween, current)) if *current == target => tween.retarget(to),
            Some((tween, current)) => {
                tween.restart(to, command.duration);
                *current = target;
            }
            None => {
                self.tween = Some((ScrollTween::new(self.offset, to, command.duration), target));
            }
        }
    }
}
