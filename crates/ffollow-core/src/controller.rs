#![forbid(unsafe_code)]

//! Serialized event loop around an [`AutoScrollArbiter`].
//!
//! [`FollowController`] owns the arbiter together with its two outbound
//! collaborators, the [`ScrollCommander`] and the [`Affordance`]. Events are
//! queued in arrival order and applied one at a time by [`pump`]; arrival
//! order is authoritative, so the sequence of decisions is a pure function
//! of the event sequence.
//!
//! # Coalescing
//!
//! With [`ControllerConfig::coalesce_content`] enabled, a content report
//! queued directly behind another content report replaces it ("latest
//! wins"). Anything else in between breaks the run, so no event is ever
//! reordered relative to a non-content event.
//!
//! [`pump`]: FollowController::pump

use std::collections::VecDeque;

use crate::anchor::{AnchorId, ContentVersion, ScrollPhase};
use crate::arbiter::{AutoScrollArbiter, StateChange};
use crate::command::{Affordance, ScrollCommander};
use crate::config::{ArbiterConfig, ControllerConfig};
use crate::event::FollowEvent;
use crate::overlay::OverlayVisibility;

/// Owns the arbiter, its commander and its affordance, and feeds them from a
/// FIFO event queue.
#[derive(Debug)]
pub struct FollowController<A, V, C, F> {
    arbiter: AutoScrollArbiter<A, V>,
    commander: C,
    affordance: F,
    config: ControllerConfig,
    queue: VecDeque<FollowEvent<A, V>>,
    /// Last state pushed to the affordance.
    shown: OverlayVisibility,
    coalesced: u64,
    dropped_taps: u64,
}

impl<A, V, C, F> FollowController<A, V, C, F>
where
    A: AnchorId,
    V: ContentVersion,
    C: ScrollCommander<A>,
    F: Affordance,
{
    /// Build the controller and push the initial affordance state once.
    pub fn new(
        arbiter: ArbiterConfig<A>,
        config: ControllerConfig,
        commander: C,
        mut affordance: F,
    ) -> Self {
        let arbiter = AutoScrollArbiter::new(arbiter);
        let shown = arbiter.overlay();
        affordance.set_visible(shown.visible);
        affordance.set_enabled(shown.enabled);
        Self {
            arbiter,
            commander,
            affordance,
            config,
            queue: VecDeque::new(),
            shown,
            coalesced: 0,
            dropped_taps: 0,
        }
    }

    /// Queue an event without processing it.
    pub fn enqueue(&mut self, event: FollowEvent<A, V>) {
        if self.config.coalesce_content
            && event.is_content()
            && self.queue.back().is_some_and(FollowEvent::is_content)
        {
            self.queue.pop_back();
            self.coalesced += 1;
        }
        self.queue.push_back(event);
    }

    /// Apply every queued event in order. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let _span = crate::trace_span!("follow_pump", queued = self.queue.len()).entered();
        let mut applied = 0;
        while let Some(event) = self.queue.pop_front() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Queue one event and pump immediately.
    pub fn dispatch(&mut self, event: FollowEvent<A, V>) {
        self.enqueue(event);
        self.pump();
    }

    /// GestureSignal: drag started.
    pub fn report_drag_start(&mut self) {
        self.dispatch(FollowEvent::DragStarted);
    }

    /// GestureSignal: drag ended.
    pub fn report_drag_end(&mut self) {
        self.dispatch(FollowEvent::DragEnded);
    }

    /// AnchorTracker: anchor at the trailing edge.
    pub fn report_bottom_anchor(&mut self, anchor: A) {
        self.dispatch(FollowEvent::BottomAnchor(anchor));
    }

    /// AnchorTracker: motion phase.
    pub fn report_phase(&mut self, phase: ScrollPhase) {
        self.dispatch(FollowEvent::Phase(phase));
    }

    /// ContentOwner: current content version.
    pub fn report_content_version(&mut self, version: V) {
        self.dispatch(FollowEvent::ContentVersion(version));
    }

    /// LockSource: external lock value.
    pub fn report_lock(&mut self, lock: bool) {
        self.dispatch(FollowEvent::Lock(lock));
    }

    /// Affordance: inbound tap.
    pub fn tap(&mut self) {
        self.dispatch(FollowEvent::AffordanceTapped);
    }

    /// The arbiter (read-only).
    #[must_use]
    pub fn arbiter(&self) -> &AutoScrollArbiter<A, V> {
        &self.arbiter
    }

    /// The scroll commander.
    #[must_use]
    pub fn commander(&self) -> &C {
        &self.commander
    }

    /// Mutable access to the commander, e.g. to advance a simulated viewport.
    pub fn commander_mut(&mut self) -> &mut C {
        &mut self.commander
    }

    /// The affordance.
    #[must_use]
    pub fn affordance(&self) -> &F {
        &self.affordance
    }

    /// Events waiting for the next pump.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Content reports replaced by a later one before being applied.
    #[must_use]
    pub fn coalesced_reports(&self) -> u64 {
        self.coalesced
    }

    /// Taps ignored because the affordance was disabled.
    #[must_use]
    pub fn dropped_taps(&self) -> u64 {
        self.dropped_taps
    }

    /// Tear down, returning the collaborators.
    pub fn into_parts(self) -> (AutoScrollArbiter<A, V>, C, F) {
        (self.arbiter, self.commander, self.affordance)
    }

    fn apply(&mut self, event: FollowEvent<A, V>) {
        crate::trace!(event = event.name(), "follow event");
        if matches!(event, FollowEvent::AffordanceTapped) && !self.arbiter.overlay().enabled {
            self.dropped_taps += 1;
            crate::trace!("tap ignored while affordance disabled");
            return;
        }
        let outcome = self.arbiter.handle(event);
        if let Some(command) = &outcome.command {
            self.commander.scroll_to(command);
        }
        if outcome.changed.contains(StateChange::VISIBILITY) {
            self.sync_affordance();
        }
    }

    fn sync_affordance(&mut self) {
        let next = self.arbiter.overlay();
        if next.visible != self.shown.visible {
            self.affordance.set_visible(next.visible);
        }
        if next.enabled != self.shown.enabled {
            self.affordance.set_enabled(next.enabled);
        }
        self.shown = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{RecordingAffordance, RecordingCommander, ScrollCause};

    const BOTTOM: &str = "bottom";

    type Ctl = FollowController<&'static str, u32, RecordingCommander<&'static str>, RecordingAffordance>;

    fn controller(lock: bool, coalesce: bool) -> Ctl {
        FollowController::new(
            ArbiterConfig::new(BOTTOM).lock_to_bottom(lock),
            ControllerConfig::default().coalesce_content(coalesce),
            RecordingCommander::default(),
            RecordingAffordance::default(),
        )
    }

    #[test]
    fn initial_affordance_is_pushed_once() {
        let ctl = controller(false, false);
        assert_eq!(ctl.affordance().visibility_pushes, 1);
        assert!(!ctl.affordance().visible);
        assert!(!ctl.affordance().enabled);
    }

    #[test]
    fn commands_reach_the_commander() {
        let mut ctl = controller(false, false);
        ctl.report_content_version(1);
        ctl.report_content_version(2);
        ctl.report_content_version(2);
        assert_eq!(ctl.commander().count(), 2);
    }

    #[test]
    fn queue_is_fifo_and_arrival_order_wins() {
        let mut ctl = controller(false, false);
        ctl.enqueue(FollowEvent::ContentVersion(1));
        ctl.enqueue(FollowEvent::DragStarted);
        ctl.enqueue(FollowEvent::ContentVersion(2));
        assert_eq!(ctl.pending(), 3);
        assert_eq!(ctl.pump(), 3);
        assert_eq!(ctl.pending(), 0);
        // v1 arrived before the drag and scrolled; v2 after and was absorbed.
        assert_eq!(ctl.commander().count(), 1);
        assert_eq!(ctl.arbiter().stats().absorbed_changes, 1);
    }

    #[test]
    fn affordance_follows_derived_visibility() {
        let mut ctl = controller(false, false);
        ctl.report_drag_start();
        assert!(ctl.affordance().visible);
        assert!(ctl.affordance().enabled);
        ctl.report_phase(ScrollPhase::InMotion);
        assert!(!ctl.affordance().visible);
        ctl.report_phase(ScrollPhase::Idle);
        assert!(ctl.affordance().visible);
        // Phase noise that does not change visibility pushes nothing.
        let pushes = ctl.affordance().visibility_pushes;
        ctl.report_content_version(5);
        assert_eq!(ctl.affordance().visibility_pushes, pushes);
    }

    #[test]
    fn tap_while_hidden_is_dropped() {
        let mut ctl = controller(false, false);
        ctl.tap();
        assert_eq!(ctl.commander().count(), 0);
        assert_eq!(ctl.dropped_taps(), 1);
    }

    #[test]
    fn tap_while_visible_scrolls_and_hides() {
        let mut ctl = controller(false, false);
        ctl.report_drag_start();
        ctl.tap();
        assert_eq!(ctl.commander().count(), 1);
        assert_eq!(
            ctl.commander().commands[0].cause,
            ScrollCause::AffordanceTapped
        );
        assert!(!ctl.affordance().visible);
        assert!(ctl.arbiter().should_auto_scroll());
    }

    #[test]
    fn coalescing_collapses_adjacent_content_only() {
        let mut ctl = controller(false, true);
        ctl.enqueue(FollowEvent::ContentVersion(1));
        ctl.enqueue(FollowEvent::ContentVersion(2));
        ctl.enqueue(FollowEvent::ContentVersion(3));
        ctl.enqueue(FollowEvent::Phase(ScrollPhase::InMotion));
        ctl.enqueue(FollowEvent::ContentVersion(4));
        assert_eq!(ctl.pending(), 3);
        assert_eq!(ctl.coalesced_reports(), 2);
        ctl.pump();
        assert_eq!(ctl.commander().count(), 2);
    }

    #[test]
    fn coalescing_off_keeps_every_report() {
        let mut ctl = controller(false, false);
        for v in 0..5 {
            ctl.enqueue(FollowEvent::ContentVersion(v));
        }
        assert_eq!(ctl.pending(), 5);
        ctl.pump();
        assert_eq!(ctl.commander().count(), 5);
        assert_eq!(ctl.coalesced_reports(), 0);
    }

    #[test]
    fn into_parts_returns_collaborators() {
        let mut ctl = controller(true, false);
        ctl.report_lock(false);
        let (arbiter, commander, affordance) = ctl.into_parts();
        assert!(!arbiter.lock_to_bottom());
        assert_eq!(commander.count(), 0);
        assert!(affordance.visible);
    }
}
