//! End-to-end feed scenarios against the simulated viewport.

use std::time::Duration;

use ffollow_core::command::{RecordingAffordance, RecordingCommander};
use ffollow_core::{
    ArbiterConfig, ControllerConfig, FollowController, FollowEvent, ScrollCause, ScrollPhase,
};
use ffollow_harness::{FeedSimulator, RowId, SimConfig, Step};

const MS_3: Duration = Duration::from_millis(3);
const MS_5: Duration = Duration::from_millis(5);

fn settled_at_bottom(config: SimConfig) -> FeedSimulator {
    let mut sim = FeedSimulator::new(config);
    sim.run(&[Step::Stream { lines: 100, every: MS_5 }, Step::Settle]);
    assert!(sim.at_bottom());
    sim
}

fn locked() -> SimConfig {
    SimConfig {
        arbiter: ArbiterConfig::new(RowId::Bottom).lock_to_bottom(true),
        ..SimConfig::default()
    }
}

// ============================================================================
// Streaming
// ============================================================================

#[test]
fn fast_stream_stays_pinned_without_flicker() {
    let mut sim = FeedSimulator::new(SimConfig::default());
    sim.run(&[Step::Stream { lines: 500, every: MS_3 }, Step::Settle]);

    assert!(sim.at_bottom());
    assert_eq!(sim.viewport().commands().content, 500);
    assert!(sim.visibility_changes().is_empty());
    assert!(sim.controller().arbiter().should_auto_scroll());
}

#[test]
fn bursty_stream_one_command_per_version() {
    let mut sim = FeedSimulator::new(SimConfig::default());
    sim.run(&[
        Step::Append(40),
        Step::Append(0),
        Step::Append(5),
        Step::Settle,
    ]);
    // Appending nothing leaves the version unchanged.
    assert_eq!(sim.viewport().commands().content, 2);
    assert_eq!(sim.controller().arbiter().stats().duplicate_reports, 1);
    assert!(sim.at_bottom());
}

// ============================================================================
// Drag
// ============================================================================

#[test]
fn drag_mid_stream_absorbs_new_content() {
    let mut sim = FeedSimulator::new(SimConfig::default());
    sim.run(&[
        Step::Stream { lines: 100, every: MS_5 },
        Step::DragStart,
        Step::DragBy(-40.0),
    ]);
    let before = sim.viewport().commands().content;
    let top = sim.viewport().top_row();

    sim.step(&Step::Stream { lines: 50, every: MS_5 });

    assert_eq!(sim.viewport().commands().content, before);
    assert_eq!(sim.viewport().top_row(), top);
    assert!(!sim.button().visible, "hidden while the finger is down");
    assert_eq!(sim.controller().arbiter().stats().absorbed_changes, 50);

    sim.step(&Step::DragEnd);
    assert!(!sim.at_bottom());
    assert!(sim.button().visible);
    assert!(sim.button().enabled);
}

#[test]
fn drag_released_at_bottom_rearms() {
    let mut sim = settled_at_bottom(SimConfig::default());
    sim.run(&[Step::DragStart, Step::DragBy(-10.0), Step::DragBy(10.0)]);
    assert!(!sim.controller().arbiter().should_auto_scroll());

    sim.step(&Step::DragEnd);
    assert!(sim.controller().arbiter().should_auto_scroll());
    assert!(!sim.button().visible);

    sim.run(&[Step::Append(1), Step::Settle]);
    assert!(sim.at_bottom());
}

#[test]
fn button_waits_for_the_view_to_settle() {
    let mut sim = settled_at_bottom(SimConfig::default());
    sim.run(&[Step::DragStart, Step::DragBy(-30.0), Step::DragEnd]);
    assert!(sim.button().visible);

    // The button hides on tap and stays hidden through the animation.
    sim.step(&Step::Tap);
    assert!(!sim.button().visible);
    sim.step(&Step::Advance(Duration::from_millis(1)));
    assert_eq!(sim.controller().arbiter().state().phase, ScrollPhase::InMotion);
    assert!(!sim.button().visible);
    sim.step(&Step::Settle);
    assert!(!sim.button().visible);
    assert!(sim.at_bottom());
    assert_eq!(sim.viewport().commands().tap, 1);
}

// ============================================================================
// Taps
// ============================================================================

#[test]
fn taps_while_following_are_dropped() {
    let mut sim = settled_at_bottom(SimConfig::default());
    sim.step(&Step::Tap);
    assert_eq!(sim.viewport().commands().tap, 0);
    assert_eq!(sim.controller().dropped_taps(), 1);
}

#[test]
fn taps_mid_drag_are_dropped() {
    let mut sim = settled_at_bottom(SimConfig::default());
    sim.run(&[Step::DragStart, Step::DragBy(-30.0), Step::Tap]);
    assert_eq!(sim.viewport().commands().tap, 0);
    assert_eq!(sim.controller().dropped_taps(), 1);
}

// ============================================================================
// Lock
// ============================================================================

#[test]
fn locked_drag_through_bottom_rearms_before_release() {
    let mut sim = settled_at_bottom(locked());
    sim.run(&[Step::DragStart, Step::DragBy(-30.0)]);
    assert!(!sim.controller().arbiter().should_auto_scroll());

    sim.step(&Step::DragBy(30.0));
    assert!(sim.controller().arbiter().should_auto_scroll());
    assert_eq!(sim.controller().arbiter().stats().anchor_rearms, 1);

    sim.step(&Step::DragEnd);
    assert!(sim.visibility_changes().is_empty());
}

#[test]
fn lock_engage_returns_to_bottom_once() {
    let mut sim = settled_at_bottom(SimConfig::default());
    sim.run(&[Step::DragStart, Step::DragBy(-50.0), Step::DragEnd]);
    assert!(sim.button().visible);

    sim.run(&[Step::Lock(true), Step::Lock(true), Step::Settle]);
    assert_eq!(sim.viewport().commands().lock, 1);
    assert!(sim.at_bottom());
    assert!(!sim.button().visible);
}

#[test]
fn lock_release_suspends_without_moving() {
    let mut sim = settled_at_bottom(locked());
    let top = sim.viewport().top_row();

    sim.step(&Step::Lock(false));
    assert!(!sim.controller().arbiter().should_auto_scroll());
    assert_eq!(sim.viewport().top_row(), top);
    assert_eq!(sim.viewport().commands().total(), 100);
    assert!(sim.button().visible);

    sim.step(&Step::Append(3));
    assert_eq!(sim.viewport().commands().content, 100);
}

// ============================================================================
// Controller plumbing
// ============================================================================

#[test]
fn coalesced_burst_issues_one_command() {
    let mut ctl: FollowController<RowId, u64, _, _> = FollowController::new(
        ArbiterConfig::new(RowId::Bottom),
        ControllerConfig::default().coalesce_content(true),
        RecordingCommander::default(),
        RecordingAffordance::default(),
    );
    for v in 1..=5 {
        ctl.enqueue(FollowEvent::ContentVersion(v));
    }
    ctl.enqueue(FollowEvent::DragStarted);
    for v in 6..=10 {
        ctl.enqueue(FollowEvent::ContentVersion(v));
    }
    assert_eq!(ctl.pending(), 3);
    assert_eq!(ctl.pump(), 3);

    let commands = ctl.commander().commands.clone();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].cause, ScrollCause::ContentChanged);
    assert_eq!(commands[0].anchor, RowId::Bottom);
    assert_eq!(ctl.coalesced_reports(), 8);
    assert_eq!(ctl.arbiter().stats().absorbed_changes, 1);
}

#[test]
fn simulator_and_recorder_agree() {
    let mut sim = FeedSimulator::new(SimConfig::default());
    sim.run(&[
        Step::Stream { lines: 30, every: MS_5 },
        Step::DragStart,
        Step::DragBy(-5.0),
        Step::Append(4),
        Step::DragEnd,
        Step::Tap,
        Step::Settle,
    ]);
    let stats = sim.controller().arbiter().stats();
    let log = sim.viewport().commands();
    assert_eq!(stats.content_commands, log.content);
    assert_eq!(stats.tap_commands, log.tap);
    assert_eq!(stats.lock_commands, log.lock);
    assert_eq!(stats.commands(), log.total());
}
