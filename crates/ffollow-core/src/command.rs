#![forbid(unsafe_code)]

//! Outbound contracts: scroll commands and the jump-to-bottom affordance.
//!
//! The arbiter never performs a scroll itself. It hands a [`ScrollCommand`]
//! to whatever implements [`ScrollCommander`] and forgets about it; whether
//! the scroll landed is observed later through anchor and phase reports.

use std::fmt;
use std::time::Duration;

use crate::anchor::AnchorId;

/// Why a scroll-to-bottom command was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollCause {
    /// New content arrived while auto-follow was armed.
    ContentChanged,
    /// The external lock transitioned to `true`.
    LockEngaged,
    /// The user tapped the jump-to-bottom affordance.
    AffordanceTapped,
}

impl ScrollCause {
    /// Stable name for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentChanged => "content_changed",
            Self::LockEngaged => "lock_engaged",
            Self::AffordanceTapped => "affordance_tapped",
        }
    }
}

impl fmt::Display for ScrollCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to bring `anchor` into view at the trailing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollCommand<A> {
    /// Target anchor. Always the arbiter's fixed bottom anchor.
    pub anchor: A,
    /// Whether the commander should animate the move.
    pub animated: bool,
    /// Animation duration hint. Cosmetic; has no effect on arbitration.
    pub duration: Duration,
    /// What caused the command.
    pub cause: ScrollCause,
}

/// Performs scroll commands. Fire-and-forget: implementations must not block
/// and have no way to report failure back into the arbiter.
///
/// Issuing a second command while a previous one is still animating should
/// retarget rather than queue.
pub trait ScrollCommander<A: AnchorId> {
    /// Scroll so that `command.anchor` sits at the trailing edge.
    fn scroll_to(&mut self, command: &ScrollCommand<A>);
}

impl<A: AnchorId, F> ScrollCommander<A> for F
where
    F: FnMut(&ScrollCommand<A>),
{
    fn scroll_to(&mut self, command: &ScrollCommand<A>) {
        self(command);
    }
}

/// The jump-to-bottom control. Its inbound tap is routed back to the
/// arbiter by the owner (see [`crate::controller::FollowController::tap`]).
pub trait Affordance {
    /// Show or hide the control.
    fn set_visible(&mut self, visible: bool);
    /// Allow or block interaction with the control.
    fn set_enabled(&mut self, enabled: bool);
}

/// Affordance sink for hosts that do not render one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAffordance;

impl Affordance for NoAffordance {
    fn set_visible(&mut self, _visible: bool) {}
    fn set_enabled(&mut self, _enabled: bool) {}
}

#[cfg(any(test, feature = "test-helpers"))]
pub use recording::{RecordingAffordance, RecordingCommander};

#[cfg(any(test, feature = "test-helpers"))]
mod recording {
    use super::{Affordance, AnchorId, ScrollCommand, ScrollCommander};

    /// Commander that stores every command it receives.
    #[derive(Debug, Clone)]
    pub struct RecordingCommander<A> {
        /// Commands in the order they were issued.
        pub commands: Vec<ScrollCommand<A>>,
    }

    impl<A> Default for RecordingCommander<A> {
        fn default() -> Self {
            Self {
                commands: Vec::new(),
            }
        }
    }

    impl<A> RecordingCommander<A> {
        /// Number of commands seen so far.
        #[must_use]
        pub fn count(&self) -> usize {
            self.commands.len()
        }

        /// Drain and return the recorded commands.
        pub fn take(&mut self) -> Vec<ScrollCommand<A>> {
            std::mem::take(&mut self.commands)
        }
    }

    impl<A: AnchorId> ScrollCommander<A> for RecordingCommander<A> {
        fn scroll_to(&mut self, command: &ScrollCommand<A>) {
            self.commands.push(command.clone());
        }
    }

    /// Affordance that remembers its current state and every push it got.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingAffordance {
        /// Current visibility.
        pub visible: bool,
        /// Current enabled state.
        pub enabled: bool,
        /// Number of `set_visible` calls received.
        pub visibility_pushes: usize,
    }

    impl Affordance for RecordingAffordance {
        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
            self.visibility_pushes += 1;
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
    }
}
