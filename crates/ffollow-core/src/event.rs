#![forbid(unsafe_code)]

//! Inbound events.
//!
//! Every signal that can reach the arbiter is one [`FollowEvent`] variant, so
//! a host can serialize them onto a single queue and replay them
//! deterministically.

use crate::anchor::ScrollPhase;

/// One inbound signal for the arbiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowEvent<A, V> {
    /// The user began a manual drag.
    DragStarted,
    /// The user released the drag.
    DragEnded,
    /// The anchor at the viewport's trailing edge changed.
    BottomAnchor(A),
    /// The viewport's motion phase changed.
    Phase(ScrollPhase),
    /// The content owner reported its current version.
    ContentVersion(V),
    /// The external lock value changed.
    Lock(bool),
    /// The jump-to-bottom affordance was tapped.
    AffordanceTapped,
}

impl<A, V> FollowEvent<A, V> {
    /// Short event name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DragStarted => "drag_started",
            Self::DragEnded => "drag_ended",
            Self::BottomAnchor(_) => "bottom_anchor",
            Self::Phase(_) => "phase",
            Self::ContentVersion(_) => "content_version",
            Self::Lock(_) => "lock",
            Self::AffordanceTapped => "affordance_tapped",
        }
    }

    /// Whether this is a content report (the only kind that may be coalesced).
    #[inline]
    #[must_use]
    pub const fn is_content(&self) -> bool {
        matches!(self, Self::ContentVersion(_))
    }
}
