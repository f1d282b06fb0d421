#![forbid(unsafe_code)]

//! Identity contracts for anchors and content versions, plus scroll phase.

use std::fmt;
use std::hash::Hash;

/// Opaque identifier for a content element that the viewport can report at
/// its trailing edge and that scroll commands can target.
///
/// Only equality and hashing are relied upon. Any `Clone + Eq + Hash + Debug`
/// type qualifies through the blanket impl.
pub trait AnchorId: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> AnchorId for T {}

/// Opaque value describing "what the content looks like right now".
///
/// The arbiter only ever compares versions for equality: a report equal to
/// the previous one is a duplicate, anything else means new content arrived.
/// No ordering is assumed, so a hash, a counter or a length all work.
pub trait ContentVersion: Clone + Eq + fmt::Debug {}

impl<T: Clone + Eq + fmt::Debug> ContentVersion for T {}

/// Whether the viewport is currently moving.
///
/// `InMotion` covers both user momentum and programmatic animation; the
/// arbiter does not distinguish the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollPhase {
    /// Settled; no scroll offset change in progress.
    #[default]
    Idle,
    /// Offset is changing (drag, fling or animated scroll).
    InMotion,
}

impl ScrollPhase {
    /// Stable lowercase name for logs and JSON diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InMotion => "in_motion",
        }
    }

    /// Whether the viewport is settled.
    #[inline]
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for ScrollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
