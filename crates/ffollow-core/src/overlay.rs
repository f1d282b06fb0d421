#![forbid(unsafe_code)]

//! Jump-to-bottom affordance policy.
//!
//! Visibility is derived from arbiter state every time it is asked for and is
//! never stored, so it cannot go stale relative to the state it describes.

use crate::anchor::ScrollPhase;

/// Derived presentation state for the jump-to-bottom affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayVisibility {
    /// Whether the affordance should render.
    pub visible: bool,
    /// Whether it accepts taps. Always equal to `visible`.
    pub enabled: bool,
}

impl OverlayVisibility {
    /// Visible exactly when auto-follow is suspended and the viewport has
    /// settled.
    #[inline]
    #[must_use]
    pub const fn derive(should_auto_scroll: bool, phase: ScrollPhase) -> Self {
        let visible = !should_auto_scroll && phase.is_idle();
        Self {
            visible,
            enabled: visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_table() {
        let cases = [
            (true, ScrollPhase::Idle, false),
            (true, ScrollPhase::InMotion, false),
            (false, ScrollPhase::Idle, true),
            (false, ScrollPhase::InMotion, false),
        ];
        for (follow, phase, expected) in cases {
            let v = OverlayVisibility::derive(follow, phase);
            assert_eq!(v.visible, expected, "follow={follow} phase={phase}");
            assert_eq!(v.enabled, v.visible);
        }
    }

    #[test]
    fn default_is_hidden() {
        let hidden = OverlayVisibility::default();
        assert!(!hidden.visible);
        assert!(!hidden.enabled);
    }
}
