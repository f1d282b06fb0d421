#![forbid(unsafe_code)]

//! Time-based scroll animation.
//!
//! The harness stands in for a real animation engine: [`ScrollTween`] moves
//! a fractional row offset toward a target over a duration with easing, and
//! can be retargeted mid-flight without restarting.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Cubic ease-out (slower end than quadratic).
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current eased progress, clamped to [0.0, 1.0].
    fn value(&self) -> f32;
}

// ---------------------------------------------------------------------------
// ScrollTween
// ---------------------------------------------------------------------------

/// Interpolates a row offset from `from` to `to`.
///
/// Elapsed time accumulates as [`Duration`] so many tiny ticks do not drift.
/// Moving the target with [`retarget`](Self::retarget) keeps elapsed time, so
/// a tween chasing a growing feed still finishes on schedule.
#[derive(Debug, Clone, Copy)]
pub struct ScrollTween {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl ScrollTween {
    /// Create a tween over `duration` with cubic ease-out.
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: ease_out_cubic,
        }
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Current interpolated offset.
    pub fn position(&self) -> f32 {
        self.from + (self.to - self.from) * self.value()
    }

    /// Target offset.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Move the end point without resetting progress.
    pub fn retarget(&mut self, to: f32) {
        self.to = to;
    }

    /// Restart from the current position toward `to` over `duration`.
    pub fn restart(&mut self, to: f32, duration: Duration) {
        *self = Self::new(self.position(), to, duration).easing(self.easing);
    }
}

impl Animation for ScrollTween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn tween_reaches_target() {
        let mut tw = ScrollTween::new(0.0, 40.0, MS_100);
        assert_eq!(tw.position(), 0.0);
        tw.tick(MS_100);
        assert!(tw.is_complete());
        assert!((tw.position() - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn many_small_ticks_complete_on_time() {
        let mut tw = ScrollTween::new(0.0, 10.0, MS_100);
        for _ in 0..99 {
            tw.tick(Duration::from_millis(1));
        }
        assert!(!tw.is_complete());
        tw.tick(Duration::from_millis(1));
        assert!(tw.is_complete());
    }

    #[test]
    fn retarget_keeps_progress() {
        let mut tw = ScrollTween::new(0.0, 10.0, MS_100).easing(linear);
        tw.tick(Duration::from_millis(50));
        assert!((tw.position() - 5.0).abs() < 1e-4);
        tw.retarget(20.0);
        assert!((tw.position() - 10.0).abs() < 1e-4);
        tw.tick(Duration::from_millis(50));
        assert!((tw.position() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn restart_begins_at_current_position() {
        let mut tw = ScrollTween::new(0.0, 10.0, MS_100).easing(linear);
        tw.tick(Duration::from_millis(50));
        tw.restart(30.0, MS_100);
        assert!(!tw.is_complete());
        assert!((tw.position() - 5.0).abs() < 1e-4);
        assert_eq!(tw.target(), 30.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut tw = ScrollTween::new(3.0, 9.0, Duration::ZERO);
        tw.tick(Duration::from_nanos(1));
        assert!(tw.is_complete());
        assert!((tw.position() - 9.0).abs() < f32::EPSILON);
    }

    #[test]
    fn easing_functions_are_monotonic() {
        for easing in [linear, ease_out, ease_out_cubic] {
            let mut prev = 0.0f32;
            for i in 0..=100 {
                let t = i as f32 / 100.0;
                let v = easing(t);
                assert!(v >= prev - 0.001, "easing should be monotonic at t={}", t);
                prev = v;
            }
        }
    }
}
