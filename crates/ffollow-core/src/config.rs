#![forbid(unsafe_code)]

//! Arbiter and controller configuration.
//!
//! Configuration is plain data with builder setters. Tunables that a host
//! may want to change without recompiling can be overridden from the
//! environment:
//!
//! | Variable | Values | Effect |
//! |----------|--------|--------|
//! | `FFOLLOW_SCROLL_MS` | integer milliseconds | commanded scroll duration |
//! | `FFOLLOW_LOCK_TO_BOTTOM` | `1/0/true/false/on/off/yes/no` | initial lock |
//! | `FFOLLOW_COALESCE` | same as above | content coalescing in the controller |

use std::fmt;
use std::time::Duration;

use crate::anchor::AnchorId;

/// Environment variable overriding the commanded scroll duration.
pub const ENV_SCROLL_MS: &str = "FFOLLOW_SCROLL_MS";
/// Environment variable overriding the initial lock value.
pub const ENV_LOCK_TO_BOTTOM: &str = "FFOLLOW_LOCK_TO_BOTTOM";
/// Environment variable toggling content coalescing.
pub const ENV_COALESCE: &str = "FFOLLOW_COALESCE";

/// Default animation duration for commanded scrolls.
pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(250);

/// Errors produced while reading configuration overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A boolean variable held something other than a recognized flag.
    InvalidBool {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// A duration variable was not a non-negative integer.
    InvalidDuration {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBool { key, value } => {
                write!(f, "{key}: expected a boolean flag, got {value:?}")
            }
            Self::InvalidDuration { key, value } => {
                write!(f, "{key}: expected milliseconds, got {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for one [`AutoScrollArbiter`](crate::arbiter::AutoScrollArbiter).
///
/// The bottom anchor is fixed for the arbiter's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbiterConfig<A> {
    /// Anchor identifying the logical bottom of all content.
    pub bottom_anchor: A,
    /// Initial value of the external lock.
    pub lock_to_bottom: bool,
    /// Initial auto-follow state. Forced on when `lock_to_bottom` is set.
    pub auto_scroll: bool,
    /// Whether commanded scrolls are animated.
    pub animated: bool,
    /// Duration hint attached to every command.
    pub scroll_duration: Duration,
}

impl<A: AnchorId> ArbiterConfig<A> {
    /// Defaults: unlocked, following, animated, 250ms.
    #[must_use]
    pub fn new(bottom_anchor: A) -> Self {
        Self {
            bottom_anchor,
            lock_to_bottom: false,
            auto_scroll: true,
            animated: true,
            scroll_duration: DEFAULT_SCROLL_DURATION,
        }
    }

    /// Set the initial lock value.
    #[must_use]
    pub fn lock_to_bottom(mut self, lock: bool) -> Self {
        self.lock_to_bottom = lock;
        self
    }

    /// Set the initial auto-follow state.
    #[must_use]
    pub fn auto_scroll(mut self, enabled: bool) -> Self {
        self.auto_scroll = enabled;
        self
    }

    /// Set whether commands request animation.
    #[must_use]
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Set the duration hint for commanded scrolls.
    #[must_use]
    pub fn scroll_duration(mut self, duration: Duration) -> Self {
        self.scroll_duration = duration;
        self
    }

    /// Apply overrides from the process environment.
    pub fn from_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides using a custom environment lookup (for tests).
    pub fn with_env_overrides<F>(mut self, get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = get_env(ENV_SCROLL_MS) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDuration {
                    key: ENV_SCROLL_MS,
                    value: raw.clone(),
                })?;
            self.scroll_duration = Duration::from_millis(ms);
        }
        if let Some(raw) = get_env(ENV_LOCK_TO_BOTTOM) {
            self.lock_to_bottom = parse_flag(ENV_LOCK_TO_BOTTOM, &raw)?;
        }
        Ok(self)
    }
}

/// Configuration for [`FollowController`](crate::controller::FollowController).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Collapse adjacent queued content reports into the latest one.
    pub coalesce_content: bool,
}

impl ControllerConfig {
    /// Set content coalescing.
    #[must_use]
    pub fn coalesce_content(mut self, enabled: bool) -> Self {
        self.coalesce_content = enabled;
        self
    }

    /// Apply overrides from the process environment.
    pub fn from_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides using a custom environment lookup (for tests).
    pub fn with_env_overrides<F>(mut self, get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = get_env(ENV_COALESCE) {
            self.coalesce_content = parse_flag(ENV_COALESCE, &raw)?;
        }
        Ok(self)
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}
