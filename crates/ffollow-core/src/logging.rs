#![forbid(unsafe_code)]

//! Structured logging for follow decisions.
//!
//! What gets recorded, by level:
//!
//! | Level   | Event                                   | Fields                        |
//! |---------|-----------------------------------------|-------------------------------|
//! | `debug` | arbiter created                         | `lock_to_bottom`, `should_auto_scroll` |
//! | `debug` | auto-follow changed                     | `should_auto_scroll`, `reason` |
//! | `debug` | scroll to bottom                        | `cause`                       |
//! | `trace` | follow event applied by the controller  | `event`                       |
//! | `trace` | bottom anchor / phase reported          | `anchor` or `phase`           |
//! | `trace` | duplicate version, absorbed change, dropped tap | none                  |
//!
//! `reason` is one of `drag_start`, `drag_end_at_bottom`,
//! `anchor_at_bottom_locked`, `lock_engaged`, `lock_released`,
//! `affordance_tapped`. Each `pump` runs inside a `follow_pump` span.
//!
//! Without the `tracing` feature the macros below expand to nothing.
//! `tracing-json` adds [`init_json_subscriber`] for hosts that want the
//! records as JSON lines.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, trace_span};

// When tracing is not enabled, provide no-op macros
#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op trace_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// A no-op span for when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the no-op span (does nothing).
    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }
}

/// A no-op span guard.
#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;

/// Install a global JSON subscriber writing to `writer`.
///
/// `directive` uses `EnvFilter` syntax (`"ffollow_core=debug"`); when `None`,
/// `RUST_LOG` is consulted and falls back to `info`. Hosts that own the
/// terminal should pass a file writer here rather than stdout.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber<W>(directive: Option<&str>, writer: W) -> bool
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::EnvFilter;

    let filter = match directive {
        Some(d) => EnvFilter::new(d),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_current_span(false)
        .try_init()
        .is_ok()
}
