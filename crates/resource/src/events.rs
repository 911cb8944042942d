//! Events emitted over a scope's lifetime.
//!
//! A [`ResourceScope`](crate::ResourceScope) reports every step of its
//! lifecycle as a [`ScopeEvent`] to the observer it was built with.

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// How the body of a scope ended.
///
/// Reported at exit; teardown behaves the same for every outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The body returned normally.
    Completed,
    /// The body returned an error.
    Failed,
    /// The thread is unwinding from a panic.
    Panicked,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Panicked => write!(f, "panicked"),
        }
    }
}

// ---------------------------------------------------------------------------
// ScopeEvent
// ---------------------------------------------------------------------------

/// Events emitted during a scope's lifecycle, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeEvent {
    /// The scope was entered.
    Entered,
    /// A resource's `open` succeeded during registration.
    Opened {
        /// The registered name.
        name: String,
    },
    /// A resource's `open` failed; the resource is not tracked.
    OpenFailed {
        /// The registered name.
        name: String,
        /// The resource's error message.
        error: String,
    },
    /// Teardown is starting.
    Exiting {
        /// How the body ended.
        outcome: Outcome,
    },
    /// A resource's `close` succeeded.
    Closed {
        /// The registered name.
        name: String,
    },
    /// A resource's `close` failed; teardown continues.
    CloseFailed {
        /// The registered name.
        name: String,
        /// The resource's error message.
        error: String,
    },
    /// Teardown finished.
    Finished {
        /// Wall-clock time since the scope was entered.
        elapsed: Duration,
    },
}

impl ScopeEvent {
    /// The resource this event is about, if any.
    #[must_use]
    pub fn resource_name(&self) -> Option<&str> {
        match self {
            Self::Opened { name }
            | Self::OpenFailed { name, .. }
            | Self::Closed { name }
            | Self::CloseFailed { name, .. } => Some(name),
            Self::Entered | Self::Exiting { .. } | Self::Finished { .. } => None,
        }
    }

    /// Whether this event reports a failed hook.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::OpenFailed { .. } | Self::CloseFailed { .. })
    }

    /// Whether this event is a close attempt, successful or not.
    #[must_use]
    pub fn is_close_attempt(&self) -> bool {
        matches!(self, Self::Closed { .. } | Self::CloseFailed { .. })
    }
}
