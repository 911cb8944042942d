//! Sinks for scope events.
//!
//! A scope never talks to a global logger directly; it reports to the
//! [`ScopeObserver`] it was built with. [`TracingObserver`] turns events into
//! `tracing` records, [`RecordingObserver`] keeps them for inspection.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::events::ScopeEvent;

/// Receives every event a scope emits, synchronously and in order.
pub trait ScopeObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &ScopeEvent);
}

impl<F> ScopeObserver for F
where
    F: Fn(&ScopeEvent) + Send + Sync,
{
    fn on_event(&self, event: &ScopeEvent) {
        self(event);
    }
}

/// Format a duration as seconds with four decimals.
#[must_use]
pub fn format_seconds(elapsed: Duration) -> String {
    format!("{:.4}", elapsed.as_secs_f64())
}

// ---------------------------------------------------------------------------
// TracingObserver
// ---------------------------------------------------------------------------

/// Default observer: emits each event as a `tracing` record.
///
/// Failures are logged at `ERROR`, everything else at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScopeObserver for TracingObserver {
    fn on_event(&self, event: &ScopeEvent) {
        match event {
            ScopeEvent::Entered => tracing::info!("Entering resource scope"),
            ScopeEvent::Opened { name } => tracing::info!(resource = %name, "Resource opened"),
            ScopeEvent::OpenFailed { name, error } => {
                tracing::error!(resource = %name, error = %error, "Failed to open resource");
            }
            ScopeEvent::Exiting { outcome } => {
                tracing::info!(outcome = %outcome, "Exiting resource scope");
            }
            ScopeEvent::Closed { name } => tracing::info!(resource = %name, "Resource closed"),
            ScopeEvent::CloseFailed { name, error } => {
                tracing::error!(resource = %name, error = %error, "Error closing resource");
            }
            ScopeEvent::Finished { elapsed } => {
                tracing::info!(seconds = %format_seconds(*elapsed), "Scope duration");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

/// Observer that records every event.
///
/// Clones share the same log, so keep one clone and hand the other to the
/// scope.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ScopeEvent>>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<ScopeEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Names of resources that opened successfully, in order.
    pub fn opened(&self) -> Vec<String> {
        self.names(|e| matches!(e, ScopeEvent::Opened { .. }))
    }

    /// Names of every close attempt, successful or not, in order.
    pub fn close_attempts(&self) -> Vec<String> {
        self.names(ScopeEvent::is_close_attempt)
    }

    /// Names of resources whose close failed, in order.
    pub fn close_failures(&self) -> Vec<String> {
        self.names(|e| matches!(e, ScopeEvent::CloseFailed { .. }))
    }

    /// The duration reported by the last `Finished` event.
    pub fn elapsed(&self) -> Option<Duration> {
        self.events.lock().iter().rev().find_map(|e| match e {
            ScopeEvent::Finished { elapsed } => Some(*elapsed),
            _ => None,
        })
    }

    fn names(&self, filter: impl Fn(&ScopeEvent) -> bool) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|event| filter(*event))
            .filter_map(|e| e.resource_name().map(str::to_string))
            .collect()
    }
}

impl ScopeObserver for RecordingObserver {
    fn on_event(&self, event: &ScopeEvent) {
        self.events.lock().push(event.clone());
    }
}

// ---------------------------------------------------------------------------
// FanoutObserver
// ---------------------------------------------------------------------------

/// Forwards each event to several observers, in insertion order.
#[derive(Clone, Default)]
pub struct FanoutObserver {
    observers: Vec<Arc<dyn ScopeObserver>>,
}

impl FanoutObserver {
    /// Create an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer.
    #[must_use]
    pub fn with(mut self, observer: Arc<dyn ScopeObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of downstream observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether there are no downstream observers.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for FanoutObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ScopeObserver for FanoutObserver {
    fn on_event(&self, event: &ScopeEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
