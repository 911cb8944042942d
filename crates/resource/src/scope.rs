//! Scoped acquisition and ordered release of resources.
//!
//! A [`ResourceScope`] opens each resource as it is registered and closes
//! every registered resource, newest first, when the scope ends. The sweep
//! runs from `Drop`, so it happens on every exit path: normal return, an
//! early `?`, or a panic unwinding through the scope.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{BoxError, Error, Result};
use crate::events::{Outcome, ScopeEvent};
use crate::observer::{ScopeObserver, TracingObserver};
use crate::resource::{Capabilities, Handle, Manageable, Unmanaged};

/// Lifecycle state of a [`ResourceScope`].
///
/// `Active` → `Closing` → `Closed`. Registration is only accepted while
/// `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeState {
    /// Accepting registrations.
    Active,
    /// The teardown sweep is running.
    Closing,
    /// Teardown finished.
    Closed,
}

impl fmt::Display for ScopeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Closing => write!(f, "closing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Summary of a completed teardown sweep.
#[derive(Debug)]
pub struct ScopeReport {
    /// How the scope body ended.
    pub outcome: Outcome,
    /// Names whose `close` succeeded, in sweep order.
    pub closed: Vec<String>,
    /// Close failures, in sweep order. Each is an [`Error::Close`].
    pub failures: Vec<Error>,
    /// Wall-clock time from enter to the end of the sweep.
    pub elapsed: Duration,
}

impl ScopeReport {
    /// Whether every close attempt succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

struct Entry {
    name: String,
    capabilities: Capabilities,
    resource: Rc<RefCell<dyn Manageable>>,
}

/// Registry of named resources with guaranteed reverse-order teardown.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_resource::{Capabilities, Manageable, RecordingObserver, ResourceScope};
///
/// struct Conn;
///
/// impl Manageable for Conn {
///     fn capabilities(&self) -> Capabilities {
///         Capabilities::Both
///     }
/// }
///
/// let recorder = RecordingObserver::new();
/// {
///     let mut scope = ResourceScope::enter(Arc::new(recorder.clone()));
///     scope.register("first", Conn).unwrap();
///     scope.register("second", Conn).unwrap();
/// }
/// assert_eq!(recorder.close_attempts(), vec!["second", "first"]);
/// ```
pub struct ResourceScope {
    entries: Vec<Entry>,
    started: Instant,
    state: ScopeState,
    observer: Arc<dyn ScopeObserver>,
}

impl ResourceScope {
    /// Enter a scope that reports through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::enter(Arc::new(TracingObserver))
    }

    /// Enter a scope that reports to `observer`.
    pub fn enter(observer: Arc<dyn ScopeObserver>) -> Self {
        let scope = Self {
            entries: Vec::new(),
            started: Instant::now(),
            state: ScopeState::Active,
            observer,
        };
        scope.emit(ScopeEvent::Entered);
        scope
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ScopeState {
        self.state
    }

    /// Number of resources tracked for teardown.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no resources are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of tracked resources in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Time since the scope was entered.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Open `resource` (if it exposes `open`) and track it for teardown.
    ///
    /// Names need not be unique. A resource whose `open` fails is dropped,
    /// never tracked, and never closed.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyName`] if `name` is empty; `open` is not called.
    /// - [`Error::Open`] carrying the resource's own error if `open` fails.
    /// - [`Error::NotActive`] if teardown has already started.
    pub fn register<R>(&mut self, name: impl Into<String>, mut resource: R) -> Result<Handle<R>>
    where
        R: Manageable + 'static,
    {
        let name = name.into();
        if self.state != ScopeState::Active {
            return Err(Error::NotActive {
                name,
                state: self.state,
            });
        }
        if name.is_empty() {
            return Err(Error::EmptyName);
        }

        let capabilities = resource.capabilities();
        if capabilities.can_open() {
            if let Err(source) = resource.open() {
                self.emit(ScopeEvent::OpenFailed {
                    name: name.clone(),
                    error: source.to_string(),
                });
                return Err(Error::Open { name, source });
            }
            self.emit(ScopeEvent::Opened { name: name.clone() });
        }

        let handle = Handle::new(resource);
        self.entries.push(Entry {
            name,
            capabilities,
            resource: handle.erased(),
        });
        Ok(handle)
    }

    /// Track a plain value that has no lifecycle hooks.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register), minus open failures.
    pub fn manage<T: 'static>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Result<Handle<Unmanaged<T>>> {
        self.register(name, Unmanaged(value))
    }

    /// End the scope after a body that completed normally.
    pub fn close(self) -> ScopeReport {
        self.close_with(Outcome::Completed)
    }

    /// End the scope, reporting how the body ended.
    pub fn close_with(mut self, outcome: Outcome) -> ScopeReport {
        self.teardown(outcome)
    }

    fn teardown(&mut self, outcome: Outcome) -> ScopeReport {
        self.state = ScopeState::Closing;
        self.emit(ScopeEvent::Exiting { outcome });

        let mut closed = Vec::new();
        let mut failures = Vec::new();
        let entries = std::mem::take(&mut self.entries);

        for entry in entries.into_iter().rev() {
            if !entry.capabilities.can_close() {
                continue;
            }
            match close_entry(&entry) {
                Ok(()) => {
                    self.emit(ScopeEvent::Closed {
                        name: entry.name.clone(),
                    });
                    closed.push(entry.name);
                }
                Err(source) => {
                    self.emit(ScopeEvent::CloseFailed {
                        name: entry.name.clone(),
                        error: source.to_string(),
                    });
                    failures.push(Error::Close {
                        name: entry.name,
                        source,
                    });
                }
            }
        }

        self.state = ScopeState::Closed;
        let elapsed = self.started.elapsed();
        self.emit(ScopeEvent::Finished { elapsed });

        ScopeReport {
            outcome,
            closed,
            failures,
            elapsed,
        }
    }

    fn emit(&self, event: ScopeEvent) {
        self.observer.on_event(&event);
    }
}

fn close_entry(entry: &Entry) -> std::result::Result<(), BoxError> {
    match entry.resource.try_borrow_mut() {
        Ok(mut resource) => resource.close(),
        Err(_) => Err(format!("resource '{}' is still borrowed", entry.name).into()),
    }
}

impl Default for ResourceScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        if self.state == ScopeState::Active {
            let outcome = if std::thread::panicking() {
                Outcome::Panicked
            } else {
                Outcome::Completed
            };
            self.teardown(outcome);
        }
    }
}

impl fmt::Debug for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceScope")
            .field("resources", &self.names().collect::<Vec<_>>())
            .field("state", &self.state)
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

/// Run `body` inside a fresh scope and return its result unchanged.
///
/// Teardown runs after the body whatever it returns, with the outcome set
/// from the result. Close failures are reported to `observer` only.
pub fn scoped<T, E, F>(observer: Arc<dyn ScopeObserver>, body: F) -> std::result::Result<T, E>
where
    F: FnOnce(&mut ResourceScope) -> std::result::Result<T, E>,
{
    let mut scope = ResourceScope::enter(observer);
    let result = body(&mut scope);
    let outcome = if result.is_ok() {
        Outcome::Completed
    } else {
        Outcome::Failed
    };
    scope.close_with(outcome);
    result
}
