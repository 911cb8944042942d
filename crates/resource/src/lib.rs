//! # Warden Resource
//!
//! Scoped lifecycle management for named resources. A [`ResourceScope`]
//! opens resources as they are registered and closes them in reverse
//! registration order when the scope ends, on every exit path. A failing
//! `open` is returned to the caller; a failing `close` is reported and the
//! sweep moves on.
//!
//! Scopes report what they do to an injected [`ScopeObserver`]; the default
//! [`TracingObserver`] emits `tracing` records.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod error;
pub mod events;
pub mod observer;
pub mod resource;
pub mod scope;

pub use error::{BoxError, Error, Result};
pub use events::{Outcome, ScopeEvent};
pub use observer::{
    FanoutObserver, RecordingObserver, ScopeObserver, TracingObserver, format_seconds,
};
pub use resource::{Capabilities, Handle, Manageable, Unmanaged};
pub use scope::{ResourceScope, ScopeReport, ScopeState, scoped};
