//! The capability contract a scope consumes, and the handle it hands back.
//!
//! A resource declares up front which lifecycle hooks it wants called via
//! [`Manageable::capabilities`]. The scope samples that once, at registration,
//! and skips the hooks the resource did not ask for.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::error::BoxError;

/// Which lifecycle hooks a resource exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capabilities {
    /// Neither hook; registration and teardown are no-ops.
    None,
    /// Only `open` is called.
    OpenOnly,
    /// Only `close` is called.
    CloseOnly,
    /// Both hooks are called.
    Both,
}

impl Capabilities {
    /// Build from two flags.
    #[must_use]
    pub const fn new(open: bool, close: bool) -> Self {
        match (open, close) {
            (false, false) => Self::None,
            (true, false) => Self::OpenOnly,
            (false, true) => Self::CloseOnly,
            (true, true) => Self::Both,
        }
    }

    /// Whether `open` should be called at registration.
    #[must_use]
    pub const fn can_open(self) -> bool {
        matches!(self, Self::OpenOnly | Self::Both)
    }

    /// Whether `close` should be called at teardown.
    #[must_use]
    pub const fn can_close(self) -> bool {
        matches!(self, Self::CloseOnly | Self::Both)
    }
}

/// A resource whose lifecycle can be driven by a [`ResourceScope`](crate::ResourceScope).
///
/// `open` and `close` default to no-ops so an implementor only writes the
/// hooks it declares in [`capabilities`](Manageable::capabilities).
pub trait Manageable {
    /// The hooks this resource exposes.
    fn capabilities(&self) -> Capabilities;

    /// Acquire whatever the resource needs. Called once, at registration.
    fn open(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Release the resource. Called at most once, during teardown.
    fn close(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Shared handle to a registered resource.
///
/// The scope keeps one clone for teardown; the caller uses the other.
pub struct Handle<R> {
    inner: Rc<RefCell<R>>,
}

impl<R> Handle<R> {
    pub(crate) fn new(resource: R) -> Self {
        Self {
            inner: Rc::new(RefCell::new(resource)),
        }
    }

    /// Immutably borrow the resource.
    ///
    /// # Panics
    /// Panics if the resource is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, R> {
        self.inner.borrow()
    }

    /// Mutably borrow the resource.
    ///
    /// # Panics
    /// Panics if the resource is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, R> {
        self.inner.borrow_mut()
    }

    /// Whether two handles point at the same registered resource.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<R: Manageable + 'static> Handle<R> {
    pub(crate) fn erased(&self) -> Rc<RefCell<dyn Manageable>> {
        self.inner.clone()
    }
}

impl<R> Clone for Handle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for Handle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(resource) => f.debug_tuple("Handle").field(&*resource).finish(),
            Err(_) => f.debug_tuple("Handle").field(&"<borrowed>").finish(),
        }
    }
}

/// Wrapper registering a plain value with no lifecycle hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unmanaged<T>(pub T);

impl<T> Unmanaged<T> {
    /// Unwrap the value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Manageable for Unmanaged<T> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::None
    }
}

impl<T> std::ops::Deref for Unmanaged<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> std::ops::DerefMut for Unmanaged<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}
