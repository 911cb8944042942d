//! Error types for resource scopes
use thiserror::Error;

use crate::scope::ScopeState;

/// Boxed error returned by a resource's own `open` / `close`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for scope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while registering or tearing down resources
#[derive(Error, Debug)]
pub enum Error {
    /// The resource's `open` failed; it was not added to the scope
    #[error("Failed to open resource '{name}'")]
    Open {
        /// The name the resource was registered under
        name: String,
        /// The error returned by the resource
        #[source]
        source: BoxError,
    },

    /// The resource's `close` failed during teardown
    ///
    /// Never returned from an operation; only collected in a
    /// [`ScopeReport`](crate::ScopeReport).
    #[error("Error closing resource '{name}'")]
    Close {
        /// The name the resource was registered under
        name: String,
        /// The error returned by the resource
        #[source]
        source: BoxError,
    },

    /// Registration was attempted with an empty name
    #[error("Resource name must not be empty")]
    EmptyName,

    /// Registration was attempted after teardown started
    #[error("Cannot register resource '{name}': scope is {state}")]
    NotActive {
        /// The rejected name
        name: String,
        /// The state the scope was in
        state: ScopeState,
    },
}

impl Error {
    /// Get the resource name associated with this error (if any)
    #[must_use]
    pub fn resource_name(&self) -> Option<&str> {
        match self {
            Self::EmptyName => None,
            Self::Open { name, .. } | Self::Close { name, .. } | Self::NotActive { name, .. } => {
                Some(name)
            }
        }
    }

    /// Borrow the resource's own error, downcast to `E`.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Open { source, .. } | Self::Close { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Take the resource's own error out of this one.
    #[must_use]
    pub fn into_source(self) -> Option<BoxError> {
        match self {
            Self::Open { source, .. } | Self::Close { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct ConnectError;

    #[test]
    fn open_error_keeps_source_for_downcast() {
        let err = Error::Open {
            name: "db".to_string(),
            source: Box::new(ConnectError),
        };
        assert_eq!(err.to_string(), "Failed to open resource 'db'");
        assert_eq!(err.resource_name(), Some("db"));
        assert!(err.downcast_source::<ConnectError>().is_some());
        assert!(err.into_source().unwrap().is::<ConnectError>());
    }

    #[test]
    fn source_chain_reaches_resource_error() {
        let err = Error::Close {
            name: "api".to_string(),
            source: Box::new(ConnectError),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection refused");
    }

    #[test]
    fn errors_without_resource_source() {
        assert_eq!(Error::EmptyName.resource_name(), None);
        assert!(Error::EmptyName.into_source().is_none());

        let err = Error::NotActive {
            name: "late".to_string(),
            state: ScopeState::Closed,
        };
        assert_eq!(err.to_string(), "Cannot register resource 'late': scope is closed");
        assert!(err.downcast_source::<ConnectError>().is_none());
    }
}
