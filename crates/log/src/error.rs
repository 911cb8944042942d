//! Error types for logger setup

use thiserror::Error;

/// Result type for logger operations
pub type LogResult<T> = std::result::Result<T, LogError>;

/// Errors raised while building or installing the subscriber
#[derive(Error, Debug)]
pub enum LogError {
    /// The level filter could not be parsed
    #[error("Invalid filter '{filter}': {reason}")]
    Filter {
        /// The filter directive as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// The format name is not one of the supported formats
    #[error("Unknown log format '{0}'")]
    UnknownFormat(String),

    /// A global subscriber was already installed
    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_error_message_names_the_directive() {
        let err = LogError::Filter {
            filter: "info,=".to_string(),
            reason: "bad directive".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid filter 'info,=': bad directive");
    }

    #[test]
    fn unknown_format_message() {
        let err = LogError::UnknownFormat("xml".to_string());
        assert_eq!(err.to_string(), "Unknown log format 'xml'");
    }
}
