//! Extension error types

use thiserror::Error;

use super::event::LifecycleEvent;
use super::key::HandlerKey;

/// Errors a handler callback can report
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The callback returned an error
    #[error("{0}")]
    Failed(String),

    /// The callback panicked; carries the panic message when one was given
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Create a callback failure with a message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors raised when registering a handler type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Type name is empty or contains dots or whitespace
    #[error("Invalid handler type name '{0}'")]
    InvalidName(String),

    /// Source name is empty or contains dots or whitespace
    #[error("Invalid handler source '{0}'")]
    InvalidSource(String),

    /// The handler type declared no lifecycle events
    #[error("Handler type '{0}' does not implement any lifecycle event")]
    NoEvents(HandlerKey),

    /// The key is already registered and replacement was not requested
    #[error("Handler type '{0}' is already registered")]
    Duplicate(HandlerKey),
}

/// One listener that failed during an emission
#[derive(Debug)]
pub struct ListenerFailure {
    /// Handler type whose instance failed
    pub handler: HandlerKey,
    /// Event being dispatched
    pub event: LifecycleEvent,
    /// What went wrong
    pub error: HandlerError,
}

/// Failures collected over a full listener pass
///
/// Returned by [`EventBus::emit`](super::EventBus::emit) only after every
/// listener for the event has run.
#[derive(Error, Debug)]
#[error("{} listener(s) failed during {event}", .failures.len())]
pub struct DispatchError {
    pub event: LifecycleEvent,
    pub failures: Vec<ListenerFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_display() {
        let err = HandlerError::failed("sensor offline");
        assert_eq!(err.to_string(), "sensor offline");

        let err = HandlerError::Panicked("index out of bounds".into());
        assert!(err.to_string().contains("panicked"));
        assert!(err.to_string().contains("index out of bounds"));
    }

    #[test]
    fn test_registration_error_display() {
        let err = RegistrationError::Duplicate(HandlerKey::new("sample", "Test"));
        assert!(err.to_string().contains("sample.Test"));

        let err = RegistrationError::InvalidName("bad.name".into());
        assert!(err.to_string().contains("bad.name"));
    }

    #[test]
    fn test_dispatch_error_counts_failures() {
        let err = DispatchError {
            event: LifecycleEvent::Reload,
            failures: vec![ListenerFailure {
                handler: HandlerKey::new("sample", "Test"),
                event: LifecycleEvent::Reload,
                error: HandlerError::failed("boom"),
            }],
        };
        assert_eq!(err.to_string(), "1 listener(s) failed during Reload");
    }
}
