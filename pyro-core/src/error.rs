//! Error types for pyro-core

use thiserror::Error;

use crate::config::ConfigError;
use crate::extension::{DispatchError, RegistrationError};
use crate::profile::ModelError;

/// Top-level error type for pyro-core
#[derive(Error, Debug)]
pub enum PyroError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Handler registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Profile error: {0}")]
    Model(#[from] ModelError),

    #[error("Presence error: {0}")]
    Presence(#[from] PresenceError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors from the presence client
#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("Failed to connect to presence service: {0}")]
    Connect(String),

    #[error("Presence client is not connected")]
    NotConnected,

    #[error("Presence update failed: {0}")]
    Update(String),

    #[error("Failed to close presence client: {0}")]
    Close(String),
}

/// Errors related to the session state machine
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    #[error("No profiles configured")]
    NoProfiles,

    #[error("Reload interval must be greater than zero")]
    InvalidInterval,

    #[error("Unknown profile #{index} ({count} configured)")]
    UnknownProfile { index: usize, count: usize },

    #[error("Active profile has no button #{0}")]
    UnknownButton(usize),

    #[error("Invalid profile #{index}: {source}")]
    InvalidProfile {
        index: usize,
        #[source]
        source: ModelError,
    },

    #[error("Presence client error: {0}")]
    Presence(#[from] PresenceError),
}

impl SessionError {
    /// True when the error came from the presence client and a later
    /// attempt may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::Presence(_))
    }
}
