//! The handler trait extension code implements

use std::sync::Arc;

use crate::profile::{Button, Profile};

use super::error::HandlerError;

/// Result of a single handler callback
pub type HandlerResult = Result<(), HandlerError>;

/// Read-only view of the running client, shared by every handler instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Application id the presence client connects with
    pub client_id: String,
    /// Version string from the configuration document
    pub version: String,
    /// Number of configured profiles
    pub profile_count: usize,
}

/// Shared reference to the running client, handed to each handler on creation
pub type ClientHandle = Arc<ClientInfo>;

/// Extension code reacting to session lifecycle events.
///
/// Every callback has a default no-op implementation, so handlers only
/// override what they care about. Which callbacks actually get invoked is
/// decided by the [`EventSet`](super::EventSet) declared when the handler
/// type is registered, not by which methods are overridden.
///
/// Callbacks run synchronously on the session's task and should return
/// quickly; sampling a few system metrics is fine, network round trips
/// are not.
pub trait Handler: Send {
    /// Called once after the presence client connects
    fn on_start(&mut self) -> HandlerResult {
        Ok(())
    }

    /// Called once before the presence client is released
    fn on_close(&mut self) -> HandlerResult {
        Ok(())
    }

    /// Called when `profile` becomes the active profile
    fn on_load(&mut self, _profile: &mut Profile) -> HandlerResult {
        Ok(())
    }

    /// Called when `profile` stops being the active profile
    fn on_unload(&mut self, _profile: &mut Profile) -> HandlerResult {
        Ok(())
    }

    /// Called on every reload tick for the active profile
    fn on_reload(&mut self, _profile: &mut Profile) -> HandlerResult {
        Ok(())
    }

    /// Called when the active profile is activated again
    fn on_update(&mut self, _profile: &mut Profile) -> HandlerResult {
        Ok(())
    }

    /// Called when a button of the active profile is clicked
    fn on_click(&mut self, _profile: &mut Profile, _button: &Button) -> HandlerResult {
        Ok(())
    }
}
