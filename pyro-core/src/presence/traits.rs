//! PresenceClient trait
//!
//! The wire protocol to the presence service lives outside this crate;
//! sessions only talk to it through this trait.

use async_trait::async_trait;

use super::payload::PresencePayload;
use crate::error::PresenceError;

/// Connection to the external presence service
#[async_trait]
pub trait PresenceClient: Send + Sync {
    /// Open the connection
    async fn connect(&mut self) -> Result<(), PresenceError>;

    /// Replace the displayed status with `payload`
    async fn update(&mut self, payload: &PresencePayload) -> Result<(), PresenceError>;

    /// Release the connection
    async fn close(&mut self) -> Result<(), PresenceError>;
}
