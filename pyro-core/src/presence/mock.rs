//! Mock presence client for testing
//!
//! Clones share state, so a test can hand one clone to a session and keep
//! another to inspect what was pushed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::payload::PresencePayload;
use super::traits::PresenceClient;
use crate::error::PresenceError;

/// Everything the mock client observed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceLog {
    /// Whether a connection is currently open
    pub connected: bool,
    /// Whether `close()` was called
    pub closed: bool,
    /// Successful `connect()` calls
    pub connects: usize,
    /// Payloads accepted by `update()`, oldest first
    pub updates: Vec<PresencePayload>,
}

#[derive(Debug, Default)]
struct MockState {
    log: PresenceLog,
    connect_failure: Option<String>,
    close_failure: Option<String>,
    update_failures: VecDeque<String>,
}

/// In-memory [`PresenceClient`] recording every call
#[derive(Debug, Clone, Default)]
pub struct MockPresence {
    state: Arc<Mutex<MockState>>,
}

impl MockPresence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of observed calls
    pub fn log(&self) -> PresenceLog {
        self.lock().log.clone()
    }

    /// Payloads accepted so far
    pub fn updates(&self) -> Vec<PresencePayload> {
        self.lock().log.updates.clone()
    }

    /// Most recent accepted payload
    pub fn last_update(&self) -> Option<PresencePayload> {
        self.lock().log.updates.last().cloned()
    }

    /// Make the next `connect()` fail
    pub fn fail_connect(&self, message: impl Into<String>) {
        self.lock().connect_failure = Some(message.into());
    }

    /// Make the next `close()` fail
    pub fn fail_close(&self, message: impl Into<String>) {
        self.lock().close_failure = Some(message.into());
    }

    /// Make the next `update()` fail; failures queue up in order
    pub fn queue_update_failure(&self, message: impl Into<String>) {
        self.lock().update_failures.push_back(message.into());
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PresenceClient for MockPresence {
    async fn connect(&mut self) -> Result<(), PresenceError> {
        let mut state = self.lock();
        if let Some(message) = state.connect_failure.take() {
            return Err(PresenceError::Connect(message));
        }
        state.log.connected = true;
        state.log.connects += 1;
        Ok(())
    }

    async fn update(&mut self, payload: &PresencePayload) -> Result<(), PresenceError> {
        let mut state = self.lock();
        if !state.log.connected {
            return Err(PresenceError::NotConnected);
        }
        if let Some(message) = state.update_failures.pop_front() {
            return Err(PresenceError::Update(message));
        }
        state.log.updates.push(payload.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PresenceError> {
        let mut state = self.lock();
        if let Some(message) = state.close_failure.take() {
            return Err(PresenceError::Close(message));
        }
        state.log.connected = false;
        state.log.closed = true;
        Ok(())
    }
}
