use std::time::Duration;

use crate::config::{AppConfig, ConfigError, DEFAULT_RELOAD_INTERVAL_SECS};

/// Settings a session is built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub client_id: String,
    pub version: String,
    /// Time between reload ticks in [`Session::run`](super::Session::run)
    pub reload_interval: Duration,
}

impl SessionOptions {
    pub fn new(client_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            version: version.into(),
            reload_interval: Duration::from_secs(DEFAULT_RELOAD_INTERVAL_SECS),
        }
    }

    pub fn with_reload_interval(mut self, interval: Duration) -> Self {
        self.reload_interval = interval;
        self
    }

    /// Options described by a configuration document
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(&config.client_id, &config.version)
            .with_reload_interval(config.reload_interval()?))
    }
}
