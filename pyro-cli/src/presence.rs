//! Presence client that writes every payload to the log

use async_trait::async_trait;
use pyro_core::{PresenceClient, PresenceError, PresencePayload};

/// Logs payloads as JSON instead of sending them anywhere
pub struct LogPresence {
    client_id: String,
    connected: bool,
}

impl LogPresence {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            connected: false,
        }
    }
}

#[async_trait]
impl PresenceClient for LogPresence {
    async fn connect(&mut self) -> Result<(), PresenceError> {
        tracing::info!(client_id = %self.client_id, "Presence client connected");
        self.connected = true;
        Ok(())
    }

    async fn update(&mut self, payload: &PresencePayload) -> Result<(), PresenceError> {
        if !self.connected {
            return Err(PresenceError::NotConnected);
        }
        let json =
            serde_json::to_string(payload).map_err(|e| PresenceError::Update(e.to_string()))?;
        tracing::info!(payload = %json, "Presence updated");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PresenceError> {
        self.connected = false;
        tracing::info!(client_id = %self.client_id, "Presence client released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_requires_connection() {
        let mut client = LogPresence::new("1");
        let payload = PresencePayload::default();

        assert!(matches!(
            client.update(&payload).await,
            Err(PresenceError::NotConnected)
        ));
        client.connect().await.unwrap();
        client.update(&payload).await.unwrap();
        client.close().await.unwrap();
        assert!(client.update(&payload).await.is_err());
    }
}
