//! Presence payload - what the presence client displays

use serde::Serialize;

use crate::profile::{Button, Resource};

/// Status pushed to the presence service on every activation and reload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresencePayload {
    pub state: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image: Option<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}
