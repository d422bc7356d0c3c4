//! Presence action buttons

use serde::{Deserialize, Serialize};

/// Maximum number of buttons the presence service displays
pub const MAX_BUTTONS: usize = 2;

/// A labelled link shown under the presence status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Button {
    label: String,
    url: String,
}

impl Button {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Keep the first [`MAX_BUTTONS`] buttons and drop the rest
pub fn truncate_buttons(mut buttons: Vec<Button>) -> Vec<Button> {
    if buttons.len() > MAX_BUTTONS {
        let dropped: Vec<&str> = buttons[MAX_BUTTONS..].iter().map(Button::label).collect();
        tracing::warn!(
            kept = MAX_BUTTONS,
            dropped = ?dropped,
            "Profile has more buttons than the presence service displays"
        );
        buttons.truncate(MAX_BUTTONS);
    }
    buttons
}
