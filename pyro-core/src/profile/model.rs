//! Profile - a displayable presence status

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use serde::Deserialize;
use serde_json::Value;

use super::button::{Button, truncate_buttons};
use super::error::ModelError;
use super::record::ProfileRecord;
use super::resource::Resource;
use super::template::Template;
use crate::extension::{HandlerId, HandlerKey};
use crate::presence::PresencePayload;

/// A presence status: templated text, optional icons and up to two buttons
///
/// Built once from a [`ProfileRecord`]. Handlers change what is displayed
/// through [`render`](Profile::render) and the setters; the enabled flag,
/// buttons and owning handler are fixed after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    enabled: bool,
    state: Template,
    details: Template,
    large_icon: Option<Resource>,
    large_text: Option<String>,
    small_icon: Option<Resource>,
    small_text: Option<String>,
    buttons: Vec<Button>,
    handler_key: Option<HandlerKey>,
    handler: Option<HandlerId>,
}

impl Profile {
    /// Build a profile from already-parsed JSON
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let record =
            ProfileRecord::deserialize(value).map_err(|e| ModelError::Validation(e.to_string()))?;
        Self::from_record(record)
    }

    /// Build a profile from a record, resolving icon and handler references
    pub fn from_record(record: ProfileRecord) -> Result<Self, ModelError> {
        let large_icon = record
            .large_image
            .as_deref()
            .map(Resource::parse_reference)
            .transpose()?;
        let small_icon = record
            .small_image
            .as_deref()
            .map(Resource::parse_reference)
            .transpose()?;
        let handler_key = record
            .handler
            .as_deref()
            .map(HandlerKey::parse)
            .transpose()?;

        Ok(Self {
            enabled: record.enabled,
            state: Template::new(record.state),
            details: Template::new(record.details),
            large_icon,
            large_text: record.large_text,
            small_icon,
            small_text: record.small_text,
            buttons: truncate_buttons(record.buttons),
            handler_key,
            handler: None,
        })
    }

    /// Serialize back to a record
    ///
    /// Text fields carry their templates, not the rendered text. Icons are
    /// written as `source.<name>` references.
    pub fn to_record(&self) -> ProfileRecord {
        ProfileRecord {
            enabled: self.enabled,
            state: self.state.source().to_string(),
            details: self.details.source().to_string(),
            large_image: self.large_icon.map(|r| r.reference()),
            large_text: self.large_text.clone(),
            small_image: self.small_icon.map(|r| r.reference()),
            small_text: self.small_text.clone(),
            buttons: self.buttons.clone(),
            handler: self.handler_key.as_ref().map(ToString::to_string),
        }
    }

    /// The payload pushed to the presence client, with rendered text
    pub fn payload(&self) -> PresencePayload {
        PresencePayload {
            state: self.state.rendered().to_string(),
            details: self.details.rendered().to_string(),
            large_image: self.large_icon,
            large_text: self.large_text.clone(),
            small_image: self.small_icon,
            small_text: self.small_text.clone(),
            buttons: self.buttons.clone(),
        }
    }

    /// Re-render state and details from their templates
    pub fn render<K, V>(&mut self, vars: &HashMap<K, V>)
    where
        K: Borrow<str> + Hash + Eq,
        V: Display,
    {
        self.state.render(vars);
        self.details.render(vars);
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Rendered state text
    pub fn state(&self) -> &str {
        self.state.rendered()
    }

    pub fn state_template(&self) -> &str {
        self.state.source()
    }

    /// Rendered details text
    pub fn details(&self) -> &str {
        self.details.rendered()
    }

    pub fn details_template(&self) -> &str {
        self.details.source()
    }

    pub fn large_icon(&self) -> Option<Resource> {
        self.large_icon
    }

    pub fn large_text(&self) -> Option<&str> {
        self.large_text.as_deref()
    }

    pub fn small_icon(&self) -> Option<Resource> {
        self.small_icon
    }

    pub fn small_text(&self) -> Option<&str> {
        self.small_text.as_deref()
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Owning handler reference as written in the profile
    pub fn handler_key(&self) -> Option<&HandlerKey> {
        self.handler_key.as_ref()
    }

    /// Owning handler instance, once resolved by the session
    pub fn handler(&self) -> Option<HandlerId> {
        self.handler
    }

    pub(crate) fn bind_handler(&mut self, handler: Option<HandlerId>) {
        self.handler = handler;
    }

    /// Overwrite the rendered state text; the template is kept
    pub fn set_state(&mut self, text: impl Into<String>) {
        self.state.set_rendered(text);
    }

    /// Overwrite the rendered details text; the template is kept
    pub fn set_details(&mut self, text: impl Into<String>) {
        self.details.set_rendered(text);
    }

    pub fn set_large_icon(&mut self, icon: Resource) {
        self.large_icon = Some(icon);
    }

    pub fn set_large_text(&mut self, text: impl Into<String>) {
        self.large_text = Some(text.into());
    }

    pub fn set_small_icon(&mut self, icon: Resource) {
        self.small_icon = Some(icon);
    }

    pub fn set_small_text(&mut self, text: impl Into<String>) {
        self.small_text = Some(text.into());
    }

    /// Set a field from an untyped value.
    ///
    /// Text fields take strings. Icon fields take a resource name or a
    /// `source.<name>` reference. The value is checked before anything is
    /// assigned, so a failed call leaves the profile unchanged.
    pub fn set_field(&mut self, field: &str, value: &Value) -> Result<(), ModelError> {
        match field {
            "state" => self.set_state(expect_str("state", value)?),
            "details" => self.set_details(expect_str("details", value)?),
            "large_text" => self.set_large_text(expect_str("large_text", value)?),
            "small_text" => self.set_small_text(expect_str("small_text", value)?),
            "large_image" => self.set_large_icon(expect_resource("large_image", value)?),
            "small_image" => self.set_small_icon(expect_resource("small_image", value)?),
            other => return Err(ModelError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

fn expect_str<'v>(field: &'static str, value: &'v Value) -> Result<&'v str, ModelError> {
    value.as_str().ok_or(ModelError::TypeMismatch {
        field,
        expected: "a string",
    })
}

fn expect_resource(field: &'static str, value: &Value) -> Result<Resource, ModelError> {
    let text = value.as_str().ok_or(ModelError::TypeMismatch {
        field,
        expected: "a resource name",
    })?;
    if text.contains('.') {
        Resource::parse_reference(text)
    } else {
        text.parse()
    }
}
