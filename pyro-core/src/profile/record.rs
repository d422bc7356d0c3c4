//! Serialized form of a profile, as found in the profiles document

use serde::{Deserialize, Serialize};

use super::button::Button;

/// One entry of the profiles document's `data` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub enabled: bool,
    /// State template, may contain `{name}` placeholders
    pub state: String,
    /// Details template
    pub details: String,
    /// `source.<name>` resource reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    /// `source.<name>` resource reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
    #[serde(default)]
    pub buttons: Vec<Button>,
    /// Owning handler as `source.TypeName`
    #[serde(default, alias = "script", skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}
