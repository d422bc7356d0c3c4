//! Icon resources known to the presence service

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// Namespace used when writing resource references
pub const RESOURCE_NAMESPACE: &str = "source";

/// Older profile files reference resources under `client.`
pub const LEGACY_RESOURCE_NAMESPACE: &str = "client";

/// Icon assets uploaded to the presence application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Campfire,
    Profile,
    Default,
    Study,
    Cafe,
    Game,
    #[serde(alias = "away_from_keyboard")]
    Afk,
}

impl Resource {
    /// Alias for [`Resource::Afk`]
    #[allow(non_upper_case_globals)]
    pub const AwayFromKeyboard: Resource = Resource::Afk;

    /// Asset key sent to the presence service
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Campfire => "campfire",
            Resource::Profile => "profile",
            Resource::Default => "default",
            Resource::Study => "study",
            Resource::Cafe => "cafe",
            Resource::Game => "game",
            Resource::Afk => "afk",
        }
    }

    /// Resolve a `source.<name>` reference
    ///
    /// `client.<name>` is accepted as well; any other namespace, or a name
    /// that is not a known resource, is rejected.
    pub fn parse_reference(reference: &str) -> Result<Self, ModelError> {
        let name = reference
            .strip_prefix(RESOURCE_NAMESPACE)
            .or_else(|| reference.strip_prefix(LEGACY_RESOURCE_NAMESPACE))
            .and_then(|rest| rest.strip_prefix('.'))
            .ok_or_else(|| ModelError::InvalidResourceNamespace(reference.to_string()))?;
        name.parse()
    }

    /// The `source.<name>` reference for this resource
    pub fn reference(&self) -> String {
        format!("{RESOURCE_NAMESPACE}.{}", self.as_str())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "campfire" => Ok(Resource::Campfire),
            "profile" => Ok(Resource::Profile),
            "default" => Ok(Resource::Default),
            "study" => Ok(Resource::Study),
            "cafe" => Ok(Resource::Cafe),
            "game" => Ok(Resource::Game),
            "afk" | "away_from_keyboard" => Ok(Resource::Afk),
            other => Err(ModelError::UnknownResource(other.to_string())),
        }
    }
}
