use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::ConfigError;

/// Default seconds between reload ticks
pub const DEFAULT_RELOAD_INTERVAL_SECS: u64 = 15;

/// The configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration version string
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,

    /// Presence application id; JSON strings and integers are both accepted
    #[serde(deserialize_with = "string_or_number")]
    pub client_id: String,

    /// Profiles document reference
    pub profiles: PathBuf,

    /// Seconds between reload ticks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_interval_secs: Option<u64>,
}

impl AppConfig {
    /// Reload interval with the default applied
    pub fn reload_interval(&self) -> Result<Duration, ConfigError> {
        match self.reload_interval_secs {
            Some(0) => Err(ConfigError::Invalid(
                "reload_interval_secs must be at least 1".to_string(),
            )),
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => Ok(Duration::from_secs(DEFAULT_RELOAD_INTERVAL_SECS)),
        }
    }
}

/// The profiles document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilesDocument {
    /// Template format version
    #[serde(deserialize_with = "string_or_number")]
    pub format: String,

    /// Profile records in configuration order, validated one by one when
    /// the session is built
    pub data: Vec<Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Unsigned(u64),
        Float(f64),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(text) => text,
        Repr::Unsigned(n) => n.to_string(),
        Repr::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_accepts_integer() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "version": "1.0.0",
            "client_id": 812345678901234567u64,
            "profiles": "profiles.json"
        }))
        .unwrap();
        assert_eq!(config.client_id, "812345678901234567");
        assert_eq!(config.profiles, PathBuf::from("profiles.json"));
    }

    #[test]
    fn test_default_reload_interval() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "version": "1",
            "client_id": "abc",
            "profiles": "p.json"
        }))
        .unwrap();
        assert_eq!(
            config.reload_interval().unwrap(),
            Duration::from_secs(DEFAULT_RELOAD_INTERVAL_SECS)
        );
    }

    #[test]
    fn test_zero_reload_interval_rejected() {
        let config = AppConfig {
            version: "1".into(),
            client_id: "abc".into(),
            profiles: "p.json".into(),
            reload_interval_secs: Some(0),
        };
        assert!(matches!(
            config.reload_interval(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_client_id_rejected() {
        let result: Result<AppConfig, _> = serde_json::from_value(serde_json::json!({
            "version": "1",
            "profiles": "p.json"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_profiles_document_numeric_format() {
        let doc: ProfilesDocument = serde_json::from_value(serde_json::json!({
            "format": 1.2,
            "data": [{ "enabled": true, "state": "Idle", "details": "" }]
        }))
        .unwrap();
        assert_eq!(doc.format, "1.2");
        assert_eq!(doc.data.len(), 1);
    }
}
