use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::error::ConfigError;
use super::types::{AppConfig, ProfilesDocument};

/// Directory, next to the configuration file, holding profiles documents
pub const RESOURCES_DIR: &str = "resources";

/// Both documents, read and parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub profiles: ProfilesDocument,
    /// Where the profiles document was read from
    pub profiles_path: PathBuf,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration document and the profiles document it names
    pub fn load(config_path: &Path) -> Result<LoadedConfig, ConfigError> {
        let config = Self::load_config(config_path)?;
        config.reload_interval()?;

        let profiles_path = Self::profiles_path(config_path, &config);
        let profiles = Self::load_profiles(&profiles_path)?;
        tracing::debug!(
            path = %profiles_path.display(),
            format = %profiles.format,
            count = profiles.data.len(),
            "Loaded profiles document"
        );

        Ok(LoadedConfig {
            config,
            profiles,
            profiles_path,
        })
    }

    pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
        read_json(path)
    }

    pub fn load_profiles(path: &Path) -> Result<ProfilesDocument, ConfigError> {
        read_json(path)
    }

    /// Resolve the profiles reference of `config`
    ///
    /// Absolute references are used as-is; relative ones are looked up in
    /// the `resources/` directory beside the configuration file.
    pub fn profiles_path(config_path: &Path, config: &AppConfig) -> PathBuf {
        if config.profiles.is_absolute() {
            return config.profiles.clone();
        }
        config_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(RESOURCES_DIR)
            .join(&config.profiles)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
