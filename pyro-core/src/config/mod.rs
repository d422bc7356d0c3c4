//! Configuration and profiles documents
//!
//! The configuration document names the presence application and points
//! at a profiles document:
//!
//! ```text
//! config.json                  resources/profiles.json
//! {                            {
//!   "version": "1.0.0",          "format": "1",
//!   "client_id": "8123...",      "data": [ { "enabled": true, ... } ]
//!   "profiles": "profiles.json"  }
//! }
//! ```
//!
//! Relative profile references resolve against the `resources/` directory
//! next to the configuration file.

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{ConfigLoader, LoadedConfig, RESOURCES_DIR};
pub use types::{AppConfig, DEFAULT_RELOAD_INTERVAL_SECS, ProfilesDocument};
