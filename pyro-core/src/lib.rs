//! pyro-core: presence profiles driven by extension handlers
//!
//! - **Extensions** - [`HandlerRegistry`] catalogs handler types; an
//!   [`EventBus`] instantiates them and dispatches [`LifecycleEvent`]s
//! - **Profiles** - [`Profile`] keeps templated text, icons and buttons and
//!   produces the [`PresencePayload`]
//! - **Sessions** - [`Session`] drives connect, profile activation, periodic
//!   reload and close against a [`PresenceClient`]
//! - **Configuration** - [`ConfigLoader`] reads the configuration and
//!   profiles documents
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use pyro_core::{ConfigLoader, HandlerRegistry, MockPresence, Session};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let loaded = ConfigLoader::load(Path::new("config.json"))?;
//!     let registry = HandlerRegistry::new();
//!
//!     let mut session = Session::from_config(loaded, &registry, Box::new(MockPresence::new()))?;
//!     session.start().await?;
//!     session.reload().await?;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extension;
pub mod presence;
pub mod profile;
pub mod session;

// Re-export key types for convenience
pub use config::{AppConfig, ConfigError, ConfigLoader, LoadedConfig, ProfilesDocument};
pub use error::{PresenceError, PyroError, SessionError};
pub use extension::{
    ClientHandle, ClientInfo, DispatchError, Event, EventBus, EventSet, Extension, Handler,
    HandlerError, HandlerKey, HandlerRegistry, HandlerResult, HandlerType, LifecycleEvent,
    RegistrationError,
};
pub use presence::{MockPresence, PresenceClient, PresencePayload};
pub use profile::{Button, ModelError, Profile, ProfileRecord, Resource, Template};
pub use session::{Session, SessionOptions, SessionState};
