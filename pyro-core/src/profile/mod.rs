//! Profile and button model
//!
//! Profiles are loaded from [`ProfileRecord`]s, keep their text as
//! [`Template`]s and produce the [`PresencePayload`](crate::presence::PresencePayload)
//! pushed to the presence client.

mod button;
mod error;
mod model;
mod record;
mod resource;
mod template;

pub use button::{Button, MAX_BUTTONS};
pub use error::ModelError;
pub use model::Profile;
pub use record::ProfileRecord;
pub use resource::{LEGACY_RESOURCE_NAMESPACE, RESOURCE_NAMESPACE, Resource};
pub use template::{Template, render};
