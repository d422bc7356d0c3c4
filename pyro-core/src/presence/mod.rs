//! Presence client boundary

mod mock;
mod payload;
mod traits;

pub use mock::{MockPresence, PresenceLog};
pub use payload::PresencePayload;
pub use traits::PresenceClient;
