//! Presence session and its update loop
//!
//! A [`Session`] owns the profiles, the [`EventBus`](crate::extension::EventBus)
//! and the presence client. It walks the
//! `Disconnected -> Connected -> Active -> Closed` state machine and notifies
//! handlers around every profile transition.

mod options;
mod state;

pub use options::SessionOptions;
pub use state::{Session, SessionState};
