//! Handlers shipped with the binary, registered under the `builtin` source

mod clock;
mod system;

use pyro_core::{HandlerRegistry, Profile, RegistrationError};

pub use clock::Clock;
pub use system::SystemStats;

/// Source every built-in handler is registered under
pub const SOURCE: &str = "builtin";

/// Register every built-in handler type
pub fn register_all(registry: &mut HandlerRegistry) -> Result<(), RegistrationError> {
    registry.register_extension::<Clock>(SOURCE)?;
    registry.register_extension::<SystemStats>(SOURCE)?;
    Ok(())
}

/// Whether `profile` names the built-in handler `name` as its owner
fn owns(profile: &Profile, name: &str) -> bool {
    profile
        .handler_key()
        .is_some_and(|key| key.source() == SOURCE && key.type_name() == name)
}
