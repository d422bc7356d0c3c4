//! Extension system
//!
//! - [`HandlerRegistry`]: catalog of handler types keyed by [`HandlerKey`]
//! - [`EventBus`]: one instance per registered type, dispatching
//!   [`LifecycleEvent`]s to the instances that declared them
//! - [`Handler`]: the trait extension code implements
//!
//! # Example
//!
//! ```ignore
//! use pyro_core::extension::{EventSet, HandlerRegistry, HandlerType};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_in("sample", HandlerType::new("Test", EventSet::LOAD, |_| Test))?;
//!
//! let mut bus = EventBus::new(client, &registry);
//! bus.emit(Event::Load(&mut profile))?;
//! ```

mod bus;
mod error;
mod event;
mod handler;
mod key;
mod registry;

pub use bus::{EventBus, HandlerId};
pub use error::{DispatchError, HandlerError, ListenerFailure, RegistrationError};
pub use event::{Event, EventSet, LifecycleEvent};
pub use handler::{ClientHandle, ClientInfo, Handler, HandlerResult};
pub use key::{HandlerKey, InvalidHandlerKey};
pub use registry::{Extension, HandlerRegistry, HandlerType};
