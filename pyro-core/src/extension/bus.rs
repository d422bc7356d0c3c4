//! EventBus - one handler instance per registered type, plus the
//! per-event listener table used to dispatch lifecycle events

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use super::error::{DispatchError, HandlerError, ListenerFailure};
use super::event::{Event, LifecycleEvent};
use super::handler::{ClientHandle, Handler, HandlerResult};
use super::key::HandlerKey;
use super::registry::HandlerRegistry;

/// Index of a handler instance within an [`EventBus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

/// A live handler instance
struct HandlerSlot {
    key: HandlerKey,
    instance: Box<dyn Handler>,
}

/// Dispatches lifecycle events to handler instances
///
/// Built once from a registry snapshot. Instances and listener lists are
/// fixed afterwards; listeners for an event run in the registration order
/// of their handler types.
pub struct EventBus {
    client: ClientHandle,
    slots: Vec<HandlerSlot>,
    /// source -> type name -> instance
    index: HashMap<String, HashMap<String, HandlerId>>,
    listeners: [Vec<HandlerId>; LifecycleEvent::COUNT],
}

impl EventBus {
    /// Instantiate every registered handler type against `client`
    pub fn new(client: ClientHandle, registry: &HandlerRegistry) -> Self {
        let mut slots = Vec::with_capacity(registry.len());
        let mut index: HashMap<String, HashMap<String, HandlerId>> = HashMap::new();
        let mut listeners: [Vec<HandlerId>; LifecycleEvent::COUNT] =
            std::array::from_fn(|_| Vec::new());

        for (key, handler_type) in registry.iter() {
            let id = HandlerId(slots.len());
            let instance = handler_type.instantiate(&client);

            for event in handler_type.events().events() {
                listeners[event.index()].push(id);
            }
            index
                .entry(key.source().to_string())
                .or_default()
                .insert(key.type_name().to_string(), id);

            tracing::debug!(
                handler = %key,
                events = ?handler_type.events(),
                "Handler instantiated"
            );
            slots.push(HandlerSlot {
                key: key.clone(),
                instance,
            });
        }

        Self {
            client,
            slots,
            index,
            listeners,
        }
    }

    /// Invoke every listener registered for the event, in order
    ///
    /// A listener that returns an error or panics does not stop the pass;
    /// all failures are returned together once every listener has run.
    pub fn emit(&mut self, event: Event<'_>) -> Result<(), DispatchError> {
        let kind = event.kind();
        let listeners = &self.listeners[kind.index()];
        let slots = &mut self.slots;
        let mut failures = Vec::new();

        match event {
            Event::Start => invoke(slots, listeners, kind, &mut failures, |h| h.on_start()),
            Event::Close => invoke(slots, listeners, kind, &mut failures, |h| h.on_close()),
            Event::Load(profile) => {
                invoke(slots, listeners, kind, &mut failures, |h| h.on_load(profile))
            }
            Event::Unload(profile) => {
                invoke(slots, listeners, kind, &mut failures, |h| h.on_unload(profile))
            }
            Event::Reload(profile) => {
                invoke(slots, listeners, kind, &mut failures, |h| h.on_reload(profile))
            }
            Event::Update(profile) => {
                invoke(slots, listeners, kind, &mut failures, |h| h.on_update(profile))
            }
            Event::Click { profile, button } => {
                invoke(slots, listeners, kind, &mut failures, |h| {
                    h.on_click(profile, button)
                })
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError {
                event: kind,
                failures,
            })
        }
    }

    /// Find the instance registered as `source.type_name`
    pub fn lookup(&self, source: &str, type_name: &str) -> Option<HandlerId> {
        self.index.get(source)?.get(type_name).copied()
    }

    /// Find the instance registered under `key`
    pub fn lookup_key(&self, key: &HandlerKey) -> Option<HandlerId> {
        self.lookup(key.source(), key.type_name())
    }

    /// Key of the handler type behind an instance
    pub fn key(&self, id: HandlerId) -> Option<&HandlerKey> {
        self.slots.get(id.0).map(|slot| &slot.key)
    }

    /// Handler keys listening to `event`, in dispatch order
    pub fn listeners(&self, event: LifecycleEvent) -> impl Iterator<Item = &HandlerKey> {
        self.listeners[event.index()]
            .iter()
            .map(|id| &self.slots[id.0].key)
    }

    /// Number of handler instances
    pub fn handler_count(&self) -> usize {
        self.slots.len()
    }

    /// The client every instance is bound to
    pub fn client(&self) -> &ClientHandle {
        &self.client
    }
}

fn invoke(
    slots: &mut [HandlerSlot],
    listeners: &[HandlerId],
    event: LifecycleEvent,
    failures: &mut Vec<ListenerFailure>,
    mut call: impl FnMut(&mut dyn Handler) -> HandlerResult,
) {
    for id in listeners {
        let slot = &mut slots[id.0];
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| call(slot.instance.as_mut())));

        let error = match result {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e,
            Err(payload) => HandlerError::Panicked(panic_message(payload.as_ref())),
        };

        tracing::warn!(
            handler = %slot.key,
            event = %event,
            error = %error,
            "Handler callback failed"
        );
        failures.push(ListenerFailure {
            handler: slot.key.clone(),
            event,
            error,
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
