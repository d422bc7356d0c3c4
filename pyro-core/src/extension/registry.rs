//! Handler registry - catalog of extension handler types
//!
//! The host process fills a [`HandlerRegistry`] during its initialization
//! pass and hands it to the session, which builds its event bus from it.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;

use super::error::RegistrationError;
use super::event::EventSet;
use super::handler::{ClientHandle, Handler};
use super::key::{HandlerKey, is_valid_segment};

type Factory = dyn Fn(&ClientHandle) -> Box<dyn Handler> + Send + Sync;

/// A registrable handler type: a name, the events it implements and a
/// constructor producing instances bound to a client
#[derive(Clone)]
pub struct HandlerType {
    name: String,
    events: EventSet,
    factory: Arc<Factory>,
}

impl HandlerType {
    /// Describe a handler type from a constructor closure
    pub fn new<F, H>(name: impl Into<String>, events: EventSet, factory: F) -> Self
    where
        F: Fn(&ClientHandle) -> H + Send + Sync + 'static,
        H: Handler + 'static,
    {
        Self {
            name: name.into(),
            events,
            factory: Arc::new(move |client: &ClientHandle| -> Box<dyn Handler> {
                Box::new(factory(client))
            }),
        }
    }

    /// Describe a handler type from its [`Extension`] implementation
    pub fn of<E: Extension>() -> Self {
        Self::new(E::NAME, E::EVENTS, E::create)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Events this type declared it implements
    pub fn events(&self) -> EventSet {
        self.events
    }

    pub(crate) fn instantiate(&self, client: &ClientHandle) -> Box<dyn Handler> {
        (self.factory)(client)
    }
}

impl fmt::Debug for HandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerType")
            .field("name", &self.name)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

/// Statically described handler type
///
/// ```ignore
/// struct Greeter;
///
/// impl Handler for Greeter {
///     fn on_load(&mut self, profile: &mut Profile) -> HandlerResult {
///         profile.set_details("hello");
///         Ok(())
///     }
/// }
///
/// impl Extension for Greeter {
///     const NAME: &'static str = "Greeter";
///     const EVENTS: EventSet = EventSet::LOAD;
///
///     fn create(_client: &ClientHandle) -> Self {
///         Greeter
///     }
/// }
///
/// registry.register_in("sample", HandlerType::of::<Greeter>())?;
/// ```
pub trait Extension: Handler + Sized + 'static {
    /// Type name, the second half of the handler key
    const NAME: &'static str;
    /// Lifecycle events the type implements
    const EVENTS: EventSet;

    /// Create an instance bound to `client`
    fn create(client: &ClientHandle) -> Self;
}

/// Registry of handler types, keyed by (source, type name)
///
/// Iteration follows registration order. Registering a key again replaces
/// the type but keeps its original position.
#[derive(Debug, Default, Clone)]
pub struct HandlerRegistry {
    entries: IndexMap<HandlerKey, HandlerType>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler type under the caller's source
    ///
    /// The source is the file stem of the calling source file, or the
    /// directory name when called from a `mod.rs`.
    #[track_caller]
    pub fn register(&mut self, handler_type: HandlerType) -> Result<(), RegistrationError> {
        let source = caller_source(Location::caller());
        self.register_in(source, handler_type)
    }

    /// Register a handler type under an explicit source, replacing any
    /// existing entry with the same key
    pub fn register_in(
        &mut self,
        source: impl Into<String>,
        handler_type: HandlerType,
    ) -> Result<(), RegistrationError> {
        let key = validate(source.into(), &handler_type)?;
        if let Some(previous) = self.entries.insert(key.clone(), handler_type) {
            tracing::debug!(
                handler = %key,
                previous_events = ?previous.events(),
                "Handler type replaced"
            );
        } else {
            tracing::debug!(handler = %key, "Handler type registered");
        }
        Ok(())
    }

    /// Register a handler type, failing if the key is already taken
    pub fn try_register_in(
        &mut self,
        source: impl Into<String>,
        handler_type: HandlerType,
    ) -> Result<(), RegistrationError> {
        let key = validate(source.into(), &handler_type)?;
        if self.entries.contains_key(&key) {
            return Err(RegistrationError::Duplicate(key));
        }
        self.entries.insert(key, handler_type);
        Ok(())
    }

    /// Register an [`Extension`] type under an explicit source
    pub fn register_extension<E: Extension>(
        &mut self,
        source: impl Into<String>,
    ) -> Result<(), RegistrationError> {
        self.register_in(source, HandlerType::of::<E>())
    }

    /// Snapshot of all registered types: source -> type name -> type
    pub fn all_registered(&self) -> BTreeMap<&str, BTreeMap<&str, &HandlerType>> {
        let mut snapshot: BTreeMap<&str, BTreeMap<&str, &HandlerType>> = BTreeMap::new();
        for (key, handler_type) in &self.entries {
            snapshot
                .entry(key.source())
                .or_default()
                .insert(key.type_name(), handler_type);
        }
        snapshot
    }

    /// Registered types in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&HandlerKey, &HandlerType)> {
        self.entries.iter()
    }

    pub fn get(&self, key: &HandlerKey) -> Option<&HandlerType> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate(source: String, handler_type: &HandlerType) -> Result<HandlerKey, RegistrationError> {
    if !is_valid_segment(&source) {
        return Err(RegistrationError::InvalidSource(source));
    }
    if !is_valid_segment(handler_type.name()) {
        return Err(RegistrationError::InvalidName(handler_type.name().to_string()));
    }
    let key = HandlerKey::new(source, handler_type.name());
    if handler_type.events().is_empty() {
        return Err(RegistrationError::NoEvents(key));
    }
    Ok(key)
}

fn caller_source(location: &Location<'_>) -> String {
    let path = Path::new(location.file());
    let stem = path.file_stem().and_then(|s| s.to_str());
    let name = match stem {
        Some("mod") => path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .or(stem),
        other => other,
    };
    name.unwrap_or("main").replace(['.', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::LifecycleEvent;

    struct Noop;

    impl Handler for Noop {}

    impl Extension for Noop {
        const NAME: &'static str = "Noop";
        const EVENTS: EventSet = EventSet::START;

        fn create(_client: &ClientHandle) -> Self {
            Noop
        }
    }

    fn noop(name: &str, events: EventSet) -> HandlerType {
        HandlerType::new(name, events, |_| Noop)
    }

    fn keys(registry: &HandlerRegistry) -> Vec<String> {
        registry.iter().map(|(key, _)| key.to_string()).collect()
    }

    #[test]
    fn test_registry_default_is_empty() {
        let registry = HandlerRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.all_registered().is_empty());
    }

    #[test]
    fn test_register_uses_caller_file_as_source() {
        let mut registry = HandlerRegistry::new();
        registry.register(noop("Test", EventSet::LOAD)).unwrap();

        let key = HandlerKey::new("registry", "Test");
        assert!(registry.get(&key).is_some());
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let mut registry = HandlerRegistry::new();
        registry.register_in("zeta", noop("B", EventSet::LOAD)).unwrap();
        registry.register_in("alpha", noop("A", EventSet::LOAD)).unwrap();
        registry.register_in("zeta", noop("A", EventSet::LOAD)).unwrap();

        assert_eq!(keys(&registry), vec!["zeta.B", "alpha.A", "zeta.A"]);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let mut registry = HandlerRegistry::new();
        registry.register_in("sample", noop("Test", EventSet::LOAD)).unwrap();
        registry.register_in("sample", noop("Other", EventSet::LOAD)).unwrap();
        registry
            .register_in("sample", noop("Test", EventSet::RELOAD))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(keys(&registry), vec!["sample.Test", "sample.Other"]);
        let replaced = registry.get(&HandlerKey::new("sample", "Test")).unwrap();
        assert_eq!(replaced.events(), EventSet::RELOAD);
    }

    #[test]
    fn test_try_register_rejects_duplicate() {
        let mut registry = HandlerRegistry::new();
        registry
            .try_register_in("sample", noop("Test", EventSet::LOAD))
            .unwrap();

        let err = registry
            .try_register_in("sample", noop("Test", EventSet::UNLOAD))
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::Duplicate(HandlerKey::new("sample", "Test"))
        );
        let kept = registry.get(&HandlerKey::new("sample", "Test")).unwrap();
        assert_eq!(kept.events(), EventSet::LOAD);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut registry = HandlerRegistry::new();
        assert_eq!(
            registry.register_in("sample", noop("a.b", EventSet::LOAD)),
            Err(RegistrationError::InvalidName("a.b".into()))
        );
        assert_eq!(
            registry.register_in("", noop("Test", EventSet::LOAD)),
            Err(RegistrationError::InvalidSource(String::new()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_event_set_rejected() {
        let mut registry = HandlerRegistry::new();
        let err = registry
            .register_in("sample", noop("Idle", EventSet::empty()))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::NoEvents(_)));
    }

    #[test]
    fn test_register_extension() {
        let mut registry = HandlerRegistry::new();
        registry.register_extension::<Noop>("builtin").unwrap();

        let handler_type = registry.get(&HandlerKey::new("builtin", "Noop")).unwrap();
        assert_eq!(handler_type.name(), "Noop");
        assert!(handler_type.events().handles(LifecycleEvent::Start));
    }

    #[test]
    fn test_all_registered_groups_by_source() {
        let mut registry = HandlerRegistry::new();
        registry.register_in("sample", noop("Test", EventSet::LOAD)).unwrap();
        registry
            .register_in("sample", noop("ButtonTest", EventSet::CLICK))
            .unwrap();
        registry.register_in("builtin", noop("Clock", EventSet::RENDER)).unwrap();

        let snapshot = registry.all_registered();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["sample"].len(), 2);
        assert_eq!(snapshot["sample"]["ButtonTest"].events(), EventSet::CLICK);
        assert_eq!(snapshot["builtin"]["Clock"].name(), "Clock");
    }

    #[test]
    fn test_caller_source_is_file_stem() {
        let location = Location::caller();
        assert_eq!(caller_source(location), "registry");
    }
}
