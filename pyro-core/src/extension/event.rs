//! Lifecycle events delivered to extension handlers
//!
//! [`LifecycleEvent`] names the moment, [`EventSet`] is the capability
//! declaration a handler type makes at registration, and [`Event`] carries
//! the event-specific arguments into a dispatch.

use std::fmt;

use bitflags::bitflags;
use crate::profile::{Button, Profile};

/// The fixed set of moments a session notifies handlers about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifecycleEvent {
    Start,
    Close,
    Load,
    Unload,
    Reload,
    Update,
    Click,
}

impl LifecycleEvent {
    /// Number of lifecycle events
    pub const COUNT: usize = 7;

    /// All events in declaration order
    pub const ALL: [LifecycleEvent; Self::COUNT] = [
        LifecycleEvent::Start,
        LifecycleEvent::Close,
        LifecycleEvent::Load,
        LifecycleEvent::Unload,
        LifecycleEvent::Reload,
        LifecycleEvent::Update,
        LifecycleEvent::Click,
    ];

    /// Get the event name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Start => "Start",
            LifecycleEvent::Close => "Close",
            LifecycleEvent::Load => "Load",
            LifecycleEvent::Unload => "Unload",
            LifecycleEvent::Reload => "Reload",
            LifecycleEvent::Update => "Update",
            LifecycleEvent::Click => "Click",
        }
    }

    /// Name of the [`Handler`](super::Handler) method invoked for this event
    pub fn callback_name(&self) -> &'static str {
        match self {
            LifecycleEvent::Start => "on_start",
            LifecycleEvent::Close => "on_close",
            LifecycleEvent::Load => "on_load",
            LifecycleEvent::Unload => "on_unload",
            LifecycleEvent::Reload => "on_reload",
            LifecycleEvent::Update => "on_update",
            LifecycleEvent::Click => "on_click",
        }
    }

    /// The capability flag matching this event
    pub fn flag(&self) -> EventSet {
        match self {
            LifecycleEvent::Start => EventSet::START,
            LifecycleEvent::Close => EventSet::CLOSE,
            LifecycleEvent::Load => EventSet::LOAD,
            LifecycleEvent::Unload => EventSet::UNLOAD,
            LifecycleEvent::Reload => EventSet::RELOAD,
            LifecycleEvent::Update => EventSet::UPDATE,
            LifecycleEvent::Click => EventSet::CLICK,
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Lifecycle events a handler type implements
    ///
    /// Declared once per handler type at registration; the event bus only
    /// routes an event to instances whose type declared it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventSet: u8 {
        const START = 1 << 0;
        const CLOSE = 1 << 1;
        const LOAD = 1 << 2;
        const UNLOAD = 1 << 3;
        const RELOAD = 1 << 4;
        const UPDATE = 1 << 5;
        const CLICK = 1 << 6;
    }
}

impl EventSet {
    /// Load, Reload and Update: the events that render profile text
    pub const RENDER: EventSet = EventSet::LOAD
        .union(EventSet::RELOAD)
        .union(EventSet::UPDATE);

    /// Check whether the set declares `event`
    pub fn handles(&self, event: LifecycleEvent) -> bool {
        self.contains(event.flag())
    }

    /// Iterate the declared events in [`LifecycleEvent::ALL`] order
    pub fn events(&self) -> impl Iterator<Item = LifecycleEvent> + '_ {
        LifecycleEvent::ALL
            .into_iter()
            .filter(move |event| self.handles(*event))
    }
}

impl From<LifecycleEvent> for EventSet {
    fn from(event: LifecycleEvent) -> Self {
        event.flag()
    }
}

/// A lifecycle event together with its arguments
#[derive(Debug)]
pub enum Event<'a> {
    Start,
    Close,
    Load(&'a mut Profile),
    Unload(&'a mut Profile),
    Reload(&'a mut Profile),
    Update(&'a mut Profile),
    Click {
        profile: &'a mut Profile,
        button: &'a Button,
    },
}

impl Event<'_> {
    /// The event kind, without arguments
    pub fn kind(&self) -> LifecycleEvent {
        match self {
            Event::Start => LifecycleEvent::Start,
            Event::Close => LifecycleEvent::Close,
            Event::Load(_) => LifecycleEvent::Load,
            Event::Unload(_) => LifecycleEvent::Unload,
            Event::Reload(_) => LifecycleEvent::Reload,
            Event::Update(_) => LifecycleEvent::Update,
            Event::Click { .. } => LifecycleEvent::Click,
        }
    }
}
