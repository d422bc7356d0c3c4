//! Session struct and state machine

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::options::SessionOptions;
use crate::config::LoadedConfig;
use crate::error::{PyroError, SessionError};
use crate::extension::{ClientInfo, DispatchError, Event, EventBus, HandlerRegistry};
use crate::presence::PresenceClient;
use crate::profile::Profile;

/// State of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Presence client not connected yet
    Disconnected,
    /// Connected, no profile loaded
    Connected,
    /// Displaying the profile at `profile`
    Active { profile: usize },
    /// Terminal
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connected => "connected",
            SessionState::Active { .. } => "active",
            SessionState::Closed => "closed",
        }
    }

    /// Index of the active profile, if any
    pub fn active_profile(&self) -> Option<usize> {
        match self {
            SessionState::Active { profile } => Some(*profile),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Active { profile } => write!(f, "active(#{profile})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A presence session
///
/// Session owns:
/// - the presence client it pushes payloads to
/// - the event bus with one instance of every registered handler type
/// - the configured profiles, and which one is active
pub struct Session {
    client: Box<dyn PresenceClient>,
    bus: EventBus,
    profiles: Vec<Profile>,
    state: SessionState,
    reload_interval: Duration,
}

impl Session {
    /// Create a session over `profiles`
    ///
    /// Instantiates every handler type currently in `registry` and binds
    /// each profile to the instance its handler reference names.
    pub fn new(
        options: SessionOptions,
        mut profiles: Vec<Profile>,
        registry: &HandlerRegistry,
        client: Box<dyn PresenceClient>,
    ) -> Result<Self, SessionError> {
        if profiles.is_empty() {
            return Err(SessionError::NoProfiles);
        }
        if options.reload_interval.is_zero() {
            return Err(SessionError::InvalidInterval);
        }

        let info = Arc::new(ClientInfo {
            client_id: options.client_id,
            version: options.version,
            profile_count: profiles.len(),
        });
        let bus = EventBus::new(info, registry);

        for (index, profile) in profiles.iter_mut().enumerate() {
            let Some(key) = profile.handler_key() else {
                continue;
            };
            let handler = bus.lookup_key(key);
            if handler.is_none() {
                tracing::warn!(profile = index, handler = %key, "Profile references unknown handler");
            }
            profile.bind_handler(handler);
        }

        Ok(Self {
            client,
            bus,
            profiles,
            state: SessionState::Disconnected,
            reload_interval: options.reload_interval,
        })
    }

    /// Create a session from loaded configuration documents
    pub fn from_config(
        loaded: LoadedConfig,
        registry: &HandlerRegistry,
        client: Box<dyn PresenceClient>,
    ) -> Result<Self, PyroError> {
        let options = SessionOptions::from_config(&loaded.config)?;
        let profiles = loaded
            .profiles
            .data
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Profile::from_value(&value)
                    .map_err(|source| SessionError::InvalidProfile { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(options, profiles, registry, client)?)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// The active profile
    pub fn current(&self) -> Option<&Profile> {
        self.state
            .active_profile()
            .and_then(|index| self.profiles.get(index))
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn reload_interval(&self) -> Duration {
        self.reload_interval
    }

    /// Connect, emit `Start` and activate the first profile
    pub async fn start(&mut self) -> Result<(), SessionError> {
        self.start_with(0).await
    }

    /// Connect, emit `Start` and activate the profile at `index`
    pub async fn start_with(&mut self, index: usize) -> Result<(), SessionError> {
        self.expect_state(matches!(self.state, SessionState::Disconnected), "disconnected")?;
        self.check_index(index)?;

        tracing::info!(profiles = self.profiles.len(), "Starting presence client");
        self.client.connect().await?;
        self.state = SessionState::Connected;

        Self::report(self.bus.emit(Event::Start));
        self.activate(index).await
    }

    /// Make the profile at `index` the active one
    ///
    /// Activating the profile that is already active refreshes it: `Update`
    /// is emitted instead of `Unload`/`Load`. Either way the payload is
    /// pushed afterwards. A failed push is returned, but the profile stays
    /// active.
    pub async fn activate(&mut self, index: usize) -> Result<(), SessionError> {
        let previous = match self.state {
            SessionState::Connected => None,
            SessionState::Active { profile } => Some(profile),
            _ => return Err(self.invalid_state("connected or active")),
        };
        self.check_index(index)?;

        if previous == Some(index) {
            tracing::debug!(profile = index, "Refreshing active profile");
            Self::report(self.bus.emit(Event::Update(&mut self.profiles[index])));
        } else {
            tracing::info!(from = ?previous, to = index, "Switching presence profile");
            if let Some(previous) = previous {
                Self::report(self.bus.emit(Event::Unload(&mut self.profiles[previous])));
            }
            Self::report(self.bus.emit(Event::Load(&mut self.profiles[index])));
            self.state = SessionState::Active { profile: index };
        }

        self.push(index).await
    }

    /// Emit `Reload` for the active profile and push the result
    pub async fn reload(&mut self) -> Result<(), SessionError> {
        let index = self.active_index()?;
        Self::report(self.bus.emit(Event::Reload(&mut self.profiles[index])));
        self.push(index).await
    }

    /// Emit `Click` for a button of the active profile and push the result
    pub async fn click(&mut self, button: usize) -> Result<(), SessionError> {
        let index = self.active_index()?;
        let clicked = self.profiles[index]
            .buttons()
            .get(button)
            .cloned()
            .ok_or(SessionError::UnknownButton(button))?;

        tracing::debug!(profile = index, button = clicked.label(), "Button clicked");
        Self::report(self.bus.emit(Event::Click {
            profile: &mut self.profiles[index],
            button: &clicked,
        }));
        self.push(index).await
    }

    /// Emit `Close` and release the presence client
    ///
    /// A session that never started goes straight to `Closed`.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Closed => return Err(self.invalid_state("not closed")),
            SessionState::Disconnected => {
                self.state = SessionState::Closed;
                return Ok(());
            }
            SessionState::Connected | SessionState::Active { .. } => {}
        }

        Self::report(self.bus.emit(Event::Close));
        let result = self.client.close().await;
        self.state = SessionState::Closed;
        tracing::info!("Closed");
        result.map_err(SessionError::from)
    }

    /// Reload the active profile every interval until `cancel` fires
    ///
    /// The first tick happens one full interval after the call. Failed
    /// pushes are logged and retried on the next tick.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), SessionError> {
        self.active_index()?;

        let mut interval = tokio::time::interval(self.reload_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Update loop cancelled");
                    return Ok(());
                }
                _ = interval.tick() => {
                    match self.reload().await {
                        Ok(()) => {}
                        Err(err) if err.is_recoverable() => {
                            tracing::warn!(error = %err, "Reload failed, retrying next tick");
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }
    }

    async fn push(&mut self, index: usize) -> Result<(), SessionError> {
        let payload = self.profiles[index].payload();
        tracing::debug!(profile = index, state = %payload.state, details = %payload.details, "Pushing presence");
        self.client.update(&payload).await.map_err(|err| {
            tracing::error!(profile = index, error = %err, "Presence update failed");
            SessionError::from(err)
        })
    }

    fn report(result: Result<(), DispatchError>) {
        if let Err(err) = result {
            tracing::warn!(event = %err.event, failed = err.failures.len(), "{err}");
        }
    }

    fn active_index(&self) -> Result<usize, SessionError> {
        self.state
            .active_profile()
            .ok_or_else(|| self.invalid_state("active"))
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.profiles.len() {
            Ok(())
        } else {
            Err(SessionError::UnknownProfile {
                index,
                count: self.profiles.len(),
            })
        }
    }

    fn expect_state(&self, ok: bool, expected: &str) -> Result<(), SessionError> {
        if ok { Ok(()) } else { Err(self.invalid_state(expected)) }
    }

    fn invalid_state(&self, expected: &str) -> SessionError {
        SessionError::InvalidState {
            expected: expected.to_string(),
            actual: self.state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::PresenceError;
    use crate::extension::{
        EventSet, Handler, HandlerError, HandlerResult, HandlerType, LifecycleEvent,
    };
    use crate::presence::MockPresence;
    use crate::profile::Button;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Tracker {
        log: Log,
    }

    impl Tracker {
        fn record(&self, event: LifecycleEvent, profile: Option<&Profile>) -> HandlerResult {
            let entry = match profile {
                Some(profile) => format!("{event}({})", profile.state_template()),
                None => event.to_string(),
            };
            self.log.lock().unwrap().push(entry);
            Ok(())
        }
    }

    impl Handler for Tracker {
        fn on_start(&mut self) -> HandlerResult {
            self.record(LifecycleEvent::Start, None)
        }

        fn on_close(&mut self) -> HandlerResult {
            self.record(LifecycleEvent::Close, None)
        }

        fn on_load(&mut self, profile: &mut Profile) -> HandlerResult {
            self.record(LifecycleEvent::Load, Some(profile))
        }

        fn on_unload(&mut self, profile: &mut Profile) -> HandlerResult {
            self.record(LifecycleEvent::Unload, Some(profile))
        }

        fn on_update(&mut self, profile: &mut Profile) -> HandlerResult {
            self.record(LifecycleEvent::Update, Some(profile))
        }

        fn on_click(&mut self, profile: &mut Profile, button: &Button) -> HandlerResult {
            profile.set_state(format!("clicked {}", button.label()));
            self.record(LifecycleEvent::Click, None)
        }
    }

    struct Stuck;

    impl Handler for Stuck {
        fn on_close(&mut self) -> HandlerResult {
            Err(HandlerError::failed("still busy"))
        }
    }

    fn profile(state: &str, enabled: bool) -> Profile {
        Profile::from_value(&serde_json::json!({
            "enabled": enabled,
            "state": state,
            "details": "",
            "buttons": [{ "label": "Docs", "url": "https://example.com/docs" }],
            "handler": "tests.Tracker",
        }))
        .unwrap()
    }

    fn session(mock: &MockPresence, log: &Log) -> Session {
        let mut registry = HandlerRegistry::new();
        let log = log.clone();
        registry
            .register_in(
                "tests",
                HandlerType::new("Tracker", EventSet::all(), move |_| Tracker {
                    log: log.clone(),
                }),
            )
            .unwrap();

        Session::new(
            SessionOptions::new("1234", "1.0.0"),
            vec![profile("P1", false), profile("P2", true)],
            &registry,
            Box::new(mock.clone()),
        )
        .unwrap()
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn new_session_is_disconnected() {
        let session = session(&MockPresence::new(), &Log::default());
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(session.current().is_none());
        assert_eq!(session.bus().client().profile_count, 2);
    }

    #[test]
    fn new_session_binds_profile_handlers() {
        let session = session(&MockPresence::new(), &Log::default());
        let expected = session.bus().lookup("tests", "Tracker");
        assert!(expected.is_some());
        assert!(session.profiles().iter().all(|p| p.handler() == expected));
    }

    #[test]
    fn new_session_without_profiles_fails() {
        let result = Session::new(
            SessionOptions::new("1", "1"),
            Vec::new(),
            &HandlerRegistry::new(),
            Box::new(MockPresence::new()),
        );
        assert!(matches!(result, Err(SessionError::NoProfiles)));
    }

    #[tokio::test]
    async fn start_activates_first_profile_even_if_disabled() {
        let mock = MockPresence::new();
        let log = Log::default();
        let mut session = session(&mock, &log);

        session.start().await.unwrap();

        assert_eq!(session.state(), SessionState::Active { profile: 0 });
        assert_eq!(entries(&log), vec!["Start", "Load(P1)"]);
        assert_eq!(mock.last_update().unwrap().state, "P1");
    }

    #[tokio::test]
    async fn start_with_unknown_index_does_not_connect() {
        let mock = MockPresence::new();
        let mut session = session(&mock, &Log::default());

        let err = session.start_with(5).await.unwrap_err();
        assert!(matches!(err, SessionError::UnknownProfile { index: 5, count: 2 }));
        assert_eq!(mock.log().connects, 0);
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn start_twice_is_invalid() {
        let mut session = session(&MockPresence::new(), &Log::default());
        session.start().await.unwrap();
        assert!(matches!(
            session.start().await,
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn connect_failure_leaves_session_disconnected() {
        let mock = MockPresence::new();
        mock.fail_connect("no service");
        let log = Log::default();
        let mut session = session(&mock, &log);

        let err = session.start().await.unwrap_err();
        assert!(matches!(err, SessionError::Presence(PresenceError::Connect(_))));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(entries(&log).is_empty());
    }

    #[tokio::test]
    async fn activate_same_profile_refreshes() {
        let mock = MockPresence::new();
        let log = Log::default();
        let mut session = session(&mock, &log);
        session.start().await.unwrap();

        session.activate(0).await.unwrap();

        assert_eq!(entries(&log), vec!["Start", "Load(P1)", "Update(P1)"]);
        assert_eq!(mock.updates().len(), 2);
    }

    #[tokio::test]
    async fn activate_before_start_is_invalid() {
        let mut session = session(&MockPresence::new(), &Log::default());
        let err = session.activate(1).await.unwrap_err();
        match err {
            SessionError::InvalidState { actual, .. } => assert_eq!(actual, "disconnected"),
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn click_emits_and_pushes() {
        let mock = MockPresence::new();
        let log = Log::default();
        let mut session = session(&mock, &log);
        session.start().await.unwrap();

        session.click(0).await.unwrap();

        assert_eq!(entries(&log).last().unwrap(), "Click");
        assert_eq!(mock.last_update().unwrap().state, "clicked Docs");
        assert_eq!(session.current().unwrap().state_template(), "P1");
    }

    #[tokio::test]
    async fn click_unknown_button_fails() {
        let mut session = session(&MockPresence::new(), &Log::default());
        session.start().await.unwrap();
        assert!(matches!(
            session.click(3).await,
            Err(SessionError::UnknownButton(3))
        ));
    }

    #[tokio::test]
    async fn close_emits_and_releases_client() {
        let mock = MockPresence::new();
        let log = Log::default();
        let mut session = session(&mock, &log);
        session.start().await.unwrap();

        session.close().await.unwrap();

        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(entries(&log).last().unwrap(), "Close");
        assert!(mock.log().closed);
        assert!(matches!(
            session.reload().await,
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn close_releases_client_when_listener_fails() {
        let mock = MockPresence::new();
        let mut registry = HandlerRegistry::new();
        registry
            .register_in("tests", HandlerType::new("Stuck", EventSet::CLOSE, |_| Stuck))
            .unwrap();
        let mut session = Session::new(
            SessionOptions::new("1", "1"),
            vec![profile("P1", true)],
            &registry,
            Box::new(mock.clone()),
        )
        .unwrap();
        session.start().await.unwrap();

        session.close().await.unwrap();

        assert!(mock.log().closed);
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn close_failure_still_closes_session() {
        let mock = MockPresence::new();
        let mut session = session(&mock, &Log::default());
        session.start().await.unwrap();
        mock.fail_close("pipe busy");

        let err = session.close().await.unwrap_err();

        assert!(matches!(err, SessionError::Presence(PresenceError::Close(_))));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn zero_reload_interval_is_rejected() {
        let result = Session::new(
            SessionOptions::new("1", "1").with_reload_interval(Duration::ZERO),
            vec![profile("P1", true)],
            &HandlerRegistry::new(),
            Box::new(MockPresence::new()),
        );
        assert!(matches!(result, Err(SessionError::InvalidInterval)));
    }

    #[tokio::test]
    async fn close_is_terminal() {
        let mut session = session(&MockPresence::new(), &Log::default());
        session.close().await.unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.close().await.is_err());
        assert!(session.start().await.is_err());
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Active { profile: 3 }.to_string(), "active(#3)");
        assert_eq!(SessionState::Closed.to_string(), "closed");
    }
}
