//! `builtin.Clock` - local time, date and time since the profile loaded

use std::collections::HashMap;

use chrono::{DateTime, Local};
use pyro_core::{ClientHandle, EventSet, Extension, Handler, HandlerResult, Profile};

use super::owns;

/// Renders `{time}`, `{date}`, `{elapsed}` and `{version}`
pub struct Clock {
    client: ClientHandle,
    loaded_at: DateTime<Local>,
}

impl Clock {
    fn render_at(&self, profile: &mut Profile, now: DateTime<Local>) {
        let vars = HashMap::from([
            ("time", now.format("%H:%M").to_string()),
            ("date", now.format("%Y-%m-%d").to_string()),
            ("elapsed", format_elapsed(now - self.loaded_at)),
            ("version", self.client.version.clone()),
        ]);
        profile.render(&vars);
    }

    fn render(&self, profile: &mut Profile) -> HandlerResult {
        if owns(profile, Self::NAME) {
            self.render_at(profile, Local::now());
        }
        Ok(())
    }
}

fn format_elapsed(elapsed: chrono::TimeDelta) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

impl Handler for Clock {
    fn on_load(&mut self, profile: &mut Profile) -> HandlerResult {
        if owns(profile, Self::NAME) {
            self.loaded_at = Local::now();
        }
        self.render(profile)
    }

    fn on_reload(&mut self, profile: &mut Profile) -> HandlerResult {
        self.render(profile)
    }

    fn on_update(&mut self, profile: &mut Profile) -> HandlerResult {
        self.render(profile)
    }
}

impl Extension for Clock {
    const NAME: &'static str = "Clock";
    const EVENTS: EventSet = EventSet::RENDER;

    fn create(client: &ClientHandle) -> Self {
        Self {
            client: client.clone(),
            loaded_at: Local::now(),
        }
    }
}
