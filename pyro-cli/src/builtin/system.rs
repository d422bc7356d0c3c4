//! `builtin.System` - CPU and memory usage

use std::collections::HashMap;

use pyro_core::{ClientHandle, EventSet, Extension, Handler, HandlerResult, Profile};
use sysinfo::System;

use super::owns;

/// Renders `{cpu}` and `{ram}` as whole percentages
pub struct SystemStats {
    sys: System,
}

impl SystemStats {
    fn sample(&mut self) -> (f32, f32) {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        let ram = if total == 0 {
            0.0
        } else {
            (self.sys.used_memory() as f64 / total as f64 * 100.0) as f32
        };
        (self.sys.global_cpu_usage(), ram)
    }

    fn render(&mut self, profile: &mut Profile) -> HandlerResult {
        if !owns(profile, Self::NAME) {
            return Ok(());
        }
        let (cpu, ram) = self.sample();
        tracing::trace!(cpu, ram, "Sampled system usage");
        profile.render(&usage_vars(cpu, ram));
        Ok(())
    }
}

fn usage_vars(cpu: f32, ram: f32) -> HashMap<&'static str, String> {
    HashMap::from([
        ("cpu", format!("{:.0}", cpu)),
        ("ram", format!("{:.0}", ram)),
    ])
}

impl Handler for SystemStats {
    fn on_load(&mut self, profile: &mut Profile) -> HandlerResult {
        self.render(profile)
    }

    fn on_reload(&mut self, profile: &mut Profile) -> HandlerResult {
        self.render(profile)
    }

    fn on_update(&mut self, profile: &mut Profile) -> HandlerResult {
        self.render(profile)
    }
}

impl Extension for SystemStats {
    const NAME: &'static str = "System";
    const EVENTS: EventSet = EventSet::RENDER;

    fn create(_client: &ClientHandle) -> Self {
        // usage is a delta between two refreshes, so take the first one now
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        Self { sys }
    }
}
