//! Lifecycle hooks.
//!
//! A single-slot table: at most one handler per [`Event`]. `on` overwrites,
//! `add_hook` only fills an empty slot, and `fire` calls the handler
//! synchronously. A handler returns `true` to ask the engine to stop.

pub mod context;
pub mod events;

use std::collections::HashMap;
use std::fmt;

pub use context::{Data, HookCtx};
pub use events::Event;

/// Hook handler. Returns true to stop the remaining pipeline.
pub type HookFn = Box<dyn for<'a> Fn(&mut HookCtx<'a>) -> bool>;

/// Event name to handler table.
#[derive(Default)]
pub struct Hooks {
    hooks: HashMap<Event, HookFn>,
}

impl Hooks {
    /// Registers `handler` for `event`, replacing any previous handler.
    pub fn on<F>(&mut self, event: Event, handler: F)
    where
        F: for<'a> Fn(&mut HookCtx<'a>) -> bool + 'static,
    {
        self.hooks.insert(event, Box::new(handler));
    }

    /// Registers `handler` only if `event` has no handler yet.
    pub fn add_hook<F>(&mut self, event: Event, handler: F)
    where
        F: for<'a> Fn(&mut HookCtx<'a>) -> bool + 'static,
    {
        self.hooks
            .entry(event)
            .or_insert_with(|| Box::new(handler));
    }

    /// Calls the handler for `event`, if any, and returns its stop signal.
    pub fn fire(&self, event: Event, ctx: &mut HookCtx<'_>) -> bool {
        match self.hooks.get(&event) {
            Some(handler) => handler(ctx),
            None => false,
        }
    }

    pub fn has_hook(&self, event: Event) -> bool {
        self.hooks.contains_key(&event)
    }

    /// Removes every registered handler.
    pub fn reset_hooks(&mut self) {
        self.hooks.clear();
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<_> = self.hooks.keys().map(Event::as_str).collect();
        events.sort_unstable();
        f.debug_struct("Hooks").field("events", &events).finish()
    }
}
