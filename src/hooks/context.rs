//! Per-event hook context.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::events::Event;
use crate::app::App;
use crate::commands::CommandInfo;
use crate::error::CrankError;

/// Free-form data bag carried by a hook context.
pub type Data = HashMap<String, Value>;

/// Mutable carrier passed to a hook handler.
///
/// Created by the engine for a single fire and dropped afterwards; handlers
/// may flip the stop flag, set an error or write to the data bag, but cannot
/// keep the context past the call.
pub struct HookCtx<'a> {
    name: Event,
    app: Option<&'a App>,
    cmd: Option<CommandInfo>,
    data: Data,
    err: Option<CrankError>,
    stop: bool,
    cancel: CancellationToken,
}

impl<'a> HookCtx<'a> {
    /// Creates a context for `name` with an empty data bag.
    pub fn new(name: Event) -> Self {
        Self {
            name,
            app: None,
            cmd: None,
            data: Data::new(),
            err: None,
            stop: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn name(&self) -> Event {
        self.name
    }

    pub fn stopped(&self) -> bool {
        self.stop
    }

    pub fn err(&self) -> Option<&CrankError> {
        self.err.as_ref()
    }

    pub fn app(&self) -> Option<&'a App> {
        self.app
    }

    /// Snapshot of the command being processed, if any.
    pub fn cmd(&self) -> Option<&CommandInfo> {
        self.cmd.as_ref()
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Inserts one value into the data bag.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Sets the stop flag and returns the new value.
    pub fn set_stop(&mut self, stop: bool) -> bool {
        self.stop = stop;
        self.stop
    }

    pub fn with_err(&mut self, err: CrankError) -> &mut Self {
        self.err = Some(err);
        self
    }

    /// Replaces the data bag.
    pub fn with_data(&mut self, data: Data) -> &mut Self {
        self.data = data;
        self
    }

    pub fn with_app(&mut self, app: &'a App) -> &mut Self {
        self.app = Some(app);
        self
    }

    pub fn with_cmd(&mut self, cmd: CommandInfo) -> &mut Self {
        self.cmd = Some(cmd);
        self
    }

    /// Cancellation handle; never cancelled unless one was supplied.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn with_cancellation(&mut self, token: CancellationToken) -> &mut Self {
        self.cancel = token;
        self
    }
}

impl fmt::Debug for HookCtx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookCtx")
            .field("name", &self.name)
            .field("app", &self.app.map(App::name))
            .field("cmd", &self.cmd)
            .field("data", &self.data)
            .field("err", &self.err)
            .field("stop", &self.stop)
            .finish()
    }
}
