//! Lifecycle events
//!
//! Hooks subscribe to named events once, at registration. While a phase runs
//! the application dispatches events such as `service:start:after` or
//! `<alias>:prepare:before`; every matching handler is called and its future
//! is spawned onto the runtime. The application never waits for a handler.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

/// Subject of the application-wide events.
pub const APPLICATION: &str = "application";

/// Subject of the events fired for every service.
pub const SERVICE: &str = "service";

/// Phases that emit events. `stop` is silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Prepare,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Moment {
    Before,
    After,
}

/// `"<subject>:<phase>:<moment>"`, e.g. `service:prepare:before`.
pub fn event_name(subject: &str, phase: Phase, moment: Moment) -> String {
    format!("{subject}:{phase}:{moment}")
}

/// What a handler receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    /// Alias of the service the event is about, if any.
    pub subject: Option<String>,
}

type Handler = Arc<dyn Fn(Event) -> BoxFuture<'static, ()> + Send + Sync>;

/// Event name → handlers, filled in by [`Hook::subscribe`](super::Hook::subscribe).
#[derive(Default)]
pub struct Subscriptions {
    handlers: HashMap<String, Vec<Handler>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `event`.
    ///
    /// The closure itself runs synchronously during dispatch; the future it
    /// returns is spawned and left to finish on its own.
    pub fn on<F, Fut>(&mut self, event: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let boxed: Handler = Arc::new(move |event: Event| handler(event).boxed());
        self.handlers.entry(event.into()).or_default().push(boxed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Fans events out to hook subscriptions in hook registration order.
#[derive(Default)]
pub(crate) struct EventDispatcher {
    hooks: Vec<(String, Subscriptions)>,
}

impl EventDispatcher {
    pub(crate) fn register(&mut self, alias: &str, subscriptions: Subscriptions) {
        if subscriptions.is_empty() {
            return;
        }
        self.hooks.push((alias.to_string(), subscriptions));
    }

    /// Invoke every handler subscribed to `name`; returns how many were spawned.
    ///
    /// Outside a tokio runtime nothing is invoked and the event is dropped
    /// with an error log.
    pub(crate) fn dispatch(&self, name: &str, subject: Option<&str>) -> usize {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            if !self.hooks.is_empty() {
                tracing::error!(event = %name, "No tokio runtime, event handlers skipped");
            }
            return 0;
        };

        let mut invoked = 0;
        for (alias, subscriptions) in &self.hooks {
            let Some(handlers) = subscriptions.handlers.get(name) else {
                continue;
            };
            for handler in handlers {
                let task = handler(Event {
                    name: name.to_string(),
                    subject: subject.map(str::to_string),
                });
                let span = tracing::debug_span!("event", hook = %alias, event = %name);
                runtime.spawn(task.instrument(span));
                invoked += 1;
            }
        }
        tracing::trace!(event = %name, handlers = invoked, "dispatched");
        invoked
    }

    /// Dispatch the generic `service:*` event and the alias-specific one.
    pub(crate) fn announce(&self, alias: &str, phase: Phase, moment: Moment) {
        self.dispatch(&event_name(SERVICE, phase, moment), Some(alias));
        self.dispatch(&event_name(alias, phase, moment), Some(alias));
    }
}
