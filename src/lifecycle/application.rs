//! Application
//!
//! The orchestrator: registers components, wires their dependencies and
//! drives them through prepare → start → stop.

use super::events::{Moment, Phase};
use super::manager::LifecycleManager;
use super::{LifecycleError, Result, shutdown_signal};
use crate::config::Config;
use crate::di::{
    AppHandle, AppShared, Aliases, Catalog, ComponentClass, ComponentContainer, ComponentKind,
    Descriptor, ExposedServices, Instance,
};
use crate::error::StagehandError;
use crate::lifecycle::{Hook, Service};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Owns every registered component and the lifecycle state.
///
/// Components are wired at registration time, so a broken dependency map is
/// reported before anything has been prepared.
///
/// Event handlers are spawned on the current tokio runtime. Driving the
/// phases from another executor still runs every component, but handlers are
/// skipped and an error is logged for each dispatched event.
///
/// # Example
///
/// ```rust,ignore
/// use stagehand::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = Config::from_json_str(r#"{ "services": { "db": { "url": "postgres://db/app" } } }"#)?;
///     stagehand::logging::init(&config.application.log)?;
///
///     let mut app = Application::new(config);
///     app.service::<Database>("db", Aliases::new())?
///         .service::<Http>("http", [("service:database", "db")])?
///         .hook::<Migrations>("migrations", [("service:database", "db")])?;
///
///     app.run_until_shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct Application {
    shared: Arc<AppShared>,
    manager: LifecycleManager,
    prepared: bool,
    started: bool,
}

impl Application {
    pub fn new(config: Config) -> Self {
        let span = tracing::info_span!("application", name = %config.application.log.name);
        Self {
            shared: Arc::new(AppShared {
                config: Arc::new(config),
                services: ExposedServices::new(),
                span,
            }),
            manager: LifecycleManager::default(),
            prepared: false,
            started: false,
        }
    }

    /// Build an application from an untyped configuration tree.
    pub fn from_value(config: Value) -> crate::Result<Self> {
        Ok(Self::new(Config::from_value(config)?))
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// A non-owning handle, the same kind components receive.
    pub fn handle(&self) -> AppHandle {
        AppHandle::new(&self.shared)
    }

    /// Values exposed by prepared services, keyed by alias.
    pub fn services(&self) -> &ExposedServices {
        &self.shared.services
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn service_count(&self) -> usize {
        self.manager.service_count()
    }

    pub fn hook_count(&self) -> usize {
        self.manager.hook_count()
    }

    /// Registered service aliases, in registration order.
    pub fn service_aliases(&self) -> impl Iterator<Item = &str> {
        self.manager.service_aliases()
    }

    /// Registered hook aliases, in registration order.
    pub fn hook_aliases(&self) -> impl Iterator<Item = &str> {
        self.manager.hook_aliases()
    }

    /// Register a service under `alias`.
    ///
    /// `aliases` must bind exactly the dependency names `S::requires()` declares.
    pub fn service<S: Service>(
        &mut self,
        alias: &str,
        aliases: impl Into<Aliases>,
    ) -> crate::Result<&mut Self> {
        self.register(ComponentKind::Service, alias, &ComponentClass::service::<S>(), aliases)
    }

    /// Register a hook under `alias`.
    pub fn hook<H: Hook>(
        &mut self,
        alias: &str,
        aliases: impl Into<Aliases>,
    ) -> crate::Result<&mut Self> {
        self.register(ComponentKind::Hook, alias, &ComponentClass::hook::<H>(), aliases)
    }

    /// Register a component described by `class` as a `kind`.
    pub fn register(
        &mut self,
        kind: ComponentKind,
        alias: &str,
        class: &ComponentClass,
        aliases: impl Into<Aliases>,
    ) -> crate::Result<&mut Self> {
        if self.manager.contains(kind, alias) {
            return Err(StagehandError::DuplicateAlias {
                kind,
                alias: alias.to_string(),
            });
        }

        let descriptor = Descriptor {
            kind,
            alias,
            aliases: aliases.into(),
            class,
            config: self.shared.config.component(kind, alias),
        };
        let instance =
            ComponentContainer::new(descriptor)?.instantiate(self.handle(), &self.shared.span)?;

        match instance {
            Instance::Service(service) => self.manager.insert_service(alias, service),
            Instance::Hook(hook) => self.manager.insert_hook(alias, hook),
        }
        tracing::debug!(parent: &self.shared.span, alias = %alias, class = class.type_name(), "{}:add", kind);
        Ok(self)
    }

    /// Register the class `catalog` knows as `class_name`.
    pub fn register_named(
        &mut self,
        kind: ComponentKind,
        alias: &str,
        catalog: &Catalog,
        class_name: &str,
        aliases: impl Into<Aliases>,
    ) -> crate::Result<&mut Self> {
        let class = catalog
            .get(class_name)
            .ok_or_else(|| StagehandError::ComponentType {
                kind,
                alias: alias.to_string(),
                reason: format!("no component class named '{}'", class_name),
            })?;
        self.register(kind, alias, &class, aliases)
    }

    /// Prepare hooks (concurrently), then services (in registration order).
    ///
    /// Does nothing if already prepared. On failure the application stays
    /// unprepared; services exposed before the failure stay exposed.
    pub async fn prepare(&mut self) -> Result<&mut Self> {
        if self.prepared {
            return Ok(self);
        }
        let span = self.shared.span.clone();
        self.run_prepare().instrument(span).await?;
        Ok(self)
    }

    /// Prepare if needed, then start services in registration order.
    ///
    /// Does nothing if already started. On failure the application is not
    /// started; services started before the failure keep running.
    pub async fn start(&mut self) -> Result<&mut Self> {
        self.prepare().await?;
        if self.started {
            return Ok(self);
        }
        let span = self.shared.span.clone();
        self.run_start().instrument(span).await?;
        Ok(self)
    }

    /// Withdraw every exposure and stop every service.
    ///
    /// Does nothing unless started. Afterwards the application is neither
    /// started nor prepared and can be started again.
    pub async fn stop(&mut self) -> Result<&mut Self> {
        if !self.started {
            return Ok(self);
        }
        let span = self.shared.span.clone();
        self.run_stop().instrument(span).await?;
        Ok(self)
    }

    /// [`prepare`](Self::prepare) bounded by `timeout`.
    pub async fn prepare_with_timeout(&mut self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.prepare()).await {
            Ok(result) => result.map(|_| ()),
            Err(_) => Err(LifecycleError::timeout(
                "prepare",
                format!("Timeout after {:?}", timeout),
            )),
        }
    }

    /// [`start`](Self::start) bounded by `timeout`.
    pub async fn start_with_timeout(&mut self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.start()).await {
            Ok(result) => result.map(|_| ()),
            Err(_) => Err(LifecycleError::timeout(
                "start",
                format!("Timeout after {:?}", timeout),
            )),
        }
    }

    /// [`stop`](Self::stop) bounded by `timeout`.
    pub async fn stop_with_timeout(&mut self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.stop()).await {
            Ok(result) => result.map(|_| ()),
            Err(_) => Err(LifecycleError::timeout(
                "stop",
                format!("Timeout after {:?}", timeout),
            )),
        }
    }

    /// Start, wait for SIGINT/SIGTERM, then stop.
    pub async fn run_until_shutdown(&mut self) -> Result<()> {
        self.start().await?;
        shutdown_signal().await;
        tracing::info!(parent: &self.shared.span, "Starting graceful shutdown...");
        self.stop().await?;
        tracing::info!(parent: &self.shared.span, "Graceful shutdown complete");
        Ok(())
    }

    async fn run_prepare(&mut self) -> Result<()> {
        tracing::info!("Preparing application...");

        self.manager.call_hook_prepare().await?;
        self.manager
            .call_service_prepare(&self.shared.services)
            .await?;
        self.prepared = true;

        tracing::info!(
            "Application prepared ({} services, {} hooks)",
            self.manager.service_count(),
            self.manager.hook_count()
        );
        Ok(())
    }

    async fn run_start(&mut self) -> Result<()> {
        tracing::info!("Starting application...");

        self.manager.dispatch_application(Phase::Start, Moment::Before);
        self.manager.call_service_start().await?;
        self.started = true;
        self.manager.dispatch_application(Phase::Start, Moment::After);

        tracing::info!("Application ready");
        Ok(())
    }

    async fn run_stop(&mut self) -> Result<()> {
        let order = self.shared.config.application.stop_order;
        tracing::info!("Stopping application ({} order)...", order);

        self.manager
            .call_service_stop(&self.shared.services, order)
            .await?;
        self.started = false;
        self.prepared = false;

        tracing::info!("Application stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("services", &self.service_aliases().collect::<Vec<_>>())
            .field("hooks", &self.hook_aliases().collect::<Vec<_>>())
            .field("prepared", &self.prepared)
            .field("started", &self.started)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::{ComponentInit, Resolver};
    use crate::lifecycle::Subscriptions;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{LazyLock, Mutex};
    use tokio::sync::Barrier;

    /// Shared record of what components did, published by [`JournalService`].
    #[derive(Default)]
    struct Journal(Mutex<Vec<String>>);

    impl Journal {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct JournalService;

    #[async_trait]
    impl Service for JournalService {
        type Exposed = Journal;

        fn new(_init: ComponentInit) -> anyhow::Result<Self> {
            Ok(Self)
        }

        async fn prepare(&mut self) -> anyhow::Result<Journal> {
            Ok(Journal::default())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("{alias} refused to {phase}")]
    struct Refused {
        alias: String,
        phase: String,
    }

    /// Records each phase into the journal; fails the phase named by `config.fail`.
    struct Recorder {
        alias: String,
        fail: Option<String>,
        resolve: Resolver,
        journal: Option<Arc<Journal>>,
    }

    impl Recorder {
        fn record(&self, phase: &str) -> anyhow::Result<()> {
            if let Some(journal) = &self.journal {
                journal.push(format!("{}:{}", self.alias, phase));
            }
            if self.fail.as_deref() == Some(phase) {
                return Err(Refused {
                    alias: self.alias.clone(),
                    phase: phase.to_string(),
                }
                .into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Service for Recorder {
        type Exposed = String;

        fn requires() -> &'static [&'static str] {
            &["service:journal"]
        }

        fn new(init: ComponentInit) -> anyhow::Result<Self> {
            Ok(Self {
                fail: init.config["fail"].as_str().map(str::to_string),
                alias: init.alias,
                resolve: init.resolve,
                journal: None,
            })
        }

        async fn prepare(&mut self) -> anyhow::Result<String> {
            self.journal = Some(self.resolve.resolve::<Journal>("service:journal")?);
            self.record("prepare")?;
            Ok(format!("{} handle", self.alias))
        }

        async fn start(&mut self) -> anyhow::Result<()> {
            self.record("start")
        }

        async fn stop(&mut self) -> anyhow::Result<()> {
            self.record("stop")
        }
    }

    /// Writes every lifecycle event it sees into the journal.
    struct Tracer {
        resolve: Resolver,
    }

    impl Hook for Tracer {
        fn requires() -> &'static [&'static str] {
            &["service:journal"]
        }

        fn new(init: ComponentInit) -> anyhow::Result<Self> {
            Ok(Self {
                resolve: init.resolve,
            })
        }

        fn subscribe(&self, events: &mut Subscriptions) {
            for name in [
                "service:prepare:after",
                "a:prepare:before",
                "application:start:before",
                "service:start:after",
                "application:start:after",
            ] {
                let resolve = self.resolve.clone();
                events.on(name, move |event| {
                    if let Ok(journal) = resolve.resolve::<Journal>("service:journal") {
                        let subject = event.subject.unwrap_or_default();
                        journal.push(format!("{} {}", event.name, subject).trim().to_string());
                    }
                    async {}
                });
            }
        }
    }

    static RENDEZVOUS: LazyLock<Barrier> = LazyLock::new(|| Barrier::new(2));

    /// Only gets past `prepare` if another hook is preparing at the same time.
    struct Rendezvous;

    #[async_trait]
    impl Hook for Rendezvous {
        fn new(_init: ComponentInit) -> anyhow::Result<Self> {
            Ok(Self)
        }

        async fn prepare(&mut self) -> anyhow::Result<()> {
            RENDEZVOUS.wait().await;
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Hook for Broken {
        fn new(_init: ComponentInit) -> anyhow::Result<Self> {
            Ok(Self)
        }

        async fn prepare(&mut self) -> anyhow::Result<()> {
            anyhow::bail!("hook exploded")
        }
    }

    static COUNTED_PREPARES: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    #[async_trait]
    impl Hook for Counted {
        fn new(_init: ComponentInit) -> anyhow::Result<Self> {
            Ok(Self)
        }

        async fn prepare(&mut self) -> anyhow::Result<()> {
            COUNTED_PREPARES.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    static FLAKY_PREPARES: Mutex<Vec<String>> = Mutex::new(Vec::new());

    /// Logs each prepare by alias; with `fail_first` set, the first attempt fails.
    struct Flaky {
        alias: String,
        fail_first: bool,
        attempts: usize,
    }

    #[async_trait]
    impl Hook for Flaky {
        fn new(init: ComponentInit) -> anyhow::Result<Self> {
            Ok(Self {
                fail_first: init.config["fail_first"].as_bool().unwrap_or(false),
                alias: init.alias,
                attempts: 0,
            })
        }

        async fn prepare(&mut self) -> anyhow::Result<()> {
            FLAKY_PREPARES.lock().unwrap().push(self.alias.clone());
            self.attempts += 1;
            if self.fail_first && self.attempts == 1 {
                anyhow::bail!("{} is not ready yet", self.alias);
            }
            Ok(())
        }
    }

    fn flaky_attempts(alias: &str) -> usize {
        FLAKY_PREPARES
            .lock()
            .unwrap()
            .iter()
            .filter(|seen| *seen == alias)
            .count()
    }

    struct Stalls;

    #[async_trait]
    impl Service for Stalls {
        type Exposed = ();

        fn new(_init: ComponentInit) -> anyhow::Result<Self> {
            Ok(Self)
        }

        async fn prepare(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn start(&mut self) -> anyhow::Result<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn journal_deps() -> Aliases {
        Aliases::new().bind("service:journal", "journal")
    }

    fn recorded_app(config: Value, aliases: &[&str]) -> Application {
        let mut app = Application::from_value(config).unwrap();
        app.service::<JournalService>("journal", Aliases::new())
            .unwrap();
        for alias in aliases {
            app.service::<Recorder>(alias, journal_deps()).unwrap();
        }
        app
    }

    fn journal_of(app: &Application) -> Arc<Journal> {
        app.services().get::<Journal>("journal").unwrap()
    }

    #[test]
    fn test_registration_requires_exact_aliases() {
        let mut app = Application::new(Config::default());

        let err = app.service::<Recorder>("a", Aliases::new()).unwrap_err();
        assert!(matches!(err, StagehandError::MissingDependency { .. }));

        let err = app
            .service::<Recorder>("a", journal_deps().bind("service:cache", "redis"))
            .unwrap_err();
        assert!(matches!(err, StagehandError::UnneededDependency { .. }));

        assert_eq!(app.service_count(), 0);
        app.service::<Recorder>("a", journal_deps()).unwrap();
        assert_eq!(app.service_count(), 1);
    }

    #[test]
    fn test_duplicate_alias_keeps_first_registration() {
        let mut app = Application::new(Config::default());
        app.service::<JournalService>("journal", Aliases::new())
            .unwrap();

        let err = app
            .service::<Recorder>("journal", journal_deps())
            .unwrap_err();
        assert!(matches!(
            err,
            StagehandError::DuplicateAlias { kind: ComponentKind::Service, ref alias } if alias == "journal"
        ));
        assert_eq!(app.service_count(), 1);

        // aliases are unique per kind only
        app.hook::<Tracer>("journal", journal_deps()).unwrap();
        assert_eq!(app.hook_count(), 1);
    }

    #[test]
    fn test_registration_is_chainable() {
        let mut app = Application::new(Config::default());
        app.service::<JournalService>("journal", Aliases::new())
            .unwrap()
            .service::<Recorder>("a", [("service:journal", "journal")])
            .unwrap()
            .hook::<Tracer>("tracer", [("service:journal", "journal")])
            .unwrap();

        assert_eq!(
            app.service_aliases().collect::<Vec<_>>(),
            vec!["journal", "a"]
        );
        assert_eq!(app.hook_aliases().collect::<Vec<_>>(), vec!["tracer"]);
    }

    #[test]
    fn test_register_named_resolves_through_catalog() {
        let catalog = Catalog::new()
            .with_service::<JournalService>("journal")
            .with_hook::<Tracer>("tracer");
        let mut app = Application::new(Config::default());

        app.register_named(ComponentKind::Service, "journal", &catalog, "journal", Aliases::new())
            .unwrap();

        let err = app
            .register_named(ComponentKind::Service, "x", &catalog, "missing", Aliases::new())
            .unwrap_err();
        assert!(matches!(err, StagehandError::ComponentType { .. }));

        let err = app
            .register_named(ComponentKind::Service, "t", &catalog, "tracer", journal_deps())
            .unwrap_err();
        assert!(matches!(err, StagehandError::ComponentType { kind: ComponentKind::Service, .. }));
        assert_eq!(app.service_count(), 1);
    }

    #[tokio::test]
    async fn test_prepare_is_idempotent() {
        let mut app = recorded_app(json!({}), &["a"]);

        app.prepare().await.unwrap();
        app.prepare().await.unwrap();

        assert!(app.is_prepared());
        assert!(!app.is_started());
        assert_eq!(journal_of(&app).entries(), vec!["a:prepare"]);
        assert_eq!(
            *app.services().get::<String>("a").unwrap(),
            "a handle".to_string()
        );
    }

    #[tokio::test]
    async fn test_start_prepares_first() {
        let mut app = recorded_app(json!({}), &["a"]);

        app.start().await.unwrap();
        app.start().await.unwrap();

        assert!(app.is_prepared());
        assert!(app.is_started());
        assert_eq!(journal_of(&app).entries(), vec!["a:prepare", "a:start"]);
    }

    #[tokio::test]
    async fn test_phases_follow_registration_order() {
        let mut app = recorded_app(json!({}), &["a", "b", "c"]);

        app.start().await.unwrap();
        let journal = journal_of(&app);
        app.stop().await.unwrap();

        assert_eq!(
            journal.entries(),
            vec![
                "a:prepare", "b:prepare", "c:prepare", "a:start", "b:start", "c:start", "a:stop",
                "b:stop", "c:stop",
            ]
        );
    }

    #[tokio::test]
    async fn test_reverse_stop_order() {
        let mut app = recorded_app(
            json!({ "application": { "stop_order": "reverse" } }),
            &["a", "b", "c"],
        );

        app.start().await.unwrap();
        let journal = journal_of(&app);
        app.stop().await.unwrap();

        let entries = journal.entries();
        assert_eq!(&entries[6..], ["c:stop", "b:stop", "a:stop"]);
    }

    #[tokio::test]
    async fn test_stop_before_start_is_a_noop() {
        let mut app = recorded_app(json!({}), &["a"]);

        app.stop().await.unwrap();
        assert!(!app.is_prepared());
        assert!(!app.is_started());

        app.prepare().await.unwrap();
        app.stop().await.unwrap();
        assert!(app.is_prepared());
        assert!(app.services().contains("a"));
        assert_eq!(journal_of(&app).entries(), vec!["a:prepare"]);
    }

    #[tokio::test]
    async fn test_stop_withdraws_exposures_and_runs_once() {
        let mut app = recorded_app(json!({}), &["a", "b"]);

        app.start().await.unwrap();
        assert_eq!(app.services().aliases(), vec!["a", "b", "journal"]);
        let journal = journal_of(&app);

        app.stop().await.unwrap();
        app.stop().await.unwrap();

        assert!(app.services().is_empty());
        assert!(!app.is_prepared());
        assert!(!app.is_started());
        let stops = journal
            .entries()
            .into_iter()
            .filter(|entry| entry.ends_with(":stop"))
            .count();
        assert_eq!(stops, 2);
    }

    #[tokio::test]
    async fn test_application_can_restart_after_stop() {
        let mut app = recorded_app(json!({}), &["a"]);

        app.start().await.unwrap();
        app.stop().await.unwrap();
        app.start().await.unwrap();

        assert!(app.is_started());
        assert_eq!(journal_of(&app).entries(), vec!["a:prepare", "a:start"]);
    }

    #[tokio::test]
    async fn test_prepare_failure_aborts_and_keeps_earlier_exposures() {
        let mut app = recorded_app(
            json!({ "services": { "b": { "fail": "prepare" } } }),
            &["a", "b", "c"],
        );

        let err = app.prepare().await.unwrap_err();
        let refused = err
            .component_error()
            .and_then(|e| e.downcast_ref::<Refused>())
            .unwrap();
        assert_eq!(refused.alias, "b");

        assert!(!app.is_prepared());
        assert!(app.services().contains("a"));
        assert!(!app.services().contains("b"));
        assert!(!app.services().contains("c"));
        assert_eq!(journal_of(&app).entries(), vec!["a:prepare", "b:prepare"]);
    }

    #[tokio::test]
    async fn test_start_failure_leaves_application_stopped() {
        let mut app = recorded_app(
            json!({ "services": { "b": { "fail": "start" } } }),
            &["a", "b", "c"],
        );

        let err = app.start().await.unwrap_err();
        assert_eq!(err.to_string(), "b refused to start");

        assert!(app.is_prepared());
        assert!(!app.is_started());
        let entries = journal_of(&app).entries();
        assert_eq!(&entries[3..], ["a:start", "b:start"]);

        // not started, so there is nothing to stop
        app.stop().await.unwrap();
        assert!(app.services().contains("a"));
    }

    #[tokio::test]
    async fn test_hook_prepare_failure_stops_before_services() {
        let mut app = recorded_app(json!({}), &["a"]);
        app.hook::<Broken>("broken", Aliases::new()).unwrap();

        let err = app.prepare().await.unwrap_err();
        assert_eq!(err.to_string(), "hook exploded");
        assert!(!app.is_prepared());
        assert!(app.services().is_empty());
    }

    #[tokio::test]
    async fn test_hook_prepare_runs_once() {
        let mut app = recorded_app(json!({}), &["a"]);
        app.hook::<Counted>("counted", Aliases::new()).unwrap();

        app.prepare().await.unwrap();
        app.prepare().await.unwrap();
        app.start().await.unwrap();

        assert_eq!(COUNTED_PREPARES.load(Ordering::SeqCst), 1);
        assert_eq!(journal_of(&app).entries(), vec!["a:prepare", "a:start"]);
    }

    #[tokio::test]
    async fn test_prepare_retries_every_hook_after_failure() {
        let mut app = recorded_app(
            json!({ "hooks": { "flaky-second": { "fail_first": true } } }),
            &["a"],
        );
        app.hook::<Flaky>("flaky-first", Aliases::new())
            .unwrap()
            .hook::<Flaky>("flaky-second", Aliases::new())
            .unwrap();

        let err = app.prepare().await.unwrap_err();
        assert_eq!(err.to_string(), "flaky-second is not ready yet");
        assert!(!app.is_prepared());
        assert!(app.services().is_empty());
        let first = flaky_attempts("flaky-first");
        assert_eq!(flaky_attempts("flaky-second"), 1);

        app.prepare().await.unwrap();
        assert!(app.is_prepared());
        assert_eq!(flaky_attempts("flaky-first"), first + 1);
        assert_eq!(flaky_attempts("flaky-second"), 2);
        assert!(app.services().contains("journal"));
        assert_eq!(journal_of(&app).entries(), vec!["a:prepare"]);
    }

    #[test]
    fn test_phases_run_outside_tokio_without_events() {
        let mut app = recorded_app(json!({}), &["a"]);
        app.hook::<Tracer>("tracer", journal_deps()).unwrap();

        futures::executor::block_on(async {
            app.start().await.unwrap();
        });

        assert!(app.is_started());
        assert_eq!(journal_of(&app).entries(), vec!["a:prepare", "a:start"]);
    }

    #[tokio::test]
    async fn test_exposed_arc_is_wrapped_again() {
        struct Shared;

        #[async_trait]
        impl Service for Shared {
            type Exposed = Arc<String>;

            fn new(_init: ComponentInit) -> anyhow::Result<Self> {
                Ok(Self)
            }

            async fn prepare(&mut self) -> anyhow::Result<Arc<String>> {
                Ok(Arc::new("pool".to_string()))
            }
        }

        let mut app = Application::new(Config::default());
        app.service::<Shared>("pool", Aliases::new()).unwrap();
        app.prepare().await.unwrap();

        assert!(app.services().get::<String>("pool").is_none());
        let pool = app.services().get::<Arc<String>>("pool").unwrap();
        assert_eq!(pool.as_str(), "pool");
    }

    #[tokio::test]
    async fn test_hooks_prepare_concurrently() {
        let mut app = Application::new(Config::default());
        app.hook::<Rendezvous>("left", Aliases::new())
            .unwrap()
            .hook::<Rendezvous>("right", Aliases::new())
            .unwrap();

        app.prepare_with_timeout(Duration::from_secs(5))
            .await
            .unwrap();
        assert!(app.is_prepared());
    }

    #[tokio::test]
    async fn test_hook_events_interleave_with_services() {
        let mut app = recorded_app(json!({}), &["a"]);
        app.hook::<Tracer>("tracer", journal_deps()).unwrap();

        app.start().await.unwrap();

        assert_eq!(
            journal_of(&app).entries(),
            vec![
                "service:prepare:after journal",
                "a:prepare:before a",
                "a:prepare",
                "service:prepare:after a",
                "application:start:before",
                "service:start:after journal",
                "a:start",
                "service:start:after a",
                "application:start:after",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_timeout() {
        let mut app = Application::new(Config::default());
        app.service::<Stalls>("stalls", Aliases::new()).unwrap();

        let err = app
            .start_with_timeout(Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(app.is_prepared());
        assert!(!app.is_started());
    }

    #[tokio::test]
    async fn test_component_config_is_merged_at_registration() {
        struct Configured {
            config: Value,
        }

        #[async_trait]
        impl Service for Configured {
            type Exposed = Value;

            fn defaults() -> Value {
                json!({ "port": 8080, "tls": { "enabled": false, "cert": "none" } })
            }

            fn new(init: ComponentInit) -> anyhow::Result<Self> {
                Ok(Self {
                    config: init.config,
                })
            }

            async fn prepare(&mut self) -> anyhow::Result<Value> {
                Ok(self.config.clone())
            }
        }

        let mut app = Application::from_value(json!({
            "services": { "http": { "tls": { "enabled": true } } }
        }))
        .unwrap();
        app.service::<Configured>("http", Aliases::new()).unwrap();

        app.prepare().await.unwrap();
        assert_eq!(
            *app.services().get::<Value>("http").unwrap(),
            json!({ "port": 8080, "tls": { "enabled": true, "cert": "none" } })
        );
    }
}
