//! Component contracts
//!
//! These traits define what a component must provide to be driven through
//! the application lifecycle.

use super::Subscriptions;
use crate::di::ComponentInit;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A long-lived component with a prepare → start → stop lifecycle that
/// publishes a value other components can resolve.
///
/// Use a service for:
/// - Database pools and clients
/// - HTTP servers and listeners
/// - Caches and message-queue connections
///
/// # Example
///
/// ```rust,ignore
/// use stagehand::prelude::*;
///
/// pub struct Database {
///     url: String,
///     log: tracing::Span,
/// }
///
/// #[async_trait]
/// impl Service for Database {
///     type Exposed = Pool;
///
///     fn defaults() -> Value {
///         json!({ "url": "postgres://localhost/app" })
///     }
///
///     fn new(init: ComponentInit) -> anyhow::Result<Self> {
///         let url = init.config["url"].as_str().unwrap_or_default().to_string();
///         Ok(Self { url, log: init.log })
///     }
///
///     async fn prepare(&mut self) -> anyhow::Result<Pool> {
///         tracing::info!(parent: &self.log, url = %self.url, "connecting");
///         Pool::connect(&self.url).await
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + Sized + 'static {
    /// What `prepare()` publishes on the application's `services` collection.
    ///
    /// The value is stored behind its own `Arc`, and dependents resolve it by
    /// this exact type. A service declaring `type Exposed = Arc<Pool>` is
    /// therefore resolved with `resolve::<Arc<Pool>>`; expose `Pool` directly
    /// to let dependents call `resolve::<Pool>`.
    type Exposed: Send + Sync + 'static;

    /// Configuration the user's section is merged over.
    fn defaults() -> Value {
        Value::Object(Map::new())
    }

    /// Dependency names (`"<type>:<name>"`) this component resolves at runtime.
    fn requires() -> &'static [&'static str] {
        &[]
    }

    fn new(init: ComponentInit) -> anyhow::Result<Self>;

    /// Acquire resources and return the value to expose.
    ///
    /// Services prepare one at a time, in registration order, so a service
    /// may resolve any service registered before it.
    async fn prepare(&mut self) -> anyhow::Result<Self::Exposed>;

    /// Called after every service has been prepared.
    async fn start(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release resources. The exposure is already withdrawn when this runs.
    async fn stop(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A passive component that reacts to lifecycle events.
///
/// Hooks prepare concurrently before any service, so `prepare()` must not
/// rely on other components. After that they only observe: event handlers
/// registered in [`Hook::subscribe`] are spawned and never awaited, so a hook
/// cannot hold up or reorder a phase.
///
/// # Example
///
/// ```rust,ignore
/// use stagehand::prelude::*;
///
/// pub struct Migrations {
///     resolve: Resolver,
/// }
///
/// impl Hook for Migrations {
///     fn requires() -> &'static [&'static str] {
///         &["service:database"]
///     }
///
///     fn new(init: ComponentInit) -> anyhow::Result<Self> {
///         Ok(Self { resolve: init.resolve })
///     }
///
///     fn subscribe(&self, events: &mut Subscriptions) {
///         let resolve = self.resolve.clone();
///         events.on("database:prepare:after", move |_event| {
///             let pool = resolve.resolve::<Pool>("service:database");
///             async move {
///                 if let Ok(pool) = pool {
///                     pool.migrate().await;
///                 }
///             }
///         });
///     }
/// }
/// ```
#[async_trait]
pub trait Hook: Send + Sync + 'static {
    /// Configuration the user's section is merged over.
    fn defaults() -> Value
    where
        Self: Sized,
    {
        Value::Object(Map::new())
    }

    /// Dependency names (`"<type>:<name>"`) this component resolves at runtime.
    fn requires() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    fn new(init: ComponentInit) -> anyhow::Result<Self>
    where
        Self: Sized;

    async fn prepare(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Declare event handlers. Called once, when the hook is registered.
    fn subscribe(&self, events: &mut Subscriptions) {
        let _ = events;
    }
}
