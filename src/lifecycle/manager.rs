//! Lifecycle Manager
//!
//! Owns the service and hook registries and runs each phase over them.

use super::events::{APPLICATION, EventDispatcher, Moment, Phase, event_name};
use super::{Hook, Result, Subscriptions};
use crate::config::StopOrder;
use crate::di::{ComponentKind, ErasedService, ExposedServices};
use futures::future::try_join_all;
use indexmap::IndexMap;

/// Registries plus the phase runners.
///
/// Both registries keep insertion order: it is the order services are
/// prepared and started in.
#[derive(Default)]
pub(crate) struct LifecycleManager {
    services: IndexMap<String, Box<dyn ErasedService>>,
    hooks: IndexMap<String, Box<dyn Hook>>,
    dispatcher: EventDispatcher,
}

impl LifecycleManager {
    pub(crate) fn contains(&self, kind: ComponentKind, alias: &str) -> bool {
        match kind {
            ComponentKind::Service => self.services.contains_key(alias),
            ComponentKind::Hook => self.hooks.contains_key(alias),
        }
    }

    pub(crate) fn insert_service(&mut self, alias: &str, service: Box<dyn ErasedService>) {
        self.services.insert(alias.to_string(), service);
    }

    /// Register a hook and collect its event subscriptions.
    pub(crate) fn insert_hook(&mut self, alias: &str, hook: Box<dyn Hook>) {
        let mut subscriptions = Subscriptions::new();
        hook.subscribe(&mut subscriptions);
        self.dispatcher.register(alias, subscriptions);
        self.hooks.insert(alias.to_string(), hook);
    }

    pub(crate) fn service_aliases(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub(crate) fn hook_aliases(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    pub(crate) fn service_count(&self) -> usize {
        self.services.len()
    }

    pub(crate) fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    pub(crate) fn dispatch_application(&self, phase: Phase, moment: Moment) {
        self.dispatcher
            .dispatch(&event_name(APPLICATION, phase, moment), None);
    }

    /// Prepare every hook concurrently.
    ///
    /// The first failure wins; hook futures still in flight are dropped.
    pub(crate) async fn call_hook_prepare(&mut self) -> Result<()> {
        tracing::debug!("Preparing {} hooks...", self.hooks.len());

        let pending = self.hooks.iter_mut().map(|(alias, hook)| async move {
            hook.prepare().await.inspect_err(|e| {
                tracing::error!("Hook prepare failed for {}: {}", alias, e);
            })
        });
        try_join_all(pending).await?;

        tracing::debug!("Hooks prepared");
        Ok(())
    }

    /// Prepare services one by one and expose what each returns.
    pub(crate) async fn call_service_prepare(&mut self, exposed: &ExposedServices) -> Result<()> {
        for (alias, service) in self.services.iter_mut() {
            self.dispatcher.announce(alias, Phase::Prepare, Moment::Before);

            tracing::debug!("Preparing: {}", alias);
            let value = service.run_prepare().await.inspect_err(|e| {
                tracing::error!("Prepare failed for {}: {}", alias, e);
            })?;
            exposed.expose(alias, value);
            tracing::debug!("Prepared: {}", alias);

            self.dispatcher.announce(alias, Phase::Prepare, Moment::After);
        }
        Ok(())
    }

    /// Start services one by one, in registration order.
    pub(crate) async fn call_service_start(&mut self) -> Result<()> {
        for (alias, service) in self.services.iter_mut() {
            self.dispatcher.announce(alias, Phase::Start, Moment::Before);

            tracing::debug!("Starting: {}", alias);
            service.run_start().await.inspect_err(|e| {
                tracing::error!("Start failed for {}: {}", alias, e);
            })?;
            tracing::debug!("Started: {}", alias);

            self.dispatcher.announce(alias, Phase::Start, Moment::After);
        }
        Ok(())
    }

    /// Withdraw each exposure and stop its service. No events are dispatched.
    pub(crate) async fn call_service_stop(
        &mut self,
        exposed: &ExposedServices,
        order: StopOrder,
    ) -> Result<()> {
        let mut services: Vec<_> = self.services.iter_mut().collect();
        if order == StopOrder::Reverse {
            services.reverse();
        }

        for (alias, service) in services {
            exposed.retract(alias);
            tracing::debug!("Stopping: {}", alias);
            service.run_stop().await.inspect_err(|e| {
                tracing::error!("Stop failed for {}: {}", alias, e);
            })?;
            tracing::debug!("Stopped: {}", alias);
        }
        Ok(())
    }
}
