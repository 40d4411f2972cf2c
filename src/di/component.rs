use crate::di::{AppHandle, Resolver};
use crate::lifecycle::{Hook, Service};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tracing::Span;

/// The value a service publishes from `prepare()`, as stored in the exposed collection.
pub type Exposed = Arc<dyn Any + Send + Sync>;

/// The two registries a component can live in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ComponentKind {
    Service,
    Hook,
}

impl ComponentKind {
    /// Name of the collection holding components of this kind.
    pub fn plural(self) -> &'static str {
        match self {
            ComponentKind::Service => "services",
            ComponentKind::Hook => "hooks",
        }
    }
}

/// Everything a component receives when it is constructed.
pub struct ComponentInit {
    /// Alias the component was registered under.
    pub alias: String,
    /// Non-owning handle to the application that registered the component.
    pub app: AppHandle,
    /// Span scoped to this component (`service = <alias>` or `hook = <alias>`).
    pub log: Span,
    /// Component defaults deep-merged with the user's section.
    pub config: Value,
    /// Dependency lookup bound to the aliases supplied at registration.
    pub resolve: Resolver,
}

impl ComponentInit {
    /// Deserialize the merged configuration into a typed struct.
    pub fn config_as<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_value(self.config.clone())?)
    }
}

/// A constructed component, erased so both registries can be fed by one container.
pub(crate) enum Instance {
    Service(Box<dyn ErasedService>),
    Hook(Box<dyn Hook>),
}

/// Object-safe view of a [`Service`], with the exposed value type erased.
#[async_trait]
pub(crate) trait ErasedService: Send + Sync {
    async fn run_prepare(&mut self) -> anyhow::Result<Exposed>;
    async fn run_start(&mut self) -> anyhow::Result<()>;
    async fn run_stop(&mut self) -> anyhow::Result<()>;
}

#[async_trait]
impl<S: Service> ErasedService for S {
    async fn run_prepare(&mut self) -> anyhow::Result<Exposed> {
        let value = Service::prepare(self).await?;
        let exposed: Exposed = Arc::new(value);
        Ok(exposed)
    }

    async fn run_start(&mut self) -> anyhow::Result<()> {
        Service::start(self).await
    }

    async fn run_stop(&mut self) -> anyhow::Result<()> {
        Service::stop(self).await
    }
}

/// Static description of a component type: its kind, defaults, declared
/// dependencies and constructor.
///
/// Obtained from [`ComponentClass::service`] / [`ComponentClass::hook`], or
/// looked up by name in a [`Catalog`](crate::di::Catalog).
#[derive(Clone, Copy)]
pub struct ComponentClass {
    kind: ComponentKind,
    type_name: &'static str,
    defaults: fn() -> Value,
    requires: fn() -> &'static [&'static str],
    construct: fn(ComponentInit) -> anyhow::Result<Instance>,
}

impl ComponentClass {
    pub fn service<S: Service>() -> Self {
        Self {
            kind: ComponentKind::Service,
            type_name: std::any::type_name::<S>(),
            defaults: S::defaults,
            requires: S::requires,
            construct: |init| {
                let service = S::new(init)?;
                Ok(Instance::Service(Box::new(service)))
            },
        }
    }

    pub fn hook<H: Hook>() -> Self {
        Self {
            kind: ComponentKind::Hook,
            type_name: std::any::type_name::<H>(),
            defaults: H::defaults,
            requires: H::requires,
            construct: |init| {
                let hook = H::new(init)?;
                Ok(Instance::Hook(Box::new(hook)))
            },
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn defaults(&self) -> Value {
        (self.defaults)()
    }

    pub fn requires(&self) -> &'static [&'static str] {
        (self.requires)()
    }

    pub(crate) fn construct(&self, init: ComponentInit) -> anyhow::Result<Instance> {
        (self.construct)(init)
    }
}

impl std::fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentClass")
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("requires", &self.requires())
            .finish()
    }
}
