use crate::config::Config;
use crate::di::{ComponentKind, Exposed, ExposedServices};
use crate::error::{Result, StagehandError};
use std::sync::{Arc, Weak};
use tracing::Span;

/// State the application shares with the components it owns.
pub(crate) struct AppShared {
    pub(crate) config: Arc<Config>,
    pub(crate) services: ExposedServices,
    pub(crate) span: Span,
}

impl AppShared {
    pub(crate) fn exposed(&self, kind: ComponentKind, alias: &str) -> Option<Exposed> {
        match kind {
            ComponentKind::Service => self.services.get_any(alias),
            // hooks are never published
            ComponentKind::Hook => None,
        }
    }
}

/// Non-owning back-reference from a component to its application.
///
/// The application owns its components; a component only ever holds this
/// weak handle, so dropping the application tears the whole graph down.
#[derive(Clone)]
pub struct AppHandle {
    shared: Weak<AppShared>,
}

impl AppHandle {
    pub(crate) fn new(shared: &Arc<AppShared>) -> Self {
        Self {
            shared: Arc::downgrade(shared),
        }
    }

    pub(crate) fn upgrade(&self) -> Result<Arc<AppShared>> {
        self.shared
            .upgrade()
            .ok_or(StagehandError::ApplicationDropped)
    }

    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }

    pub fn config(&self) -> Result<Arc<Config>> {
        Ok(Arc::clone(&self.upgrade()?.config))
    }

    /// Look up an exposed service directly by its registered alias.
    pub fn service<T: Send + Sync + 'static>(&self, alias: &str) -> Result<Arc<T>> {
        self.upgrade()?.services.resolve::<T>(alias)
    }
}

impl std::fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
