use crate::di::{AppHandle, Aliases, DependencyName, Exposed};
use crate::error::{Result, StagehandError};
use std::sync::Arc;

/// Dependency lookup bound to one component.
///
/// Holds the alias map the component was registered with; the map is not
/// reachable from outside. Every call resolves against the application's
/// exposed collection as it is *now*, nothing is cached.
#[derive(Clone)]
pub struct Resolver {
    app: AppHandle,
    aliases: Arc<Aliases>,
}

impl Resolver {
    pub(crate) fn new(app: AppHandle, aliases: Aliases) -> Self {
        Self {
            app,
            aliases: Arc::new(aliases),
        }
    }

    /// Resolve a declared dependency (`"service:database"`) to its live instance.
    pub fn resolve_any(&self, name: &str) -> Result<Exposed> {
        let alias = self
            .aliases
            .get(name)
            .ok_or_else(|| StagehandError::UnresolvedAlias {
                name: name.to_string(),
            })?;
        let dependency =
            DependencyName::parse(name).ok_or_else(|| StagehandError::UnresolvedAlias {
                name: name.to_string(),
            })?;

        let shared = self.app.upgrade()?;
        shared
            .exposed(dependency.kind, alias)
            .ok_or_else(|| StagehandError::ComponentNotFound {
                name: name.to_string(),
                collection: dependency.kind.plural().to_string(),
                alias: alias.to_string(),
            })
    }

    /// Resolve a declared dependency and downcast it to the type its service exposes.
    pub fn resolve<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.resolve_any(name)?
            .downcast::<T>()
            .map_err(|_| StagehandError::DowncastFailed {
                name: name.to_string(),
                type_name: std::any::type_name::<T>().to_string(),
            })
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
