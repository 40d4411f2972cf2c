use crate::di::Exposed;
use crate::error::{Result, StagehandError};
use dashmap::DashMap;
use std::sync::Arc;

/// The public `services` collection: alias → value exposed by that service's `prepare()`.
///
/// Entries appear while the application prepares and disappear when it stops.
/// Only the application mutates it; everyone else reads.
#[derive(Default)]
pub struct ExposedServices {
    entries: DashMap<String, Exposed>,
}

impl ExposedServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)define the exposure for `alias`, returning the previous value.
    pub(crate) fn expose(&self, alias: &str, value: Exposed) -> Option<Exposed> {
        self.entries.insert(alias.to_string(), value)
    }

    pub(crate) fn retract(&self, alias: &str) -> Option<Exposed> {
        self.entries.remove(alias).map(|(_, value)| value)
    }

    pub fn get_any(&self, alias: &str) -> Option<Exposed> {
        self.entries.get(alias).map(|entry| Arc::clone(entry.value()))
    }

    /// Typed lookup; `None` if the alias is absent or exposes another type.
    pub fn get<T: Send + Sync + 'static>(&self, alias: &str) -> Option<Arc<T>> {
        self.get_any(alias)?.downcast::<T>().ok()
    }

    pub fn resolve<T: Send + Sync + 'static>(&self, alias: &str) -> Result<Arc<T>> {
        let instance = self
            .get_any(alias)
            .ok_or_else(|| StagehandError::ComponentNotFound {
                name: alias.to_string(),
                collection: "services".to_string(),
                alias: alias.to_string(),
            })?;
        instance
            .downcast::<T>()
            .map_err(|_| StagehandError::DowncastFailed {
                name: alias.to_string(),
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// Currently exposed aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        aliases.sort();
        aliases
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ExposedServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.aliases()).finish()
    }
}
