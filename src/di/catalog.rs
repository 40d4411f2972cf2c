use crate::di::ComponentClass;
use crate::lifecycle::{Hook, Service};
use std::collections::HashMap;

/// Component classes addressable by name.
///
/// Lets the set of components be chosen at runtime (for example from a
/// configuration file) instead of by type parameters.
///
/// # Example
/// ```rust,ignore
/// let catalog = Catalog::new()
///     .with_service::<Postgres>("postgres")
///     .with_hook::<Migrations>("migrations");
///
/// app.register_named(ComponentKind::Service, "db", &catalog, "postgres", Aliases::new())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: HashMap<String, ComponentClass>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service<S: Service>(mut self, name: impl Into<String>) -> Self {
        self.add(name, ComponentClass::service::<S>());
        self
    }

    pub fn with_hook<H: Hook>(mut self, name: impl Into<String>) -> Self {
        self.add(name, ComponentClass::hook::<H>());
        self
    }

    /// Add (or replace) a class under `name`.
    pub fn add(&mut self, name: impl Into<String>, class: ComponentClass) -> &mut Self {
        self.classes.insert(name.into(), class);
        self
    }

    pub fn get(&self, name: &str) -> Option<ComponentClass> {
        self.classes.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
