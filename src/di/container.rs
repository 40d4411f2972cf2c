use crate::config::merge;
use crate::di::{
    AppHandle, Aliases, ComponentClass, ComponentInit, ComponentKind, DependencyName, Instance,
    Resolver,
};
use crate::error::{Result, StagehandError};
use serde_json::Value;
use tracing::Span;

/// What the application knows about a component it is about to register.
pub(crate) struct Descriptor<'a> {
    pub(crate) kind: ComponentKind,
    pub(crate) alias: &'a str,
    pub(crate) aliases: Aliases,
    pub(crate) class: &'a ComponentClass,
    pub(crate) config: Value,
}

/// Validates and wires exactly one component.
///
/// A container is built, checked and consumed during registration; it is
/// never kept around afterwards.
pub(crate) struct ComponentContainer<'a> {
    descriptor: Descriptor<'a>,
}

impl<'a> ComponentContainer<'a> {
    /// Check that the class can be instantiated as the requested kind and
    /// that the supplied aliases cover exactly the dependencies it declares.
    pub(crate) fn new(descriptor: Descriptor<'a>) -> Result<Self> {
        let Descriptor {
            kind,
            alias,
            class,
            ..
        } = &descriptor;

        if class.kind() != *kind {
            return Err(StagehandError::ComponentType {
                kind: *kind,
                alias: alias.to_string(),
                reason: format!("{} is a {} class", class.type_name(), class.kind()),
            });
        }

        let required = class.requires();
        if let Some(bad) = required
            .iter()
            .find(|name| DependencyName::parse(name).is_none())
        {
            return Err(StagehandError::InvalidDependencyName {
                kind: *kind,
                alias: alias.to_string(),
                name: bad.to_string(),
            });
        }

        let provided = &descriptor.aliases;
        let missing: Vec<String> = required
            .iter()
            .filter(|name| provided.get(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StagehandError::MissingDependency {
                kind: *kind,
                alias: alias.to_string(),
                names: missing,
            });
        }

        let unneeded: Vec<String> = provided
            .names()
            .filter(|name| !required.iter().any(|r| r == name))
            .map(str::to_string)
            .collect();
        if !unneeded.is_empty() {
            return Err(StagehandError::UnneededDependency {
                kind: *kind,
                alias: alias.to_string(),
                names: unneeded,
            });
        }

        Ok(Self { descriptor })
    }

    /// Merge configuration, scope a span, bind a resolver and call the constructor.
    pub(crate) fn instantiate(self, app: AppHandle, parent: &Span) -> Result<Instance> {
        let Descriptor {
            kind,
            alias,
            aliases,
            class,
            config,
        } = self.descriptor;

        let config = merge(class.defaults(), config);
        let log = match kind {
            ComponentKind::Service => tracing::info_span!(parent: parent, "service", service = %alias),
            ComponentKind::Hook => tracing::info_span!(parent: parent, "hook", hook = %alias),
        };
        let resolve = Resolver::new(app.clone(), aliases);

        class
            .construct(ComponentInit {
                alias: alias.to_string(),
                app,
                log,
                config,
                resolve,
            })
            .map_err(|source| StagehandError::Construction {
                kind,
                alias: alias.to_string(),
                source,
            })
    }
}
