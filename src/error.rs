use crate::di::ComponentKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StagehandError>;

/// Configuration and wiring errors.
///
/// These are raised synchronously while registering a component or while a
/// component resolves one of its dependencies. None of them is retryable: they
/// describe a mistake in how the application was assembled.
#[derive(Debug, Error)]
pub enum StagehandError {
    #[error("{kind} '{alias}' is not an instantiable {kind} component: {reason}")]
    ComponentType {
        kind: ComponentKind,
        alias: String,
        reason: String,
    },

    #[error("{kind} '{alias}' is already registered")]
    DuplicateAlias { kind: ComponentKind, alias: String },

    #[error("{kind} '{alias}' is missing aliases: {}", .names.join(", "))]
    MissingDependency {
        kind: ComponentKind,
        alias: String,
        names: Vec<String>,
    },

    #[error("{kind} '{alias}' was given unneeded aliases: {}", .names.join(", "))]
    UnneededDependency {
        kind: ComponentKind,
        alias: String,
        names: Vec<String>,
    },

    #[error("{kind} '{alias}' declares malformed dependency '{name}', expected '<type>:<name>'")]
    InvalidDependencyName {
        kind: ComponentKind,
        alias: String,
        name: String,
    },

    #[error("Unresolved alias: '{name}' is not a declared dependency")]
    UnresolvedAlias { name: String },

    #[error("Component not found: {collection}.{alias} (requested as '{name}')")]
    ComponentNotFound {
        name: String,
        collection: String,
        alias: String,
    },

    #[error("Failed to downcast '{name}' to {type_name}")]
    DowncastFailed { name: String, type_name: String },

    #[error("The application owning this component has been dropped")]
    ApplicationDropped,

    #[error("Failed to construct {kind} '{alias}': {source}")]
    Construction {
        kind: ComponentKind,
        alias: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

impl From<serde_json::Error> for StagehandError {
    fn from(err: serde_json::Error) -> Self {
        StagehandError::InvalidConfig(err.to_string())
    }
}
