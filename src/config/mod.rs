//! Application configuration.
//!
//! The configuration tree has three branches:
//!
//! ```text
//! {
//!   "application": { "log": { "name": "...", "level": "info" }, "stop_order": "registration" },
//!   "services":    { "<alias>": { ... } },
//!   "hooks":       { "<alias>": { ... } }
//! }
//! ```
//!
//! Missing branches default to empty. Each component's section is deep-merged
//! over the component's own defaults at registration time (see [`merge`]).

mod merge;

pub use merge::merge;

use crate::di::ComponentKind;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root configuration handed to [`Application::new`](crate::Application::new).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub application: ApplicationConfig,
    pub services: Map<String, Value>,
    pub hooks: Map<String, Value>,
}

impl Config {
    /// Build a configuration from an untyped JSON tree.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// The user-supplied section for one component, or an empty object.
    pub fn component(&self, kind: ComponentKind, alias: &str) -> Value {
        let branch = match kind {
            ComponentKind::Service => &self.services,
            ComponentKind::Hook => &self.hooks,
        };
        branch
            .get(alias)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub log: LogOptions,
    pub stop_order: StopOrder,
}

/// Logging options; unspecified fields fall back to the process name and `info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub name: String,
    pub level: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            name: process_name(),
            level: "info".to_string(),
        }
    }
}

/// Order in which services are stopped.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StopOrder {
    /// Same order as registration (and as prepare/start).
    #[default]
    Registration,
    /// Reverse registration order: dependents stop before their dependencies.
    Reverse,
}

fn process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
