//! # Stagehand
//!
//! A component lifecycle container for Rust services.
//!
//! Stagehand takes a set of named components (services and hooks), their
//! configuration and the map of which alias satisfies which dependency, and
//! brings them up and down in a well-defined order.
//!
//! ## Features
//!
//! - **Alias-based wiring**: components declare dependency names such as
//!   `"service:database"`; the registrant binds each to a concrete alias, and
//!   the binding is checked for an exact match at registration time
//! - **Ordered phases**: hooks prepare concurrently, services prepare and start
//!   one at a time in registration order
//! - **Idempotent state**: `prepare`, `start` and `stop` are safe to repeat
//! - **Lifecycle events**: hooks observe `service:start:after`,
//!   `<alias>:prepare:before` and friends without being able to block them
//! - **Layered configuration**: each component's section is deep-merged over
//!   its own defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stagehand::prelude::*;
//!
//! // 1. A service that publishes a value
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! #[async_trait]
//! impl Service for Greeter {
//!     type Exposed = String;
//!
//!     fn defaults() -> Value {
//!         json!({ "greeting": "hello" })
//!     }
//!
//!     fn new(init: ComponentInit) -> anyhow::Result<Self> {
//!         let greeting = init.config["greeting"].as_str().unwrap_or_default().to_string();
//!         Ok(Self { greeting })
//!     }
//!
//!     async fn prepare(&mut self) -> anyhow::Result<String> {
//!         Ok(self.greeting.clone())
//!     }
//! }
//!
//! // 2. A service that depends on it
//! struct Shouter {
//!     resolve: Resolver,
//! }
//!
//! #[async_trait]
//! impl Service for Shouter {
//!     type Exposed = ();
//!
//!     fn requires() -> &'static [&'static str] {
//!         &["service:greeter"]
//!     }
//!
//!     fn new(init: ComponentInit) -> anyhow::Result<Self> {
//!         Ok(Self { resolve: init.resolve })
//!     }
//!
//!     async fn prepare(&mut self) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!
//!     async fn start(&mut self) -> anyhow::Result<()> {
//!         let greeting = self.resolve.resolve::<String>("service:greeter")?;
//!         println!("{}!", greeting.to_uppercase());
//!         Ok(())
//!     }
//! }
//!
//! // 3. Register and run
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut app = Application::new(Config::default());
//!     app.service::<Greeter>("greeter", Aliases::new())?
//!         .service::<Shouter>("shouter", [("service:greeter", "greeter")])?;
//!
//!     app.start().await?;
//!     app.stop().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod di;
pub mod error;
pub mod lifecycle;
pub mod logging;

// Re-export core types
pub use config::{Config, LogOptions, StopOrder};
pub use di::{
    Aliases, AppHandle, Catalog, ComponentClass, ComponentInit, ComponentKind, ExposedServices,
    Resolver,
};
pub use error::{Result, StagehandError};
pub use lifecycle::{Application, Event, Hook, LifecycleError, Service, Subscriptions};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;

/// Prelude module for convenient imports
///
/// ```
/// use stagehand::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, LogOptions, StopOrder};
    pub use crate::di::{
        Aliases, AppHandle, Catalog, ComponentClass, ComponentInit, ComponentKind, Exposed,
        ExposedServices, Resolver,
    };
    pub use crate::error::StagehandError;
    pub use crate::lifecycle::{
        Application, Event, Hook, LifecycleError, Service, Subscriptions, shutdown_signal,
    };
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
