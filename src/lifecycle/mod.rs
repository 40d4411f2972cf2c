//! Lifecycle Module
//!
//! Drives registered components through their phases.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Registration (service / hook)     ← dependencies validated, component constructed
//!    ↓
//! 2. prepare()
//!    a. Hook::prepare (all hooks, concurrently)
//!    b. for each service, in registration order:
//!         service:prepare:before, <alias>:prepare:before   ← events
//!         Service::prepare → exposed as services()[alias]
//!         service:prepare:after,  <alias>:prepare:after    ← events
//!    ↓
//! 3. start()
//!    application:start:before                              ← event
//!    for each service, in registration order:
//!         service:start:before, <alias>:start:before       ← events
//!         Service::start
//!         service:start:after,  <alias>:start:after        ← events
//!    application:start:after                               ← event
//!    ↓
//! [Running...]
//!    ↓
//! 4. stop()
//!    for each service (registration order, or reverse if configured):
//!         withdraw services()[alias], Service::stop
//! ```
//!
//! Service phases are awaited one at a time. Event handlers are spawned and
//! never awaited.
//!
//! # Example
//!
//! ```rust,ignore
//! use stagehand::prelude::*;
//!
//! let mut app = Application::new(Config::default());
//! app.service::<Database>("db", Aliases::new())?
//!     .service::<Http>("http", [("service:database", "db")])?;
//!
//! app.start().await?;
//! assert!(app.services().contains("db"));
//! app.stop().await?;
//! ```

mod application;
mod error;
pub mod events;
mod manager;
mod shutdown;
mod traits;

pub use application::Application;
pub use error::{LifecycleError, Result};
pub use events::{Event, Subscriptions};
pub use shutdown::shutdown_signal;
pub use traits::{Hook, Service};
