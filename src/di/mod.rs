mod aliases;
mod catalog;
mod component;
mod container;
mod handle;
mod registry;
mod resolver;

pub use aliases::{Aliases, DependencyName};
pub use catalog::Catalog;
pub use component::{ComponentClass, ComponentInit, ComponentKind, Exposed};
pub use handle::AppHandle;
pub use registry::ExposedServices;
pub use resolver::Resolver;

pub(crate) use component::{ErasedService, Instance};
pub(crate) use container::{ComponentContainer, Descriptor};
pub(crate) use handle::AppShared;
